// ── Auth store ──
//
// Login, logout and registration. The session lives in the auth slice;
// its token is mirrored into the gateway's credential hook so every later
// request carries it.

use std::sync::Arc;

use secrecy::SecretString;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use pawmart_api::{Body, Endpoint, Method};

use crate::entity::{Context, Outcome, unwrap_single};
use crate::error::CoreError;
use crate::model::{AuthSession, Record};
use crate::notify::{NotifyPolicy, Scope};
use crate::store::{Action, AuthAction, AuthState, FailureKind, FailurePayload, RequestId};

/// Authentication operations. Cheap to clone.
#[derive(Clone)]
pub struct AuthStore {
    ctx: Arc<Context>,
}

impl AuthStore {
    pub(crate) fn new(ctx: Arc<Context>) -> Self {
        Self { ctx }
    }

    pub fn state(&self) -> AuthState {
        self.ctx.store.snapshot().auth.clone()
    }

    pub fn session(&self) -> Option<AuthSession> {
        self.ctx.store.snapshot().auth.session.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.ctx.store.snapshot().auth.is_authenticated()
    }

    /// Point the credential hook at the session already in the tree
    /// (after rehydration).
    pub(crate) fn restore_credential(&self) {
        match self.session() {
            Some(session) => {
                debug!("restoring persisted session");
                self.ctx
                    .gateway
                    .credential()
                    .set(SecretString::from(session.token));
            }
            None => self.ctx.gateway.credential().clear(),
        }
    }

    /// Exchange credentials for a session.
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Outcome<AuthSession>, CoreError> {
        use secrecy::ExposeSecret;

        const OP: &str = "login";
        let request = self.begin()?;
        let body = json!({ "email": email, "password": password.expose_secret() });
        let url = self.ctx.endpoints.url(Endpoint::Login);

        let result = self
            .ctx
            .call(Method::POST, url, body.into())
            .await
            .and_then(session_from_response);

        let policy = NotifyPolicy::announce("Logged in successfully");
        match result {
            Ok(session) => {
                self.ctx
                    .gateway
                    .credential()
                    .set(SecretString::from(session.token.clone()));
                self.ctx.store.dispatch(Action::Auth(AuthAction::LoggedIn {
                    request,
                    session: session.clone(),
                }))?;
                info!(role = session.role().unwrap_or("unknown"), "logged in");
                self.ctx.publish(Scope::Auth, OP, request, Ok(()), policy);
                Ok(Outcome::Fulfilled(session))
            }
            Err(failure) => self.reject(OP, request, failure, policy),
        }
    }

    /// End the session.
    ///
    /// The server is told first, best effort; the local session and every
    /// session-scoped slice are reset whatever it answers.
    pub async fn logout(&self) -> Result<(), CoreError> {
        const OP: &str = "logout";
        let request = RequestId::next();
        let url = self.ctx.endpoints.url(Endpoint::Logout);
        if let Err(failure) = self.ctx.call(Method::POST, url, Body::Empty).await {
            warn!(error = %failure.message, "server-side logout failed, clearing local session anyway");
        }

        self.ctx.gateway.credential().clear();
        self.ctx.store.dispatch(Action::Auth(AuthAction::LoggedOut))?;
        info!("logged out");
        self.ctx.publish(
            Scope::Auth,
            OP,
            request,
            Ok(()),
            NotifyPolicy::announce("Logged out"),
        );
        Ok(())
    }

    /// Create an account. Registration does not sign the user in.
    pub async fn register(&self, body: impl Into<Body>) -> Result<Outcome<Option<Record>>, CoreError> {
        const OP: &str = "register";
        let request = self.begin()?;
        let url = self.ctx.endpoints.url(Endpoint::Register);
        let policy = NotifyPolicy::announce("Registration successful");

        match self.ctx.call(Method::POST, url, body.into()).await {
            Ok(data) => {
                self.ctx
                    .store
                    .dispatch(Action::Auth(AuthAction::Settled { request }))?;
                self.ctx.publish(Scope::Auth, OP, request, Ok(()), policy);
                Ok(Outcome::Fulfilled(unwrap_single(data, "user")))
            }
            Err(failure) => self.reject(OP, request, failure, policy),
        }
    }

    fn begin(&self) -> Result<RequestId, CoreError> {
        let request = RequestId::next();
        self.ctx
            .store
            .dispatch(Action::Auth(AuthAction::Pending { request }))?;
        Ok(request)
    }

    fn reject<T>(
        &self,
        op: &'static str,
        request: RequestId,
        failure: FailurePayload,
        policy: NotifyPolicy,
    ) -> Result<Outcome<T>, CoreError> {
        self.ctx.store.dispatch(Action::Auth(AuthAction::Rejected {
            request,
            error: failure.clone(),
        }))?;
        self.ctx
            .publish(Scope::Auth, op, request, Err(failure.clone()), policy);
        Ok(Outcome::Rejected(failure))
    }
}

/// `{ token, user }` from a login response.
fn session_from_response(data: Value) -> Result<AuthSession, FailurePayload> {
    let Value::Object(mut map) = data else {
        return Err(FailurePayload::new(
            FailureKind::Decode,
            "login response was not an object",
        ));
    };
    let token = match map.remove("token") {
        Some(Value::String(token)) if !token.is_empty() => token,
        _ => {
            return Err(FailurePayload::new(
                FailureKind::Decode,
                "login response did not include a token",
            ));
        }
    };
    let user = map.remove("user").and_then(Record::from_value);
    Ok(AuthSession { token, user })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn session_is_read_from_token_and_user() {
        let session = session_from_response(json!({
            "token": "jwt",
            "user": { "_id": "u1", "role": "seller" }
        }))
        .unwrap();
        assert_eq!(session.token, "jwt");
        assert_eq!(session.role(), Some("seller"));
    }

    #[test]
    fn missing_token_is_a_decode_failure() {
        let failure = session_from_response(json!({ "user": {} })).unwrap_err();
        assert_eq!(failure.kind, FailureKind::Decode);

        let failure = session_from_response(json!("ok")).unwrap_err();
        assert_eq!(failure.kind, FailureKind::Decode);
    }
}
