use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use secrecy::{ExposeSecret, SecretString};

/// The single credential hook shared by every request the gateway sends.
///
/// Holds the bearer token obtained at login. Entity stores never build an
/// `Authorization` header themselves; the gateway asks this hook to attach
/// one. Reads are lock-free so concurrent requests never contend.
#[derive(Default)]
pub struct Credential {
    token: ArcSwapOption<SecretString>,
}

impl Credential {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the bearer token returned by a successful login.
    pub fn set(&self, token: SecretString) {
        self.token.store(Some(Arc::new(token)));
    }

    /// Drop the current token (logout).
    pub fn clear(&self) {
        self.token.store(None);
    }

    pub fn is_set(&self) -> bool {
        self.token.load().is_some()
    }

    /// Attach `Authorization: Bearer <token>` when a token is present.
    pub(crate) fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token.load_full() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &self.is_set().then_some("[REDACTED]"))
            .finish()
    }
}
