// Remote gateway
//
// The one shared HTTP transport. Every request goes through `send`, which
// attaches the credential, shows the finished request to the interceptors,
// and classifies the outcome. No retries, no response rewriting.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use tracing::{debug, trace};
use url::Url;

use crate::auth::Credential;
use crate::error::Error;
use crate::form::Body;
use crate::transport::TransportConfig;

/// Observes traffic passing through the gateway.
///
/// Interceptors receive finished requests by shared reference and cannot
/// alter them. All hooks default to no-ops.
pub trait Interceptor: Send + Sync {
    fn on_request(&self, _request: &reqwest::Request) {}

    fn on_response(&self, _method: &Method, _url: &Url, _status: StatusCode) {}

    fn on_network_error(&self, _method: &Method, _url: &Url, _error: &reqwest::Error) {}
}

/// Default interceptor: diagnostic logging through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingInterceptor;

impl Interceptor for TracingInterceptor {
    fn on_request(&self, request: &reqwest::Request) {
        debug!(method = %request.method(), url = %request.url(), "request");
    }

    fn on_response(&self, method: &Method, url: &Url, status: StatusCode) {
        trace!(%method, %url, status = status.as_u16(), "response");
    }

    fn on_network_error(&self, method: &Method, url: &Url, error: &reqwest::Error) {
        debug!(%method, %url, error = %error, "no response");
    }
}

/// A successful response with its JSON body.
///
/// `data` is `Null` when the server answered with an empty body.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub data: serde_json::Value,
}

/// Shared HTTP transport for the marketplace API.
///
/// Sends cookies on every request, attaches the bearer credential when one
/// is installed, and hands each outgoing request to the interceptors.
/// Callers interpret [`Response::data`] and [`Error::payload`].
pub struct Gateway {
    http: reqwest::Client,
    credential: Arc<Credential>,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl Gateway {
    /// Build a gateway from a `TransportConfig`, with the tracing
    /// interceptor installed.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self::with_client(transport.build_client()?))
    }

    /// Build a gateway around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self {
            http,
            credential: Arc::new(Credential::new()),
            interceptors: vec![Arc::new(TracingInterceptor)],
        }
    }

    /// Add an interceptor after the existing ones.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// The credential hook shared by all requests.
    pub fn credential(&self) -> &Arc<Credential> {
        &self.credential
    }

    // ── Verbs ────────────────────────────────────────────────────────

    pub async fn get(&self, url: Url) -> Result<Response, Error> {
        self.send(Method::GET, url, Body::Empty).await
    }

    pub async fn post(&self, url: Url, body: impl Into<Body>) -> Result<Response, Error> {
        self.send(Method::POST, url, body.into()).await
    }

    pub async fn put(&self, url: Url, body: impl Into<Body>) -> Result<Response, Error> {
        self.send(Method::PUT, url, body.into()).await
    }

    pub async fn delete(&self, url: Url) -> Result<Response, Error> {
        self.send(Method::DELETE, url, Body::Empty).await
    }

    /// Send one request and classify the outcome.
    pub async fn send(&self, method: Method, url: Url, body: Body) -> Result<Response, Error> {
        let builder = self.http.request(method, url);
        let builder = match body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::Multipart(form) => builder.multipart(form.into_form()?),
        };
        let request = self
            .credential
            .apply(builder)
            .build()
            .map_err(|e| Error::Client(format!("failed to build request: {e}")))?;

        for interceptor in &self.interceptors {
            interceptor.on_request(&request);
        }

        let method = request.method().clone();
        let url = request.url().clone();

        let resp = match self.http.execute(request).await {
            Ok(resp) => resp,
            Err(e) => {
                for interceptor in &self.interceptors {
                    interceptor.on_network_error(&method, &url, &e);
                }
                return Err(Error::Network(e));
            }
        };

        let status = resp.status();
        for interceptor in &self.interceptors {
            interceptor.on_response(&method, &url, status);
        }

        let body = resp.text().await.map_err(Error::Network)?;

        if !status.is_success() {
            return Err(Error::Server {
                status: status.as_u16(),
                payload: serde_json::from_str(&body).ok(),
            });
        }

        let data = if body.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&body).map_err(|e| {
                let preview = body.chars().take(200).collect::<String>();
                Error::Decode {
                    message: format!("{e} (body preview: {preview:?})"),
                    body: body.clone(),
                }
            })?
        };

        Ok(Response {
            status: status.as_u16(),
            data,
        })
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("credential", &self.credential)
            .field("interceptors", &self.interceptors.len())
            .finish_non_exhaustive()
    }
}
