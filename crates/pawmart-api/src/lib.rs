// pawmart-api: Async HTTP transport for the PawMart marketplace API

pub mod auth;
pub mod endpoints;
pub mod error;
pub mod form;
pub mod gateway;
pub mod transport;

pub use auth::Credential;
pub use endpoints::{Endpoint, Endpoints, MemberAction, with_query};
pub use error::{Error, payload_message};
pub use form::{Attachment, Body, FormPayload};
pub use gateway::{Gateway, Interceptor, Response, TracingInterceptor};
pub use transport::{TlsMode, TransportConfig};

// Re-exported so callers can name request methods without depending on reqwest.
pub use reqwest::Method;
