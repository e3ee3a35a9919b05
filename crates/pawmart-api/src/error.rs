use thiserror::Error;

/// Top-level error type for the `pawmart-api` crate.
///
/// Separates failures where no response reached the client ([`Network`](Self::Network))
/// from failures the server reported ([`Server`](Self::Server)). `pawmart-core`
/// normalizes both into a slice's failure payload.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// No response reached the client (connection refused, DNS failure,
    /// timeout, body read interrupted).
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Building the HTTP client failed.
    #[error("HTTP client error: {0}")]
    Client(String),

    // ── Server ──────────────────────────────────────────────────────
    /// The server answered with a non-success status.
    ///
    /// `payload` holds the JSON body when the server sent one.
    #[error("Server error (HTTP {status}): {}", message_or_status(*status, payload.as_ref()))]
    Server {
        status: u16,
        payload: Option<serde_json::Value>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// A success response carried a body that is not JSON.
    #[error("Deserialization error: {message}")]
    Decode { message: String, body: String },
}

impl Error {
    /// Returns `true` if no response reached the client.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Returns `true` if the server rejected the credential.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Server { status: 401, .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Server { status: 404, .. })
    }

    /// HTTP status of a server-reported failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Structured body of a server-reported failure.
    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Server { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }

    /// Human-readable message carried by the server payload, if any.
    ///
    /// Looks at `message` first, then a string-valued `error` field.
    pub fn server_message(&self) -> Option<&str> {
        self.payload().and_then(payload_message)
    }
}

/// Extract a human-readable message from an error payload.
pub fn payload_message(payload: &serde_json::Value) -> Option<&str> {
    payload
        .get("message")
        .and_then(serde_json::Value::as_str)
        .or_else(|| payload.get("error").and_then(serde_json::Value::as_str))
}

fn message_or_status(status: u16, payload: Option<&serde_json::Value>) -> String {
    payload
        .and_then(payload_message)
        .map_or_else(|| format!("request failed with status code {status}"), String::from)
}
