// ── Normalized failure payload ──
//
// What a slice's `error` field holds after a failed operation. Network
// failures and server-reported failures stay distinguishable through `kind`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where an operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    /// No response reached the client.
    Network,
    /// The server answered with an error status.
    Server,
    /// The server answered successfully with an unusable body.
    Decode,
    /// The request could not be built.
    Client,
}

/// Failure stored in a slice and handed to notification subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailurePayload {
    pub kind: FailureKind,
    pub status: Option<u16>,
    /// Human-readable message: the server's own when it sent one,
    /// otherwise a generic marker.
    pub message: String,
    /// The server's structured error body, or the transport error text.
    pub details: Option<Value>,
}

impl FailurePayload {
    pub const NETWORK_MESSAGE: &'static str = "Network Error";

    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            details: None,
        }
    }

    pub fn is_network(&self) -> bool {
        self.kind == FailureKind::Network
    }
}

impl From<&pawmart_api::Error> for FailurePayload {
    fn from(err: &pawmart_api::Error) -> Self {
        match err {
            pawmart_api::Error::Network(e) => Self {
                kind: FailureKind::Network,
                status: None,
                message: Self::NETWORK_MESSAGE.into(),
                details: Some(Value::String(e.to_string())),
            },
            pawmart_api::Error::Server { status, payload } => Self {
                kind: FailureKind::Server,
                status: Some(*status),
                message: payload
                    .as_ref()
                    .and_then(pawmart_api::payload_message)
                    .map_or_else(
                        || format!("Request failed with status code {status}"),
                        String::from,
                    ),
                details: payload.clone(),
            },
            pawmart_api::Error::Decode { message, .. } => {
                Self::new(FailureKind::Decode, message.clone())
            }
            other @ (pawmart_api::Error::InvalidUrl(_) | pawmart_api::Error::Client(_)) => {
                Self::new(FailureKind::Client, other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn server_payload_message_is_kept() {
        let err = pawmart_api::Error::Server {
            status: 500,
            payload: Some(json!({ "message": "server error" })),
        };
        let failure = FailurePayload::from(&err);
        assert_eq!(failure.kind, FailureKind::Server);
        assert_eq!(failure.status, Some(500));
        assert_eq!(failure.message, "server error");
        assert_eq!(failure.details, Some(json!({ "message": "server error" })));
    }

    #[test]
    fn server_without_payload_gets_generic_marker() {
        let err = pawmart_api::Error::Server {
            status: 404,
            payload: None,
        };
        let failure = FailurePayload::from(&err);
        assert_eq!(failure.message, "Request failed with status code 404");
        assert!(failure.details.is_none());
        assert!(!failure.is_network());
    }

    #[test]
    fn decode_failure() {
        let err = pawmart_api::Error::Decode {
            message: "expected value".into(),
            body: "oops".into(),
        };
        let failure = FailurePayload::from(&err);
        assert_eq!(failure.kind, FailureKind::Decode);
        assert_eq!(failure.status, None);
    }
}
