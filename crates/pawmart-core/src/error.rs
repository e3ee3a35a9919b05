// ── Core error types ──
//
// Errors that abort a dispatch or prevent an operation from starting.
// Remote failures are NOT errors at this level: they resolve to
// `Outcome::Rejected` and land in the slice's `error` field.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Dispatch errors ──────────────────────────────────────────────
    /// An action could not be applied to its slice. The tree is unchanged.
    #[error("Reducer failed for slice '{slice}': {reason}")]
    Reducer { slice: String, reason: String },

    /// Reading or writing the persisted snapshot failed.
    #[error("Persistence error: {message}")]
    Persistence { message: String },

    // ── Setup errors ─────────────────────────────────────────────────
    /// The transport could not be built or a URL was malformed.
    #[error("API setup error: {message}")]
    Api { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl From<pawmart_api::Error> for CoreError {
    fn from(err: pawmart_api::Error) -> Self {
        match err {
            pawmart_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            other => CoreError::Api {
                message: other.to_string(),
            },
        }
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Persistence {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Persistence {
            message: format!("snapshot serialization failed: {err}"),
        }
    }
}
