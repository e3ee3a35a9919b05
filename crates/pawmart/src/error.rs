//! CLI error types with miette diagnostics.
//!
//! Maps core, config and remote failures into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use pawmart_config::ConfigError;
use pawmart_core::{CoreError, FailureKind, FailurePayload};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the marketplace API")]
    #[diagnostic(
        code(pawmart::connection_failed),
        help(
            "Check that the API server is running and reachable.\n\
             Reason: {reason}\n\
             Override the URL with --api-url or PAWMART_API_URL."
        )
    )]
    ConnectionFailed { reason: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(
        code(pawmart::auth_failed),
        help("Sign in again with: pawmart login")
    )]
    AuthFailed { message: String },

    #[error("Not signed in")]
    #[diagnostic(code(pawmart::not_authenticated), help("Sign in with: pawmart login"))]
    NotAuthenticated,

    #[error("Permission denied: {message}")]
    #[diagnostic(
        code(pawmart::forbidden),
        help("Your account's role does not allow this operation.")
    )]
    Forbidden { message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(code(pawmart::not_found))]
    NotFound { message: String },

    #[error("{message}")]
    #[diagnostic(code(pawmart::conflict))]
    Conflict { message: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error ({code}): {message}")]
    #[diagnostic(code(pawmart::api_error))]
    ApiError { code: String, message: String },

    #[error("State error: {message}")]
    #[diagnostic(code(pawmart::state))]
    State { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(pawmart::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(pawmart::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: pawmart config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No API URL configured")]
    #[diagnostic(
        code(pawmart::no_config),
        help(
            "Create a profile with: pawmart config init\n\
             Or pass --api-url / set PAWMART_API_URL.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(pawmart::config))]
    Config(Box<figment::Error>),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(pawmart::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(pawmart::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Could not render YAML: {0}")]
    #[diagnostic(code(pawmart::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NotAuthenticated => exit_code::AUTH,
            Self::Forbidden { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Rejected operation → CliError ────────────────────────────────────

impl From<FailurePayload> for CliError {
    fn from(failure: FailurePayload) -> Self {
        if failure.kind == FailureKind::Network {
            let reason = failure
                .details
                .as_ref()
                .and_then(serde_json::Value::as_str)
                .unwrap_or(&failure.message)
                .to_owned();
            return CliError::ConnectionFailed { reason };
        }

        let message = failure.message;
        match failure.status {
            Some(401) => CliError::AuthFailed { message },
            Some(403) => CliError::Forbidden { message },
            Some(404) => CliError::NotFound { message },
            Some(409) => CliError::Conflict { message },
            Some(status) => CliError::ApiError {
                code: status.to_string(),
                message,
            },
            None => CliError::ApiError {
                code: failure.kind.to_string(),
                message,
            },
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Api { message } => CliError::ConnectionFailed { reason: message },
            CoreError::Config { message } => CliError::Validation {
                field: "api_url".into(),
                reason: message,
            },
            CoreError::Reducer { slice, reason } => CliError::State {
                message: format!("{slice}: {reason}"),
            },
            CoreError::Persistence { message } => CliError::State { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::Figment(err) => CliError::Config(err),
            ConfigError::Io(err) => CliError::Io(err),
            ConfigError::Serialization(err) => CliError::Validation {
                field: "config".into(),
                reason: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn server(status: u16, message: &str) -> FailurePayload {
        FailurePayload {
            kind: FailureKind::Server,
            status: Some(status),
            message: message.into(),
            details: Some(json!({ "message": message })),
        }
    }

    #[test]
    fn rejected_operations_map_to_exit_codes() {
        assert_eq!(CliError::from(server(401, "bad token")).exit_code(), exit_code::AUTH);
        assert_eq!(
            CliError::from(server(403, "admins only")).exit_code(),
            exit_code::PERMISSION
        );
        assert_eq!(
            CliError::from(server(404, "Pet not found")).exit_code(),
            exit_code::NOT_FOUND
        );
        assert_eq!(CliError::from(server(500, "boom")).exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn network_failure_is_a_connection_error() {
        let failure = FailurePayload {
            kind: FailureKind::Network,
            status: None,
            message: FailurePayload::NETWORK_MESSAGE.into(),
            details: Some(json!("connection refused")),
        };
        let err = CliError::from(failure);
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
        assert!(matches!(err, CliError::ConnectionFailed { ref reason } if reason == "connection refused"));
    }

    #[test]
    fn server_message_is_shown_verbatim() {
        let err = CliError::from(server(404, "Pet not found"));
        assert_eq!(err.to_string(), "Pet not found");
    }
}
