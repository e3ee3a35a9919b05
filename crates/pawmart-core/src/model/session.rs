// ── Authenticated session ──

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Record;

/// What a successful login leaves behind: the bearer token and the
/// signed-in user's record.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    #[serde(default)]
    pub user: Option<Record>,
}

impl AuthSession {
    /// The user's role (`admin`, `seller`, `vet`, `customer`), if the
    /// server sent one.
    pub fn role(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.str_field("role"))
    }

    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.str_field("email"))
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_token() {
        let session = AuthSession {
            token: "jwt-secret".into(),
            user: Some(Record::new().with("role", "vet")),
        };
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("jwt-secret"));
        assert_eq!(session.role(), Some("vet"));
    }
}
