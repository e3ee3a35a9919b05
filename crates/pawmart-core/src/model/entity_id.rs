// ── Entity identity ──
//
// Server-assigned identifiers come in two shapes: numeric (`petId: 1`) and
// string (`_id: "65f0..."`). EntityId hides the difference; matching against
// raw JSON compares canonical text so `"2"` and `2` name the same record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical identifier for any marketplace entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl EntityId {
    /// Read an identifier out of a JSON value. Only numbers that fit in
    /// `i64` and strings qualify.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_i64().map(Self::Number),
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    /// Whether a raw JSON identifier names this entity.
    pub fn matches(&self, value: &serde_json::Value) -> bool {
        match (self, value) {
            (Self::Number(a), serde_json::Value::Number(b)) => b.as_i64() == Some(*a),
            (Self::Number(a), serde_json::Value::String(b)) => b.parse::<i64>().ok() == Some(*a),
            (Self::Text(a), serde_json::Value::String(b)) => a == b,
            (Self::Text(a), serde_json::Value::Number(b)) => *a == b.to_string(),
            _ => false,
        }
    }

    /// Path segment form, used when building resource URLs.
    pub fn as_segment(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_owned()))
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        match s.parse::<i64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(s),
        }
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}
