// ── Opaque entity records ──
//
// The remote API owns record shapes. The client only reads optional
// fields and the identifier; nothing here validates a schema.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::EntityId;

/// A cached copy of one server-side entity (pet, product, order, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value. Only objects are records.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Builder-style field insert, mostly for tests and fixtures.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    pub fn i64_field(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(Value::as_i64)
    }

    pub fn f64_field(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(Value::as_f64)
    }

    pub fn bool_field(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(Value::as_bool)
    }

    /// Identifier stored under `id_field`.
    pub fn id(&self, id_field: &str) -> Option<EntityId> {
        self.get(id_field).and_then(EntityId::from_value)
    }

    /// Whether this record's `id_field` names `id`.
    pub fn has_id(&self, id_field: &str, id: &EntityId) -> bool {
        self.get(id_field).is_some_and(|v| id.matches(v))
    }

    /// Field rendered as display text: strings verbatim, other scalars as
    /// JSON, missing or null as `None`.
    pub fn text(&self, field: &str) -> Option<String> {
        match self.get(field)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_objects_are_records() {
        assert!(Record::from_value(json!({ "a": 1 })).is_some());
        assert!(Record::from_value(json!([1, 2])).is_none());
        assert!(Record::from_value(json!("x")).is_none());
        assert!(Record::from_value(Value::Null).is_none());
    }

    #[test]
    fn field_access_is_optional() {
        let record = Record::new()
            .with("petId", 1)
            .with("name", "Rex")
            .with("price", 12.5)
            .with("adopted", false);
        assert_eq!(record.str_field("name"), Some("Rex"));
        assert_eq!(record.i64_field("petId"), Some(1));
        assert_eq!(record.f64_field("price"), Some(12.5));
        assert_eq!(record.bool_field("adopted"), Some(false));
        assert_eq!(record.str_field("missing"), None);
        assert_eq!(record.i64_field("name"), None);
    }

    #[test]
    fn id_lookup_uses_the_given_field() {
        let record = Record::new().with("_id", "a1").with("petId", 9);
        assert_eq!(record.id("_id"), Some(EntityId::Text("a1".into())));
        assert!(record.has_id("petId", &EntityId::Number(9)));
        assert!(!record.has_id("productId", &EntityId::Number(9)));
    }

    #[test]
    fn text_renders_scalars() {
        let record = Record::new().with("age", 3).with("note", Value::Null);
        assert_eq!(record.text("age").as_deref(), Some("3"));
        assert_eq!(record.text("note"), None);
    }

    #[test]
    fn serializes_transparently() {
        let record = Record::new().with("petId", 1);
        assert_eq!(serde_json::to_value(&record).ok(), Some(json!({ "petId": 1 })));
    }
}
