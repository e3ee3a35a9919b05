// ── Domain model ──
//
// Records are opaque JSON objects keyed by a server-assigned identifier.

pub mod entity_id;
pub mod record;
pub mod session;

pub use entity_id::EntityId;
pub use record::Record;
pub use session::AuthSession;
