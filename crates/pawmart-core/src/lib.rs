//! Client-side state synchronization between `pawmart-api` and view
//! consumers (the CLI, or any other front end).
//!
//! - **[`Marketplace`]**: the explicit context built once at startup. It
//!   owns the gateway, the endpoint registry, the root store and the
//!   notifier, and vends one [`EntityStore`] per resource plus the
//!   [`AuthStore`].
//!
//! - **[`EntityStore<R>`]**: a cached, eventually-consistent copy of one
//!   server collection. Every operation runs the same three phases:
//!   pending, one remote call, then fulfilled or rejected. Remote failures
//!   resolve to [`Outcome::Rejected`] and never blank the cached collection.
//!
//! - **[`Store`]**: the root state container. Dispatch is the only write
//!   path; middleware runs in a fixed order (logging, then persistence)
//!   and subscribers receive committed snapshots through [`StateStream`].
//!
//! - **Persistence** ([`persist`]): the auth session plus configured slices
//!   are written under one versioned key and rehydrated before the first
//!   dispatch.
//!
//! - **Notifications** ([`notify`]): operation completions are broadcast
//!   as [`OperationEvent`]s; [`Notice::from_event`] turns them into
//!   banners for callers that want them.

pub mod auth;
pub mod config;
pub mod entity;
pub mod error;
pub mod marketplace;
pub mod model;
pub mod notify;
pub mod persist;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use auth::AuthStore;
pub use config::ClientConfig;
pub use entity::{Collection, EntityStore, Outcome, Resource};
pub use error::CoreError;
pub use marketplace::Marketplace;
pub use model::{AuthSession, EntityId, Record};
pub use notify::{Notice, NoticeLevel, NotifyPolicy, OperationEvent, Scope};
pub use persist::{FileStorage, MemoryStorage, PERSIST_KEY, PERSIST_VERSION, Storage};
pub use store::{FailureKind, FailurePayload, RootState, Slice, SliceKey, Status, Store};
pub use stream::{ListQuery, Page, SortOrder, StateStream};
