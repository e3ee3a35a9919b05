// ── Entity stores ──
//
// One generic store parameterized by a `Resource`, instantiated once per
// server collection. Domain-specific operations live in `resources`.

mod context;
mod resources;

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;

use tracing::warn;

use pawmart_api::{Body, Endpoint, MemberAction, Method, with_query};

use crate::error::CoreError;
use crate::model::{EntityId, Record};
use crate::notify::NotifyPolicy;
use crate::store::{FailurePayload, Payload, Slice, SliceKey};
use crate::stream::{ListQuery, Page};

pub(crate) use context::{Context, Request, unwrap_list, unwrap_single};
pub use resources::{
    Admin, Applications, Appointments, Blogs, Cart, Donations, Enquiries, Orders, Pets,
    Products, Users,
};

/// Tagged result of an operation. Remote failures land here rather than
/// in `Err`, so callers never need to catch anything for the normal case.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Fulfilled(T),
    Rejected(FailurePayload),
}

impl<T> Outcome<T> {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Self::Fulfilled(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Self::Fulfilled(value) => Some(value),
            Self::Rejected(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&FailurePayload> {
        match self {
            Self::Fulfilled(_) => None,
            Self::Rejected(failure) => Some(failure),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Fulfilled(value) => Outcome::Fulfilled(f(value)),
            Self::Rejected(failure) => Outcome::Rejected(failure),
        }
    }

    pub fn into_result(self) -> Result<T, FailurePayload> {
        match self {
            Self::Fulfilled(value) => Ok(value),
            Self::Rejected(failure) => Err(failure),
        }
    }
}

/// Static description of one server resource.
pub trait Resource: Send + Sync + 'static {
    /// Slice of the state tree this resource is cached in.
    const KEY: SliceKey;
    /// Singular human name used in banners ("Pet created").
    const LABEL: &'static str;

    const ENDPOINT: Endpoint = Self::KEY.endpoint();
    const ID_FIELD: &'static str = Self::KEY.id_field();
    /// Field single-record responses may be nested under.
    const ITEM_WRAPPER: &'static str = Self::KEY.item_wrapper();
}

/// A resource cached as a list of records, with the generic fetch and
/// mutation operations. Singleton aggregates such as the admin dashboard
/// are not collections and only carry their own fetches.
pub trait Collection: Resource {}

/// Cached copy of one server collection plus the operations that keep it
/// in sync. Cheap to clone.
pub struct EntityStore<R> {
    ctx: Arc<Context>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for EntityStore<R> {
    fn clone(&self) -> Self {
        Self {
            ctx: Arc::clone(&self.ctx),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> EntityStore<R> {
    pub(crate) fn new(ctx: Arc<Context>) -> Self {
        Self {
            ctx,
            _resource: PhantomData,
        }
    }

    pub fn key(&self) -> SliceKey {
        R::KEY
    }

    /// Current slice state.
    pub fn state(&self) -> Slice {
        self.ctx.store.snapshot().slice(R::KEY).clone()
    }

    /// Cached collection.
    pub fn items(&self) -> Vec<Record> {
        self.ctx.store.snapshot().slice(R::KEY).items.clone()
    }

    /// Cached record with identifier `id`, without a network round trip.
    pub fn cached(&self, id: &EntityId) -> Option<Record> {
        self.ctx
            .store
            .snapshot()
            .slice(R::KEY)
            .find(R::ID_FIELD, id)
            .cloned()
    }

    /// Filter, sort and paginate the cached collection.
    pub fn query(&self, query: &ListQuery) -> Page {
        query.apply(&self.ctx.store.snapshot().slice(R::KEY).items)
    }

    // ── Building blocks for domain operations ────────────────────────

    fn collection_url(&self) -> url::Url {
        self.ctx.endpoints.url(R::ENDPOINT)
    }

    fn member_url(&self, id: &EntityId) -> url::Url {
        let id = id.as_segment();
        self.ctx.endpoints.resource(R::ENDPOINT, &[id.as_str()])
    }

    fn action_url(&self, id: &EntityId, action: MemberAction) -> url::Url {
        let id = id.as_segment();
        self.ctx.endpoints.action(R::ENDPOINT, id.as_str(), action)
    }

    async fn fetch_list(
        &self,
        op: &'static str,
        url: url::Url,
    ) -> Result<Outcome<Vec<Record>>, CoreError> {
        let wrapper: &'static str = R::KEY.into();
        self.ctx
            .run(R::KEY, Request::get(op, url), |data| {
                let items = unwrap_list(data, wrapper);
                (Payload::Replace(items.clone()), items)
            })
            .await
    }

    async fn fetch_selected(
        &self,
        op: &'static str,
        url: url::Url,
    ) -> Result<Outcome<Option<Record>>, CoreError> {
        self.ctx
            .run(R::KEY, Request::get(op, url), |data| {
                let record = unwrap_single(data, R::ITEM_WRAPPER);
                (Payload::Select(record.clone()), record)
            })
            .await
    }

    /// Update-style operation at `url`: the response replaces the record
    /// with identifier `id`. A response without a record, or whose record
    /// carries another id, only settles the status.
    async fn update_at(
        &self,
        op: &'static str,
        method: Method,
        url: url::Url,
        id: &EntityId,
        body: Body,
        policy: NotifyPolicy,
    ) -> Result<Outcome<Option<Record>>, CoreError> {
        let id = id.clone();
        let request = Request::new(op, method, url, body).announce(policy);
        self.ctx
            .run(R::KEY, request, move |data| match identified::<R>(data) {
                Some(record) if record.has_id(R::ID_FIELD, &id) => (
                    Payload::ReplaceById {
                        id,
                        record: record.clone(),
                    },
                    Some(record),
                ),
                Some(record) => {
                    warn!(
                        slice = %R::KEY,
                        requested = %id,
                        "response names another record; cache left as is"
                    );
                    (Payload::Nothing, Some(record))
                }
                None => (Payload::Nothing, None),
            })
            .await
    }
}

// ── Generic operations ──────────────────────────────────────────────

impl<R: Collection> EntityStore<R> {
    /// Replace the collection with the server's.
    pub async fn fetch_all(&self) -> Result<Outcome<Vec<Record>>, CoreError> {
        self.fetch_list("fetch_all", self.collection_url()).await
    }

    /// Fetch-all with query parameters (filters understood by the server).
    pub async fn fetch_all_with(
        &self,
        params: &[(&str, &str)],
    ) -> Result<Outcome<Vec<Record>>, CoreError> {
        let url = with_query(self.collection_url(), params);
        self.fetch_list("fetch_all", url).await
    }

    /// Fetch one record into `selected`.
    pub async fn fetch_one(&self, id: &EntityId) -> Result<Outcome<Option<Record>>, CoreError> {
        let url = self.member_url(id);
        self.fetch_selected("fetch_one", url).await
    }

    /// Create a record and append the server's copy to the collection.
    pub async fn create(
        &self,
        body: impl Into<Body>,
    ) -> Result<Outcome<Option<Record>>, CoreError> {
        let request = Request::new("create", Method::POST, self.collection_url(), body)
            .announce(NotifyPolicy::announce(format!("{} created", R::LABEL)));
        self.ctx
            .run(R::KEY, request, |data| match identified::<R>(data) {
                Some(record) => (Payload::Append(record.clone()), Some(record)),
                None => (Payload::Nothing, None),
            })
            .await
    }

    /// Update a record and replace the cached copy in place.
    pub async fn update(
        &self,
        id: &EntityId,
        body: impl Into<Body>,
    ) -> Result<Outcome<Option<Record>>, CoreError> {
        let url = self.member_url(id);
        let policy = NotifyPolicy::announce(format!("{} updated", R::LABEL));
        self.update_at("update", Method::PUT, url, id, body.into(), policy)
            .await
    }

    /// Delete a record and drop it from the collection.
    pub async fn delete(&self, id: &EntityId) -> Result<Outcome<EntityId>, CoreError> {
        let request = Request::new(
            "delete",
            Method::DELETE,
            self.member_url(id),
            Body::Empty,
        )
        .announce(NotifyPolicy::announce(format!("{} deleted", R::LABEL)));
        let id = id.clone();
        self.ctx
            .run(R::KEY, request, move |_| (Payload::RemoveById(id.clone()), id))
            .await
    }
}

/// The record of a mutation response, if it carries an identifier.
/// Bodies such as `{ "message": "ok" }` are not records.
fn identified<R: Resource>(data: Value) -> Option<Record> {
    unwrap_single(data, R::ITEM_WRAPPER).filter(|record| record.id(R::ID_FIELD).is_some())
}
