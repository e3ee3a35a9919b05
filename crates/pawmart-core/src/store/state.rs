// ── State tree ──
//
// One `Slice` per entity store plus the auth slice, composed into
// `RootState`. Only the reducer mutates these.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use pawmart_api::Endpoint;

use super::failure::FailurePayload;
use crate::model::{AuthSession, Record};

/// Names every entity slice in the state tree.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SliceKey {
    Pets,
    Products,
    Orders,
    Cart,
    Appointments,
    Blogs,
    Donations,
    Enquiries,
    Applications,
    Users,
    Admin,
}

impl SliceKey {
    /// Collection endpoint backing this slice.
    pub const fn endpoint(self) -> Endpoint {
        match self {
            Self::Pets => Endpoint::Pets,
            Self::Products => Endpoint::Products,
            Self::Orders => Endpoint::Orders,
            Self::Cart => Endpoint::Cart,
            Self::Appointments => Endpoint::Appointments,
            Self::Blogs => Endpoint::Blogs,
            Self::Donations => Endpoint::Donations,
            Self::Enquiries => Endpoint::Enquiries,
            Self::Applications => Endpoint::Applications,
            Self::Users => Endpoint::Users,
            Self::Admin => Endpoint::AdminDashboard,
        }
    }

    /// Field holding the server-assigned identifier; the sole key for
    /// update/delete merges.
    pub const fn id_field(self) -> &'static str {
        match self {
            Self::Pets => "petId",
            Self::Products => "productId",
            _ => "_id",
        }
    }

    /// Field name under which single-record responses may be wrapped
    /// (`{ "order": { ... } }`).
    pub const fn item_wrapper(self) -> &'static str {
        match self {
            Self::Pets => "pet",
            Self::Products => "product",
            Self::Orders => "order",
            Self::Cart => "item",
            Self::Appointments => "appointment",
            Self::Blogs => "blog",
            Self::Donations => "donation",
            Self::Enquiries => "enquiry",
            Self::Applications => "application",
            Self::Users => "user",
            Self::Admin => "summary",
        }
    }

    /// Whether the slice holds one aggregate in `selected` rather than a
    /// collection.
    pub const fn is_singleton(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Whether the slice holds data private to the signed-in user and must
    /// be reset on logout. Public catalogue slices survive.
    pub const fn is_session_scoped(self) -> bool {
        !matches!(self, Self::Pets | Self::Products | Self::Blogs)
    }
}

/// Lifecycle of the most recent operation on a slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Status {
    #[default]
    Idle,
    /// An operation is in flight (the pending phase).
    Loading,
    Succeeded,
    Failed,
}

/// Cached server state for one resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slice {
    pub status: Status,
    /// Last failure; only meaningful while `status == Failed`.
    pub error: Option<FailurePayload>,
    /// Cached collection, in server order.
    pub items: Vec<Record>,
    /// The currently selected record (fetch-by-id) or singleton aggregate.
    pub selected: Option<Record>,
}

impl Slice {
    pub fn with_items(items: Vec<Record>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    /// Find a cached record by identifier.
    pub fn find(&self, id_field: &str, id: &crate::model::EntityId) -> Option<&Record> {
        self.items.iter().find(|r| r.has_id(id_field, id))
    }
}

/// Authentication slice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub status: Status,
    pub error: Option<FailurePayload>,
    pub session: Option<AuthSession>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

/// The whole client-side state tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootState {
    pub auth: AuthState,
    pub pets: Slice,
    pub products: Slice,
    pub orders: Slice,
    pub cart: Slice,
    pub appointments: Slice,
    pub blogs: Slice,
    pub donations: Slice,
    pub enquiries: Slice,
    pub applications: Slice,
    pub users: Slice,
    pub admin: Slice,
}

impl RootState {
    pub fn slice(&self, key: SliceKey) -> &Slice {
        match key {
            SliceKey::Pets => &self.pets,
            SliceKey::Products => &self.products,
            SliceKey::Orders => &self.orders,
            SliceKey::Cart => &self.cart,
            SliceKey::Appointments => &self.appointments,
            SliceKey::Blogs => &self.blogs,
            SliceKey::Donations => &self.donations,
            SliceKey::Enquiries => &self.enquiries,
            SliceKey::Applications => &self.applications,
            SliceKey::Users => &self.users,
            SliceKey::Admin => &self.admin,
        }
    }

    pub(crate) fn slice_mut(&mut self, key: SliceKey) -> &mut Slice {
        match key {
            SliceKey::Pets => &mut self.pets,
            SliceKey::Products => &mut self.products,
            SliceKey::Orders => &mut self.orders,
            SliceKey::Cart => &mut self.cart,
            SliceKey::Appointments => &mut self.appointments,
            SliceKey::Blogs => &mut self.blogs,
            SliceKey::Donations => &mut self.donations,
            SliceKey::Enquiries => &mut self.enquiries,
            SliceKey::Applications => &mut self.applications,
            SliceKey::Users => &mut self.users,
            SliceKey::Admin => &mut self.admin,
        }
    }
}
