// ── Marketplace resources ──
//
// Marker types binding each slice to its endpoint, plus the operations
// particular to one resource (adopt, cancel, checkout, ...).

use serde_json::{Value, json};

use pawmart_api::{Body, Endpoint, MemberAction, Method, with_query};

use super::{
    Collection, Context, EntityStore, Outcome, Request, Resource, identified, unwrap_list,
};
use crate::error::CoreError;
use crate::model::{EntityId, Record};
use crate::notify::{NotifyPolicy, Scope};
use crate::store::{Payload, SliceKey};

macro_rules! resource {
    (singleton $name:ident, $key:ident, $label:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl Resource for $name {
            const KEY: SliceKey = SliceKey::$key;
            const LABEL: &'static str = $label;
        }
    };
    ($name:ident, $key:ident, $label:literal) => {
        resource!(singleton $name, $key, $label);

        impl Collection for $name {}
    };
}

resource!(Pets, Pets, "Pet");
resource!(Products, Products, "Product");
resource!(Orders, Orders, "Order");
resource!(Cart, Cart, "Cart item");
resource!(Appointments, Appointments, "Appointment");
resource!(Blogs, Blogs, "Blog post");
resource!(Donations, Donations, "Donation");
resource!(Enquiries, Enquiries, "Enquiry");
resource!(Applications, Applications, "Application");
resource!(Users, Users, "Profile");
resource!(singleton Admin, Admin, "Dashboard");

// ── Pets ────────────────────────────────────────────────────────────

impl EntityStore<Pets> {
    /// Adopt a pet; the server returns the pet with its new owner.
    pub async fn adopt(&self, id: &EntityId) -> Result<Outcome<Option<Record>>, CoreError> {
        let url = self.action_url(id, MemberAction::Adopt);
        let policy = NotifyPolicy::announce("Adoption request sent");
        self.update_at("adopt", Method::PUT, url, id, Body::Empty, policy)
            .await
    }

    /// Replace the collection with the signed-in user's own pets.
    pub async fn fetch_mine(&self) -> Result<Outcome<Vec<Record>>, CoreError> {
        self.fetch_list("fetch_mine", self.ctx.endpoints.url(Endpoint::PetsMine))
            .await
    }
}

// ── Products ────────────────────────────────────────────────────────

impl EntityStore<Products> {
    /// Replace the collection with one seller's listings.
    pub async fn fetch_by_seller(
        &self,
        seller: &EntityId,
    ) -> Result<Outcome<Vec<Record>>, CoreError> {
        let seller = seller.as_segment();
        let url = with_query(self.collection_url(), &[("seller", seller.as_str())]);
        self.fetch_list("fetch_by_seller", url).await
    }
}

// ── Orders ──────────────────────────────────────────────────────────

impl EntityStore<Orders> {
    pub async fn cancel(&self, id: &EntityId) -> Result<Outcome<Option<Record>>, CoreError> {
        let url = self.action_url(id, MemberAction::Cancel);
        let policy = NotifyPolicy::announce("Order cancelled");
        self.update_at("cancel", Method::PUT, url, id, Body::Empty, policy)
            .await
    }

    /// Replace the collection with the signed-in user's orders.
    pub async fn fetch_mine(&self) -> Result<Outcome<Vec<Record>>, CoreError> {
        self.fetch_list("fetch_mine", self.ctx.endpoints.url(Endpoint::OrdersMine))
            .await
    }
}

// ── Cart ────────────────────────────────────────────────────────────

/// Cart mutations may answer with the whole cart or with the touched
/// item. A whole cart replaces the collection; an item goes through
/// `single`.
fn cart_payload(data: Value, single: impl FnOnce(Record) -> Payload) -> Payload {
    let whole_cart = match &data {
        Value::Array(_) => true,
        Value::Object(map) => ["cart", "items"]
            .iter()
            .any(|key| map.get(*key).is_some_and(Value::is_array)),
        _ => false,
    };
    if whole_cart {
        return Payload::Replace(unwrap_list(data, "cart"));
    }
    identified::<Cart>(data).map_or(Payload::Nothing, single)
}

impl EntityStore<Cart> {
    pub async fn add_item(
        &self,
        product: &EntityId,
        quantity: u32,
    ) -> Result<Outcome<()>, CoreError> {
        let body = json!({ "productId": product, "quantity": quantity });
        let request = Request::new("add_item", Method::POST, self.collection_url(), body)
            .announce(NotifyPolicy::announce("Added to cart"));
        self.ctx
            .run(SliceKey::Cart, request, |data| {
                (cart_payload(data, Payload::Append), ())
            })
            .await
    }

    pub async fn set_quantity(
        &self,
        item: &EntityId,
        quantity: u32,
    ) -> Result<Outcome<()>, CoreError> {
        let id = item.clone();
        let request = Request::new(
            "set_quantity",
            Method::PUT,
            self.member_url(item),
            json!({ "quantity": quantity }),
        );
        self.ctx
            .run(SliceKey::Cart, request, move |data| {
                let payload = cart_payload(data, |record| {
                    if record.has_id(Cart::ID_FIELD, &id) {
                        Payload::ReplaceById { id, record }
                    } else {
                        Payload::Nothing
                    }
                });
                (payload, ())
            })
            .await
    }

    pub async fn remove_item(&self, item: &EntityId) -> Result<Outcome<()>, CoreError> {
        let id = item.clone();
        let request = Request::new(
            "remove_item",
            Method::DELETE,
            self.member_url(item),
            Body::Empty,
        )
        .announce(NotifyPolicy::announce("Removed from cart"));
        self.ctx
            .run(SliceKey::Cart, request, move |_| (Payload::RemoveById(id), ()))
            .await
    }

    /// Empty the cart on the server and locally.
    pub async fn clear(&self) -> Result<Outcome<()>, CoreError> {
        let request = Request::new("clear", Method::DELETE, self.collection_url(), Body::Empty)
            .announce(NotifyPolicy::announce("Cart cleared"));
        self.ctx
            .run(SliceKey::Cart, request, |_| (Payload::Clear, ()))
            .await
    }

    /// Place an order for the cart's contents.
    ///
    /// Both the orders and cart slices go through the pending phase. On
    /// success the new order is appended and the cart emptied; on failure
    /// both slices record the failure and keep their collections.
    pub async fn checkout(&self, body: impl Into<Body>) -> Result<Outcome<Option<Record>>, CoreError> {
        const OP: &str = "checkout";
        let ctx: &Context = &self.ctx;

        let request = ctx.begin(SliceKey::Orders, OP)?;
        let cart_request = ctx.begin(SliceKey::Cart, OP)?;

        let url = ctx.endpoints.url(Endpoint::Orders);
        let policy = NotifyPolicy::announce("Order placed");
        match ctx.call(Method::POST, url, body.into()).await {
            Ok(data) => {
                let order = identified::<Orders>(data);
                let payload = order.clone().map_or(Payload::Nothing, Payload::Append);
                let orders = ctx.finish(SliceKey::Orders, OP, request, Ok(payload));
                let cart = ctx.finish(SliceKey::Cart, OP, cart_request, Ok(Payload::Clear));
                orders.and(cart)?;
                ctx.publish(Scope::Slice(SliceKey::Orders), OP, request, Ok(()), policy);
                Ok(Outcome::Fulfilled(order))
            }
            Err(failure) => {
                let orders = ctx.finish(SliceKey::Orders, OP, request, Err(failure.clone()));
                let cart = ctx.finish(SliceKey::Cart, OP, cart_request, Err(failure.clone()));
                orders.and(cart)?;
                ctx.publish(
                    Scope::Slice(SliceKey::Orders),
                    OP,
                    request,
                    Err(failure.clone()),
                    policy,
                );
                Ok(Outcome::Rejected(failure))
            }
        }
    }
}

// ── Appointments ────────────────────────────────────────────────────

impl EntityStore<Appointments> {
    pub async fn cancel(&self, id: &EntityId) -> Result<Outcome<Option<Record>>, CoreError> {
        let url = self.action_url(id, MemberAction::Cancel);
        let policy = NotifyPolicy::announce("Appointment cancelled");
        self.update_at("cancel", Method::PUT, url, id, Body::Empty, policy)
            .await
    }

    /// Replace the collection with one vet's schedule.
    pub async fn fetch_for_vet(&self, vet: &EntityId) -> Result<Outcome<Vec<Record>>, CoreError> {
        let vet = vet.as_segment();
        let url = self
            .ctx
            .endpoints
            .resource(Endpoint::VetAppointments, &[vet.as_str()]);
        self.fetch_list("fetch_for_vet", url).await
    }
}

// ── Enquiries ───────────────────────────────────────────────────────

impl EntityStore<Enquiries> {
    /// Answer an enquiry.
    pub async fn respond(
        &self,
        id: &EntityId,
        body: impl Into<Body>,
    ) -> Result<Outcome<Option<Record>>, CoreError> {
        let url = self.action_url(id, MemberAction::Respond);
        let policy = NotifyPolicy::announce("Response sent");
        self.update_at("respond", Method::PUT, url, id, body.into(), policy)
            .await
    }
}

// ── Adoption applications ───────────────────────────────────────────

impl EntityStore<Applications> {
    pub async fn approve(&self, id: &EntityId) -> Result<Outcome<Option<Record>>, CoreError> {
        let url = self.action_url(id, MemberAction::Approve);
        let policy = NotifyPolicy::announce("Application approved");
        self.update_at("approve", Method::PUT, url, id, Body::Empty, policy)
            .await
    }

    pub async fn reject(&self, id: &EntityId) -> Result<Outcome<Option<Record>>, CoreError> {
        let url = self.action_url(id, MemberAction::Reject);
        let policy = NotifyPolicy::announce("Application rejected");
        self.update_at("reject", Method::PUT, url, id, Body::Empty, policy)
            .await
    }
}

// ── Users ───────────────────────────────────────────────────────────

impl EntityStore<Users> {
    /// Fetch the signed-in user's profile into `selected`.
    pub async fn fetch_profile(&self) -> Result<Outcome<Option<Record>>, CoreError> {
        self.fetch_selected("fetch_profile", self.ctx.endpoints.url(Endpoint::UserProfile))
            .await
    }

    /// Update the signed-in user's profile; the server's copy becomes
    /// `selected`. Photos travel as a multipart attachment.
    pub async fn update_profile(
        &self,
        body: impl Into<Body>,
    ) -> Result<Outcome<Option<Record>>, CoreError> {
        let request = Request::new(
            "update_profile",
            Method::PUT,
            self.ctx.endpoints.url(Endpoint::UserProfile),
            body,
        )
        .announce(NotifyPolicy::announce("Profile updated"));
        self.ctx
            .run(SliceKey::Users, request, |data| {
                match super::unwrap_single(data, Users::ITEM_WRAPPER) {
                    Some(record) => (Payload::Select(Some(record.clone())), Some(record)),
                    None => (Payload::Nothing, None),
                }
            })
            .await
    }
}

// ── Admin ───────────────────────────────────────────────────────────

impl EntityStore<Admin> {
    /// Fetch the dashboard aggregate into `selected`.
    pub async fn fetch_dashboard(&self) -> Result<Outcome<Option<Record>>, CoreError> {
        self.fetch_selected("fetch_dashboard", self.ctx.endpoints.url(Endpoint::AdminDashboard))
            .await
    }

    /// Fetch the marketplace summary into `selected`.
    pub async fn fetch_summary(&self) -> Result<Outcome<Option<Record>>, CoreError> {
        self.fetch_selected("fetch_summary", self.ctx.endpoints.url(Endpoint::Summary))
            .await
    }

    /// Current aggregate, if fetched.
    pub fn aggregate(&self) -> Option<Record> {
        self.state().selected
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use pawmart_api::{Endpoints, Gateway, TransportConfig};

    use crate::notify::Notifier;
    use crate::store::{Action, Middleware, RequestId, RootState, Status, Store};

    /// Slice, phase and request id of every lifecycle action.
    #[derive(Default)]
    struct RequestLog(Mutex<Vec<(SliceKey, &'static str, RequestId)>>);

    impl Middleware for RequestLog {
        fn before(&self, action: &Action) -> Result<(), CoreError> {
            let entry = match action {
                Action::Pending { slice, request, .. } => (*slice, "pending", *request),
                Action::Fulfilled { slice, request, .. } => (*slice, "fulfilled", *request),
                Action::Rejected { slice, request, .. } => (*slice, "rejected", *request),
                Action::Auth(_) | Action::Reset(_) => return Ok(()),
            };
            self.0.lock().unwrap().push(entry);
            Ok(())
        }
    }

    fn cart_store(server: &MockServer, log: &Arc<RequestLog>) -> EntityStore<Cart> {
        let store = Store::new(RootState::default())
            .with_middleware(Arc::clone(log) as Arc<dyn Middleware>);
        EntityStore::new(Arc::new(Context {
            gateway: Gateway::new(&TransportConfig::default()).unwrap(),
            endpoints: Endpoints::parse(&server.uri()).unwrap(),
            store: Arc::new(store),
            notifier: Notifier::new(),
        }))
    }

    fn ids_for(log: &RequestLog, slice: SliceKey) -> Vec<(&'static str, RequestId)> {
        log.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(key, _, _)| *key == slice)
            .map(|(_, phase, id)| (*phase, *id))
            .collect()
    }

    #[tokio::test]
    async fn checkout_pairs_request_ids_per_slice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/orders"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({ "order": { "_id": "o1" } })),
            )
            .mount(&server)
            .await;
        let log = Arc::new(RequestLog::default());
        let cart = cart_store(&server, &log);

        let outcome = cart.checkout(json!({ "shippingAddress": "1 Bark St" })).await.unwrap();
        assert!(outcome.is_fulfilled());
        assert_eq!(cart.state().status, Status::Succeeded);

        let orders = ids_for(&log, SliceKey::Orders);
        let carts = ids_for(&log, SliceKey::Cart);
        assert_eq!(orders.len(), 2);
        assert_eq!(carts.len(), 2);
        assert_eq!((orders[0].0, orders[1].0), ("pending", "fulfilled"));
        assert_eq!((carts[0].0, carts[1].0), ("pending", "fulfilled"));
        assert_eq!(orders[0].1, orders[1].1);
        assert_eq!(carts[0].1, carts[1].1);
        assert_ne!(orders[0].1, carts[0].1);
    }

    #[tokio::test]
    async fn quantity_reply_for_another_item_is_not_merged() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cart"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({ "_id": "c1", "quantity": 1 })),
            )
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/cart/c1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "_id": "c2", "quantity": 5 })),
            )
            .mount(&server)
            .await;
        let log = Arc::new(RequestLog::default());
        let cart = cart_store(&server, &log);

        cart.add_item(&EntityId::from("p1"), 1).await.unwrap();
        let outcome = cart.set_quantity(&EntityId::from("c1"), 5).await.unwrap();

        assert!(outcome.is_fulfilled());
        assert_eq!(
            cart.items(),
            vec![Record::new().with("_id", "c1").with("quantity", 1)]
        );
        assert_eq!(cart.state().status, Status::Succeeded);
    }

    #[test]
    fn resources_bind_their_slices() {
        assert_eq!(Pets::KEY, SliceKey::Pets);
        assert_eq!(Pets::ID_FIELD, "petId");
        assert_eq!(Products::ID_FIELD, "productId");
        assert_eq!(Orders::ITEM_WRAPPER, "order");
        assert_eq!(Admin::ENDPOINT, Endpoint::AdminDashboard);
    }

    #[test]
    fn whole_cart_response_replaces() {
        let payload = cart_payload(
            json!({ "cart": [{ "_id": "c1" }, { "_id": "c2" }] }),
            Payload::Append,
        );
        assert!(matches!(payload, Payload::Replace(items) if items.len() == 2));
    }

    #[test]
    fn single_item_response_goes_through_merge() {
        let payload = cart_payload(json!({ "item": { "_id": "c1", "quantity": 2 } }), Payload::Append);
        let Payload::Append(record) = payload else {
            panic!("expected append, got {payload:?}");
        };
        assert_eq!(record.i64_field("quantity"), Some(2));

        let payload = cart_payload(json!({ "message": "ok" }), Payload::Append);
        assert_eq!(payload, Payload::Nothing);
    }
}
