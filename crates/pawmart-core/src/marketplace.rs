// ── Marketplace client ──
//
// Explicit context constructed once at startup: the gateway, endpoint
// registry, root store and notifier, with a typed entity store per
// resource vended on demand.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::debug;

use pawmart_api::{Endpoints, Gateway, TransportConfig};

use crate::auth::AuthStore;
use crate::config::ClientConfig;
use crate::entity::{
    Admin, Applications, Appointments, Blogs, Cart, Context, Donations, Enquiries, EntityStore,
    Orders, Pets, Products, Users,
};
use crate::error::CoreError;
use crate::notify::{Notifier, OperationEvent};
use crate::persist::{FileStorage, MemoryStorage, PersistenceMiddleware, Persistor, Storage};
use crate::store::{RootState, Store};
use crate::stream::StateStream;

/// The main entry point for consumers.
///
/// Cheaply cloneable. Every clone shares one state tree, one cookie jar
/// and one credential.
#[derive(Clone)]
pub struct Marketplace {
    inner: Arc<MarketplaceInner>,
}

struct MarketplaceInner {
    config: ClientConfig,
    ctx: Arc<Context>,
    persistor: Arc<Persistor>,
}

impl Marketplace {
    /// Build a client from configuration: transport, file or memory
    /// storage per `state_path`, then rehydration.
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: config.tls.clone(),
            ..TransportConfig::with_timeout(config.timeout)
        };
        let gateway = Gateway::new(&transport)?;
        let storage: Arc<dyn Storage> = match &config.state_path {
            Some(dir) => Arc::new(FileStorage::new(dir)),
            None => Arc::new(MemoryStorage::new()),
        };
        Self::from_parts(config, gateway, storage)
    }

    /// Build a client around an existing gateway and storage backend.
    ///
    /// Persisted state is loaded before the store exists, so the first
    /// snapshot any subscriber sees already carries the session.
    pub fn from_parts(
        config: ClientConfig,
        gateway: Gateway,
        storage: Arc<dyn Storage>,
    ) -> Result<Self, CoreError> {
        let endpoints = Endpoints::new(config.api_url.clone())?;
        let persistor = Arc::new(Persistor::new(storage, config.persist.clone()));
        let initial = persistor.rehydrate()?;

        let store = Store::new(initial)
            .with_middleware(Arc::new(PersistenceMiddleware::new(Arc::clone(&persistor))));
        let ctx = Arc::new(Context {
            gateway,
            endpoints,
            store: Arc::new(store),
            notifier: Notifier::new(),
        });

        let marketplace = Self {
            inner: Arc::new(MarketplaceInner {
                config,
                ctx,
                persistor,
            }),
        };
        marketplace.auth().restore_credential();
        debug!(
            api_url = %marketplace.inner.config.api_url,
            authenticated = marketplace.auth().is_authenticated(),
            "marketplace client ready"
        );
        Ok(marketplace)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The root state container.
    pub fn store(&self) -> &Arc<Store> {
        &self.inner.ctx.store
    }

    /// Current committed tree.
    pub fn snapshot(&self) -> Arc<RootState> {
        self.inner.ctx.store.snapshot()
    }

    /// Subscribe to committed snapshots.
    pub fn subscribe(&self) -> StateStream {
        self.inner.ctx.store.subscribe()
    }

    /// Subscribe to operation completions (for banners). Headless callers
    /// need not subscribe.
    pub fn notifications(&self) -> broadcast::Receiver<OperationEvent> {
        self.inner.ctx.notifier.subscribe()
    }

    /// Delete the persisted snapshot. The in-memory tree is untouched.
    pub fn purge_persisted(&self) -> Result<(), CoreError> {
        self.inner.persistor.purge()
    }

    // ── Stores ───────────────────────────────────────────────────────

    pub fn auth(&self) -> AuthStore {
        AuthStore::new(Arc::clone(&self.inner.ctx))
    }

    pub fn pets(&self) -> EntityStore<Pets> {
        self.entity()
    }

    pub fn products(&self) -> EntityStore<Products> {
        self.entity()
    }

    pub fn orders(&self) -> EntityStore<Orders> {
        self.entity()
    }

    pub fn cart(&self) -> EntityStore<Cart> {
        self.entity()
    }

    pub fn appointments(&self) -> EntityStore<Appointments> {
        self.entity()
    }

    pub fn blogs(&self) -> EntityStore<Blogs> {
        self.entity()
    }

    pub fn donations(&self) -> EntityStore<Donations> {
        self.entity()
    }

    pub fn enquiries(&self) -> EntityStore<Enquiries> {
        self.entity()
    }

    pub fn applications(&self) -> EntityStore<Applications> {
        self.entity()
    }

    pub fn users(&self) -> EntityStore<Users> {
        self.entity()
    }

    pub fn admin(&self) -> EntityStore<Admin> {
        self.entity()
    }

    fn entity<R: crate::entity::Resource>(&self) -> EntityStore<R> {
        EntityStore::new(Arc::clone(&self.inner.ctx))
    }
}
