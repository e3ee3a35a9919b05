// ── Root state container ──
//
// Single owner of the state tree. Dispatch is the only write path:
// middleware `before` hooks, an atomic reduce-and-commit under the watch
// channel's write lock, then middleware `after` hooks.

use std::sync::Arc;

use tokio::sync::watch;

use super::action::Action;
use super::middleware::{LoggingMiddleware, Middleware};
use super::reducer;
use super::state::RootState;
use crate::error::CoreError;
use crate::stream::StateStream;

/// Composes every slice into one tree and broadcasts each committed
/// snapshot to subscribers.
///
/// Dispatches from concurrent tasks are serialized; each reduces against
/// the snapshot left by the previous one.
pub struct Store {
    state: watch::Sender<Arc<RootState>>,
    middleware: Vec<Arc<dyn Middleware>>,
}

impl Store {
    /// Create a store seeded with `initial`, with diagnostic logging
    /// installed as the first middleware.
    pub fn new(initial: RootState) -> Self {
        let (state, _) = watch::channel(Arc::new(initial));
        Self {
            state,
            middleware: vec![Arc::new(LoggingMiddleware)],
        }
    }

    /// Append a middleware after the ones already installed.
    pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Current committed tree (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<RootState> {
        self.state.borrow().clone()
    }

    /// Subscribe to committed snapshots.
    pub fn subscribe(&self) -> StateStream {
        StateStream::new(self.state.subscribe())
    }

    /// Reduce one action into the tree.
    ///
    /// A reducer error leaves the tree untouched, skips the `after` hooks
    /// and is returned to the caller. Subscribers are only woken when the
    /// tree actually changed.
    pub fn dispatch(&self, action: Action) -> Result<(), CoreError> {
        for middleware in &self.middleware {
            middleware.before(&action)?;
        }

        let mut failure = None;
        let mut committed = None;
        self.state.send_if_modified(|current| {
            let mut next = RootState::clone(current);
            match reducer::reduce(&mut next, &action) {
                Ok(()) => {
                    let changed = next != **current;
                    if changed {
                        *current = Arc::new(next);
                    }
                    committed = Some(Arc::clone(current));
                    changed
                }
                Err(e) => {
                    failure = Some(e);
                    false
                }
            }
        });

        if let Some(err) = failure {
            return Err(err);
        }

        if let Some(state) = committed {
            for middleware in &self.middleware {
                middleware.after(&action, &state)?;
            }
        }
        Ok(())
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(RootState::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::model::Record;
    use crate::store::action::{Payload, RequestId};
    use crate::store::state::{SliceKey, Status};

    #[derive(Default)]
    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Middleware for Recorder {
        fn before(&self, _action: &Action) -> Result<(), CoreError> {
            self.log.lock().unwrap().push(format!("{}:before", self.name));
            Ok(())
        }

        fn after(&self, _action: &Action, _state: &RootState) -> Result<(), CoreError> {
            self.log.lock().unwrap().push(format!("{}:after", self.name));
            Ok(())
        }
    }

    struct Failing;

    impl Middleware for Failing {
        fn after(&self, _action: &Action, _state: &RootState) -> Result<(), CoreError> {
            Err(CoreError::Persistence {
                message: "disk full".into(),
            })
        }
    }

    fn pending(slice: SliceKey) -> Action {
        Action::Pending {
            slice,
            op: "fetch_all",
            request: RequestId::next(),
        }
    }

    #[test]
    fn dispatch_updates_snapshot() {
        let store = Store::default();
        store.dispatch(pending(SliceKey::Pets)).unwrap();
        assert_eq!(store.snapshot().pets.status, Status::Loading);
    }

    #[test]
    fn middleware_runs_in_installation_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let store = Store::default()
            .with_middleware(Arc::new(Recorder {
                name: "first",
                log: Arc::clone(&log),
            }))
            .with_middleware(Arc::new(Recorder {
                name: "second",
                log: Arc::clone(&log),
            }));

        store.dispatch(pending(SliceKey::Pets)).unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["first:before", "second:before", "first:after", "second:after"]
        );
    }

    #[test]
    fn reducer_error_leaves_tree_untouched_and_skips_after() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let store = Store::default().with_middleware(Arc::new(Recorder {
            name: "rec",
            log: Arc::clone(&log),
        }));
        let before = store.snapshot();

        let result = store.dispatch(Action::Fulfilled {
            slice: SliceKey::Admin,
            op: "bad",
            request: RequestId::next(),
            payload: Payload::Append(Record::new()),
        });

        assert!(matches!(result, Err(CoreError::Reducer { .. })));
        assert_eq!(*store.snapshot(), *before);
        assert_eq!(*log.lock().unwrap(), vec!["rec:before"]);
    }

    #[test]
    fn middleware_errors_are_not_swallowed() {
        let store = Store::default().with_middleware(Arc::new(Failing));
        let result = store.dispatch(pending(SliceKey::Cart));
        assert!(matches!(result, Err(CoreError::Persistence { .. })));
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let store = Store::default();
        let mut stream = store.subscribe();
        assert_eq!(stream.current().pets.status, Status::Idle);

        store.dispatch(pending(SliceKey::Pets)).unwrap();
        let next = stream.changed().await.unwrap();
        assert_eq!(next.pets.status, Status::Loading);
    }

    #[test]
    fn dispatch_without_subscribers_does_not_fail() {
        let store = Store::default();
        drop(store.subscribe());
        store.dispatch(pending(SliceKey::Orders)).unwrap();
        store.dispatch(pending(SliceKey::Orders)).unwrap();
        assert_eq!(store.snapshot().orders.status, Status::Loading);
    }
}
