// ── Reactive state streams ──
//
// Subscription types for consuming committed snapshots from the Store.

mod query;

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::RootState;

pub use query::{ListQuery, Page, SortOrder};

/// A subscription to the state tree.
///
/// Provides both point-in-time snapshot access and change notification
/// via [`changed()`](Self::changed) or by converting to a `Stream`.
/// Dropping it never affects the store.
pub struct StateStream {
    current: Arc<RootState>,
    receiver: watch::Receiver<Arc<RootState>>,
}

impl StateStream {
    pub(crate) fn new(receiver: watch::Receiver<Arc<RootState>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Snapshot captured at creation or at the last `changed()`.
    pub fn current(&self) -> &Arc<RootState> {
        &self.current
    }

    /// Latest committed snapshot.
    pub fn latest(&self) -> Arc<RootState> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next committed change, returning the new snapshot.
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<RootState>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> StateWatchStream {
        StateWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields the current snapshot first, then one per committed change.
pub struct StateWatchStream {
    inner: WatchStream<Arc<RootState>>,
}

impl Stream for StateWatchStream {
    type Item = Arc<RootState>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use futures_util::StreamExt;

    use crate::store::{Action, RequestId, SliceKey, Status, Store};

    fn pending(slice: SliceKey) -> Action {
        Action::Pending {
            slice,
            op: "fetch_all",
            request: RequestId::next(),
        }
    }

    #[tokio::test]
    async fn stream_yields_current_then_changes() {
        let store = Store::default();
        let mut stream = store.subscribe().into_stream();

        let first = stream.next().await.unwrap();
        assert_eq!(first.cart.status, Status::Idle);

        store.dispatch(pending(SliceKey::Cart)).unwrap();
        let second = stream.next().await.unwrap();
        assert_eq!(second.cart.status, Status::Loading);
    }

    #[tokio::test]
    async fn latest_moves_ahead_of_current() {
        let store = Store::default();
        let stream = store.subscribe();
        store.dispatch(pending(SliceKey::Blogs)).unwrap();

        assert_eq!(stream.current().blogs.status, Status::Idle);
        assert_eq!(stream.latest().blogs.status, Status::Loading);
    }
}
