// ── Reactive store streams ──
//
// Subscription handle vended by every store.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// A subscription to one store's state.
///
/// Provides both point-in-time snapshot access and change notification
/// via [`changed()`](Self::changed) or by converting to a `Stream`.
pub struct StoreStream<S: Send + Sync + 'static> {
    current: Arc<S>,
    receiver: watch::Receiver<Arc<S>>,
}

impl<S: Send + Sync + 'static> StoreStream<S> {
    pub(crate) fn new(receiver: watch::Receiver<Arc<S>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation (or at the last `changed()`).
    pub fn current(&self) -> &Arc<S> {
        &self.current
    }

    /// The latest snapshot, which may be newer than `current()`.
    pub fn latest(&self) -> Arc<S> {
        self.receiver.borrow().clone()
    }

    /// Whether a mutation has been published since the last `changed()`.
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }

    /// Wait for the next mutation and return the new snapshot.
    /// Returns `None` once the owning store has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<S>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = Arc::clone(&snap);
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    /// The first item is the snapshot at conversion time.
    pub fn into_stream(self) -> StoreWatchStream<S> {
        StoreWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct StoreWatchStream<S: Send + Sync + 'static> {
    inner: WatchStream<Arc<S>>,
}

impl<S: Send + Sync + 'static> Stream for StoreWatchStream<S> {
    type Item = Arc<S>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // Arc<S> is always Unpin, so WatchStream is too.
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
