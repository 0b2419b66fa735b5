// ── Generic reactive slice ──
//
// One `watch` channel holding an `Arc<S>` snapshot. Each mutation
// replaces the whole snapshot atomically; readers never see a
// half-applied update.

use std::sync::Arc;

use tokio::sync::watch;

use crate::stream::StoreStream;

pub(crate) struct Slice<S: Send + Sync + 'static> {
    state: watch::Sender<Arc<S>>,
}

impl<S: Send + Sync + 'static> Slice<S> {
    pub(crate) fn new(initial: S) -> Self {
        let (state, _) = watch::channel(Arc::new(initial));
        Self { state }
    }

    /// Current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<S> {
        self.state.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> StoreStream<S> {
        StoreStream::new(self.state.subscribe())
    }

    /// Compute the next state from the current one and publish it.
    ///
    /// Returns `false` (and notifies nobody) when `next` returns `None`,
    /// which reducers use to signal a no-op.
    pub(crate) fn update(&self, next: impl FnOnce(&S) -> Option<S>) -> bool {
        // `send_if_modified` publishes even with zero receivers.
        self.state.send_if_modified(|snap| match next(snap) {
            Some(state) => {
                *snap = Arc::new(state);
                true
            }
            None => false,
        })
    }

    /// Run a pure transition and publish the result if it differs from
    /// the current state.
    pub(crate) fn apply(&self, reduce: impl FnOnce(&S) -> S) -> bool
    where
        S: PartialEq,
    {
        self.update(|current| {
            let next = reduce(current);
            (next != *current).then_some(next)
        })
    }

    /// Like [`apply`](Self::apply), but hands the resulting state and the
    /// changed flag to `commit` while the channel is still write-locked.
    /// Concurrent transitions therefore commit in the order they publish.
    ///
    /// `commit` must not touch this slice.
    pub(crate) fn apply_and_commit(
        &self,
        reduce: impl FnOnce(&S) -> S,
        commit: impl FnOnce(&S, bool),
    ) -> bool
    where
        S: PartialEq,
    {
        self.state.send_if_modified(|snap| {
            let next = reduce(snap);
            let changed = next != **snap;
            if changed {
                *snap = Arc::new(next);
            }
            commit(snap, changed);
            changed
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn update_notifies_subscribers() {
        let slice = Slice::new(1_u32);
        let mut stream = slice.subscribe();

        assert!(slice.update(|n| Some(n + 1)));
        assert_eq!(stream.changed().await.as_deref(), Some(&2));
        assert_eq!(**stream.current(), 2);
    }

    #[tokio::test]
    async fn no_op_update_does_not_notify() {
        let slice = Slice::new(1_u32);
        let stream = slice.subscribe();

        assert!(!slice.update(|_| None));
        assert!(!slice.apply(|n| *n));
        assert!(!stream.has_changed());
        assert_eq!(*slice.snapshot(), 1);
    }

    #[test]
    fn commit_sees_published_state_even_without_change() {
        let slice = Slice::new(1_u32);
        let mut seen = Vec::new();

        assert!(slice.apply_and_commit(|n| n + 1, |n, changed| seen.push((*n, changed))));
        assert!(!slice.apply_and_commit(|n| *n, |n, changed| seen.push((*n, changed))));
        assert_eq!(seen, vec![(2, true), (2, false)]);
    }
}
