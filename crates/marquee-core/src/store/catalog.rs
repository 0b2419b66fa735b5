// ── Catalog cache ──
//
// Last-fetched result set per category plus a loading flag and an error
// message. Not persisted. Each setter fully replaces its category; there
// is no merge or dedup logic here.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::model::{CatalogCategory, MovieDetail, MovieSummary};
use crate::stream::StoreStream;

use super::slice::Slice;

/// One category's results.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub items: Vec<MovieSummary>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogState {
    pub entries: BTreeMap<CatalogCategory, Arc<CatalogEntry>>,
    /// Full record behind the `detail` category.
    pub detail: Option<Arc<MovieDetail>>,
    pub loading: bool,
    pub error: Option<String>,
}

impl CatalogState {
    pub fn entry(&self, category: CatalogCategory) -> Option<&Arc<CatalogEntry>> {
        self.entries.get(&category)
    }

    /// Items for a category; empty when never fetched.
    pub fn items(&self, category: CatalogCategory) -> &[MovieSummary] {
        self.entries
            .get(&category)
            .map_or(&[], |entry| entry.items.as_slice())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogAction {
    SetResults {
        category: CatalogCategory,
        items: Vec<MovieSummary>,
        fetched_at: DateTime<Utc>,
    },
    SetDetail {
        detail: MovieDetail,
        fetched_at: DateTime<Utc>,
    },
    ClearSearch,
    SetLoading(bool),
    /// Records the message and ends loading. Cached results are kept.
    SetError(String),
    /// Records the message and leaves `loading` alone, for callers that
    /// settle the flag themselves.
    RecordError(String),
    ClearError,
    ClearAll,
}

/// Pure catalog transition.
pub fn reduce(state: &CatalogState, action: CatalogAction) -> CatalogState {
    let mut next = state.clone();
    match action {
        CatalogAction::SetResults {
            category,
            items,
            fetched_at,
        } => {
            next.entries
                .insert(category, Arc::new(CatalogEntry { items, fetched_at }));
        }
        CatalogAction::SetDetail { detail, fetched_at } => {
            next.entries.insert(
                CatalogCategory::Detail,
                Arc::new(CatalogEntry {
                    items: vec![detail.summary.clone()],
                    fetched_at,
                }),
            );
            next.detail = Some(Arc::new(detail));
        }
        CatalogAction::ClearSearch => {
            next.entries.remove(&CatalogCategory::Search);
        }
        CatalogAction::SetLoading(loading) => next.loading = loading,
        CatalogAction::SetError(message) => {
            next.error = Some(message);
            next.loading = false;
        }
        CatalogAction::RecordError(message) => next.error = Some(message),
        CatalogAction::ClearError => next.error = None,
        CatalogAction::ClearAll => next = CatalogState::default(),
    }
    next
}

/// Reactive, session-scoped catalog cache.
pub struct CatalogStore {
    slice: Slice<CatalogState>,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            slice: Slice::new(CatalogState::default()),
        }
    }

    pub fn dispatch(&self, action: CatalogAction) -> bool {
        self.slice.apply(|state| reduce(state, action))
    }

    pub fn set_results(&self, category: CatalogCategory, items: Vec<MovieSummary>) {
        self.dispatch(CatalogAction::SetResults {
            category,
            items,
            fetched_at: Utc::now(),
        });
    }

    pub fn set_detail(&self, detail: MovieDetail) {
        self.dispatch(CatalogAction::SetDetail {
            detail,
            fetched_at: Utc::now(),
        });
    }

    pub fn clear_search(&self) {
        self.dispatch(CatalogAction::ClearSearch);
    }

    pub fn set_loading(&self, loading: bool) {
        self.dispatch(CatalogAction::SetLoading(loading));
    }

    pub fn set_error(&self, message: impl Into<String>) {
        self.dispatch(CatalogAction::SetError(message.into()));
    }

    /// Like [`set_error`](Self::set_error) but keeps the loading flag.
    pub fn record_error(&self, message: impl Into<String>) {
        self.dispatch(CatalogAction::RecordError(message.into()));
    }

    pub fn clear_error(&self) {
        self.dispatch(CatalogAction::ClearError);
    }

    /// Drop everything. Called on sign-out so results never leak
    /// across sessions.
    pub fn clear_all(&self) {
        self.dispatch(CatalogAction::ClearAll);
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<CatalogState> {
        self.slice.snapshot()
    }

    pub fn subscribe(&self) -> StoreStream<CatalogState> {
        self.slice.subscribe()
    }

    pub fn items(&self, category: CatalogCategory) -> Vec<MovieSummary> {
        self.snapshot().items(category).to_vec()
    }

    pub fn detail(&self) -> Option<Arc<MovieDetail>> {
        self.snapshot().detail.clone()
    }
}
