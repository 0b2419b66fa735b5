// ── My List store ──
//
// User-curated movies, deduplicated by id, insertion ordered, written
// through to durable storage after every mutation. The transition logic
// (`reduce`) knows nothing about storage; `MyListStore` composes it with
// the persistence adapter.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, error, warn};

use crate::model::{MovieId, MovieSummary};
use crate::storage::Storage;
use crate::stream::StoreStream;

use super::slice::Slice;

/// Durable storage key. The value is a JSON array of summaries.
pub const MY_LIST_KEY: &str = "myList";

// ── State ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MyListState {
    entries: IndexMap<MovieId, MovieSummary>,
}

impl MyListState {
    /// Build from an ordered sequence. Later duplicates of an id are dropped.
    pub fn from_movies(movies: impl IntoIterator<Item = MovieSummary>) -> Self {
        let mut entries = IndexMap::new();
        for movie in movies {
            entries.entry(movie.id).or_insert(movie);
        }
        Self { entries }
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn get(&self, id: MovieId) -> Option<&MovieSummary> {
        self.entries.get(&id)
    }

    /// Entries in insertion order.
    pub fn movies(&self) -> impl Iterator<Item = &MovieSummary> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Transitions ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum MyListAction {
    Add(MovieSummary),
    Remove(MovieId),
    /// Add when absent, remove when present.
    Toggle(MovieSummary),
    Clear,
}

/// Pure list transition. Adding a present id and removing an absent id
/// both return the state unchanged.
pub fn reduce(state: &MyListState, action: MyListAction) -> MyListState {
    match action {
        MyListAction::Add(movie) => {
            if state.contains(movie.id) {
                return state.clone();
            }
            let mut next = state.clone();
            next.entries.insert(movie.id, movie);
            next
        }
        MyListAction::Remove(id) => {
            let mut next = state.clone();
            next.entries.shift_remove(&id);
            next
        }
        MyListAction::Toggle(movie) => {
            if state.contains(movie.id) {
                reduce(state, MyListAction::Remove(movie.id))
            } else {
                reduce(state, MyListAction::Add(movie))
            }
        }
        MyListAction::Clear => MyListState::default(),
    }
}

// ── Persistence adapter ──────────────────────────────────────────────

/// Read the stored list. Absent, unreadable, or malformed data yields an
/// empty list; individual malformed entries are skipped.
fn load(storage: &dyn Storage) -> MyListState {
    let raw = match storage.get(MY_LIST_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return MyListState::default(),
        Err(e) => {
            error!(error = %e, "failed to read My List from storage");
            return MyListState::default();
        }
    };

    let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
        Ok(values) => values,
        Err(e) => {
            warn!(error = %e, "stored My List is not a JSON array; starting empty");
            return MyListState::default();
        }
    };

    let total = values.len();
    let movies: Vec<MovieSummary> = values
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();
    if movies.len() < total {
        warn!(
            skipped = total - movies.len(),
            "dropped malformed My List entries"
        );
    }

    let state = MyListState::from_movies(movies);
    debug!(count = state.len(), "loaded My List");
    state
}

fn save(storage: &dyn Storage, state: &MyListState) {
    let movies: Vec<&MovieSummary> = state.movies().collect();
    let json = match serde_json::to_string(&movies) {
        Ok(json) => json,
        Err(e) => {
            error!(error = %e, "failed to serialize My List");
            return;
        }
    };
    if let Err(e) = storage.set(MY_LIST_KEY, &json) {
        error!(error = %e, "failed to persist My List; keeping in-memory state");
    }
}

// ── Store ────────────────────────────────────────────────────────────

/// Persisted, reactive My List.
pub struct MyListStore {
    slice: Slice<MyListState>,
    storage: Arc<dyn Storage>,
}

impl MyListStore {
    /// Initialize from durable storage. Never fails.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let initial = load(storage.as_ref());
        Self {
            slice: Slice::new(initial),
            storage,
        }
    }

    /// Apply an action and write through when it changed anything.
    /// `Clear` always writes, so a stale or malformed stored value is
    /// replaced by `[]` even when the list was already empty.
    ///
    /// The write happens under the slice lock, so storage always holds
    /// the most recently published list.
    pub fn dispatch(&self, action: MyListAction) -> bool {
        let always_write = matches!(action, MyListAction::Clear);
        let storage = self.storage.as_ref();
        self.slice.apply_and_commit(
            |state| reduce(state, action),
            |state, changed| {
                if changed || always_write {
                    save(storage, state);
                }
            },
        )
    }

    /// Returns `true` if the movie was added (it was not already present).
    pub fn add(&self, movie: MovieSummary) -> bool {
        self.dispatch(MyListAction::Add(movie))
    }

    /// Returns `true` if an entry was removed.
    pub fn remove(&self, id: MovieId) -> bool {
        self.dispatch(MyListAction::Remove(id))
    }

    /// Returns whether the movie is in the list afterwards.
    pub fn toggle(&self, movie: MovieSummary) -> bool {
        let id = movie.id;
        self.dispatch(MyListAction::Toggle(movie));
        self.contains(id)
    }

    pub fn clear(&self) {
        self.dispatch(MyListAction::Clear);
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn contains(&self, id: MovieId) -> bool {
        self.slice.snapshot().contains(id)
    }

    pub fn movies(&self) -> Vec<MovieSummary> {
        self.slice.snapshot().movies().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.slice.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slice.snapshot().is_empty()
    }

    pub fn snapshot(&self) -> Arc<MyListState> {
        self.slice.snapshot()
    }

    pub fn subscribe(&self) -> StoreStream<MyListState> {
        self.slice.subscribe()
    }
}
