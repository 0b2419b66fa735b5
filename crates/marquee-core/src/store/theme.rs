// ── Theme store ──

use std::sync::Arc;

use tracing::{error, warn};

use crate::model::ThemePreference;
use crate::storage::Storage;
use crate::stream::StoreStream;

use super::slice::Slice;

/// Durable storage key. The value is the raw word `dark` or `light`.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeAction {
    Toggle,
    Set(ThemePreference),
}

pub fn reduce(state: ThemePreference, action: ThemeAction) -> ThemePreference {
    match action {
        ThemeAction::Toggle => state.toggled(),
        ThemeAction::Set(theme) => theme,
    }
}

/// Persisted, reactive theme preference.
pub struct ThemeStore {
    slice: Slice<ThemePreference>,
    storage: Arc<dyn Storage>,
}

impl ThemeStore {
    /// Initialize from durable storage, defaulting to dark.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let initial = match storage.get(THEME_KEY) {
            Ok(Some(raw)) => ThemePreference::parse(&raw).unwrap_or_else(|| {
                warn!(stored = %raw, "unrecognized stored theme; using dark");
                ThemePreference::default()
            }),
            Ok(None) => ThemePreference::default(),
            Err(e) => {
                error!(error = %e, "failed to read theme from storage");
                ThemePreference::default()
            }
        };
        Self {
            slice: Slice::new(initial),
            storage,
        }
    }

    /// Apply an action and write the resulting value, even when unchanged,
    /// so an absent or unrecognized stored key is replaced. The write runs
    /// under the slice lock and storage errors are only logged.
    pub fn dispatch(&self, action: ThemeAction) -> ThemePreference {
        let storage = self.storage.as_ref();
        let mut current = ThemePreference::default();
        self.slice.apply_and_commit(
            |state| reduce(*state, action),
            |theme, _| {
                current = *theme;
                if let Err(e) = storage.set(THEME_KEY, &theme.to_string()) {
                    error!(error = %e, "failed to persist theme; keeping in-memory value");
                }
            },
        );
        current
    }

    /// Flip dark/light and return the new value.
    pub fn toggle(&self) -> ThemePreference {
        self.dispatch(ThemeAction::Toggle)
    }

    pub fn set(&self, theme: ThemePreference) -> ThemePreference {
        self.dispatch(ThemeAction::Set(theme))
    }

    /// Set from free-form input. Anything other than `dark`/`light`
    /// (case-insensitive) normalizes to dark.
    pub fn set_from_str(&self, raw: &str) -> ThemePreference {
        let theme = ThemePreference::parse(raw).unwrap_or_else(|| {
            warn!(input = %raw, "unrecognized theme; using dark");
            ThemePreference::Dark
        });
        self.set(theme)
    }

    pub fn get(&self) -> ThemePreference {
        *self.slice.snapshot()
    }

    pub fn subscribe(&self) -> StoreStream<ThemePreference> {
        self.slice.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, StorageError};

    /// Storage that fails every call.
    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("read-only volume".into()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("read-only volume".into()))
        }
        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("read-only volume".into()))
        }
    }

    fn store_with(stored: Option<&str>) -> (Arc<MemoryStorage>, ThemeStore) {
        let storage = Arc::new(MemoryStorage::new());
        if let Some(value) = stored {
            storage.set(THEME_KEY, value).unwrap();
        }
        let store = ThemeStore::load(storage.clone());
        (storage, store)
    }

    #[test]
    fn defaults_to_dark_then_toggle_persists_light() {
        let (storage, store) = store_with(None);
        assert_eq!(store.get(), ThemePreference::Dark);

        assert_eq!(store.toggle(), ThemePreference::Light);
        assert_eq!(storage.get(THEME_KEY).unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn toggle_twice_restores_original() {
        let (_, store) = store_with(Some("light"));
        store.toggle();
        store.toggle();
        assert_eq!(store.get(), ThemePreference::Light);
    }

    #[test]
    fn set_is_idempotent() {
        let (storage, store) = store_with(None);
        store.set(ThemePreference::Light);
        store.set(ThemePreference::Light);
        assert_eq!(store.get(), ThemePreference::Light);
        assert_eq!(storage.get(THEME_KEY).unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn invalid_input_normalizes_to_dark() {
        let (storage, store) = store_with(Some("light"));
        assert_eq!(store.set_from_str("chartreuse"), ThemePreference::Dark);
        assert_eq!(storage.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(store.set_from_str(" Light "), ThemePreference::Light);
    }

    #[test]
    fn unrecognized_stored_value_loads_dark() {
        let (_, store) = store_with(Some("\"light\""));
        assert_eq!(store.get(), ThemePreference::Dark);
    }

    #[test]
    fn set_to_current_value_still_writes_key() {
        let (storage, store) = store_with(None);
        assert_eq!(store.set(ThemePreference::Dark), ThemePreference::Dark);
        assert_eq!(storage.get(THEME_KEY).unwrap().as_deref(), Some("dark"));

        let (storage, store) = store_with(Some("sepia"));
        store.set(ThemePreference::Dark);
        assert_eq!(storage.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn storage_failures_never_reach_callers() {
        let store = ThemeStore::load(Arc::new(BrokenStorage));
        assert_eq!(store.get(), ThemePreference::Dark);

        assert_eq!(store.toggle(), ThemePreference::Light);
        assert_eq!(store.get(), ThemePreference::Light);
        assert_eq!(store.set_from_str("dark"), ThemePreference::Dark);
        assert_eq!(store.get(), ThemePreference::Dark);
    }

    #[test]
    fn concurrent_toggles_leave_storage_matching_memory() {
        for round in 0..50 {
            let storage = Arc::new(MemoryStorage::new());
            let store = Arc::new(ThemeStore::load(storage.clone()));

            std::thread::scope(|s| {
                for _ in 0..7 {
                    let store = Arc::clone(&store);
                    s.spawn(move || store.toggle());
                }
            });

            assert_eq!(store.get(), ThemePreference::Light, "round {round}");
            assert_eq!(
                storage.get(THEME_KEY).unwrap().as_deref(),
                Some("light"),
                "round {round}"
            );
        }
    }
}
