// ── Stores ──
//
// Four independent slices. Each exposes a pure `reduce` plus a store type
// that owns the reactive state and, for the persisted ones, the
// write-through adapter.

pub mod catalog;
pub mod my_list;
pub mod session;
mod slice;
pub mod theme;

pub use catalog::{CatalogAction, CatalogEntry, CatalogState, CatalogStore};
pub use my_list::{MY_LIST_KEY, MyListAction, MyListState, MyListStore};
pub use session::{SessionAction, SessionState, SessionStore};
pub use theme::{THEME_KEY, ThemeAction, ThemeStore};
