//! Reactive state layer between `marquee-api` and UI consumers.
//!
//! - **[`AppContext`]** -- Explicitly constructed owner of every store, the
//!   metadata client, and background tasks. Vends [`FetchScope`]s,
//!   the [`CatalogService`], and the [`AuthService`]; [`dispose()`](AppContext::dispose)
//!   tears everything down.
//!
//! - **Stores** ([`store`]) -- Session, My List, theme, and catalog cache.
//!   Each is a `tokio::sync::watch` slice with a pure `reduce` function;
//!   My List and theme write through to a [`Storage`].
//!
//! - **[`StoreStream<S>`]** -- Subscription handle exposing `current()` /
//!   `latest()` / `changed()` and a `Stream` adapter.
//!
//! - **Boundary conversion** ([`convert`]) -- Strict validation of raw API
//!   payloads into [`MovieSummary`] / [`MovieDetail`].

pub mod auth;
pub mod config;
pub mod context;
pub mod convert;
pub mod error;
pub mod fetch;
pub mod model;
pub mod storage;
pub mod store;
pub mod stream;
pub mod validation;

// ── Primary re-exports ──────────────────────────────────────────────
pub use auth::{
    AuthService, FederatedProvider, GUEST_EMAIL, IdentityProvider, ProviderError,
    provider_error_message,
};
pub use config::ContextConfig;
pub use context::AppContext;
pub use error::CoreError;
pub use fetch::{CatalogRequest, CatalogService, FetchOutcome, FetchScope};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::{CatalogState, CatalogStore, MyListStore, SessionState, SessionStore, ThemeStore};
pub use stream::StoreStream;
pub use validation::{FormErrors, FormField};

// Transport types that appear in this crate's public API.
pub use marquee_api::{Credentials, DiscoverFilters, ImageSize, TrendingWindow};

pub use model::{
    CastCredit, CatalogCategory, Genre, MovieDetail, MovieId, MovieSummary, ThemePreference,
    Trailer, UserIdentity,
};
