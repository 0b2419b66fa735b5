// ── Domain model ──
//
// Canonical types held by the stores. Everything here has already been
// validated at the API boundary (see `convert`); stores never see raw
// wire payloads.

mod catalog;
mod identity;
mod movie;
mod theme;

pub use catalog::CatalogCategory;
pub use identity::UserIdentity;
pub use movie::{CastCredit, Genre, MovieDetail, MovieId, MovieSummary, Trailer};
pub use theme::ThemePreference;
