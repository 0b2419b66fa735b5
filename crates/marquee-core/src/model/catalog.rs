use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Named result partition in the catalog cache.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum CatalogCategory {
    NowPlaying,
    Popular,
    TopRated,
    Upcoming,
    Trending,
    Search,
    Detail,
    ByGenre,
}

impl CatalogCategory {
    /// Categories backed by a fixed curated list endpoint.
    pub const CURATED: [Self; 5] = [
        Self::NowPlaying,
        Self::Popular,
        Self::TopRated,
        Self::Upcoming,
        Self::Trending,
    ];

    /// Row heading used by list views.
    pub fn title(self) -> &'static str {
        match self {
            Self::NowPlaying => "Now Playing",
            Self::Popular => "Popular",
            Self::TopRated => "Top Rated",
            Self::Upcoming => "Upcoming",
            Self::Trending => "Trending Now",
            Self::Search => "Search Results",
            Self::Detail => "Details",
            Self::ByGenre => "Genre",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn snake_case_round_trip_through_strings() {
        for category in CatalogCategory::iter() {
            let text = category.to_string();
            assert_eq!(text.parse::<CatalogCategory>().ok(), Some(category));
        }
        assert_eq!(CatalogCategory::TopRated.to_string(), "top_rated");
    }
}
