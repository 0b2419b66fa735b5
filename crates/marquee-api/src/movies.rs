// Movie list and detail endpoints.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::Error;
use crate::client::TmdbClient;
use crate::types::{Credits, Page, RawMovie, RawMovieDetails, VideoList};

/// Sub-resources fetched together with a movie's details.
const DETAIL_APPEND: &str = "videos,credits,similar";

/// Time window for the trending endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum TrendingWindow {
    #[default]
    Day,
    Week,
}

fn page_param(page: u32) -> (&'static str, String) {
    ("page", page.max(1).to_string())
}

impl TmdbClient {
    // ── Curated lists ────────────────────────────────────────────────

    pub async fn now_playing(&self, page: u32) -> Result<Page<RawMovie>, Error> {
        self.get_with_params("movie/now_playing", &[page_param(page)])
            .await
    }

    pub async fn popular(&self, page: u32) -> Result<Page<RawMovie>, Error> {
        self.get_with_params("movie/popular", &[page_param(page)])
            .await
    }

    pub async fn top_rated(&self, page: u32) -> Result<Page<RawMovie>, Error> {
        self.get_with_params("movie/top_rated", &[page_param(page)])
            .await
    }

    pub async fn upcoming(&self, page: u32) -> Result<Page<RawMovie>, Error> {
        self.get_with_params("movie/upcoming", &[page_param(page)])
            .await
    }

    /// Trending movies for the given window (`trending/movie/{day|week}`).
    pub async fn trending(&self, window: TrendingWindow) -> Result<Page<RawMovie>, Error> {
        self.get(&format!("trending/movie/{window}")).await
    }

    // ── Single movie ─────────────────────────────────────────────────

    /// Full details including videos, credits, and similar titles in one
    /// round trip.
    pub async fn movie_details(&self, id: i64) -> Result<RawMovieDetails, Error> {
        self.get_with_params(
            &format!("movie/{id}"),
            &[("append_to_response", DETAIL_APPEND.to_owned())],
        )
        .await
    }

    pub async fn movie_videos(&self, id: i64) -> Result<VideoList, Error> {
        self.get(&format!("movie/{id}/videos")).await
    }

    pub async fn movie_credits(&self, id: i64) -> Result<Credits, Error> {
        self.get(&format!("movie/{id}/credits")).await
    }

    pub async fn similar_movies(&self, id: i64, page: u32) -> Result<Page<RawMovie>, Error> {
        self.get_with_params(&format!("movie/{id}/similar"), &[page_param(page)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn trending_window_path_segment() {
        assert_eq!(TrendingWindow::default().to_string(), "day");
        assert_eq!(TrendingWindow::Week.to_string(), "week");
        assert_eq!(TrendingWindow::from_str("DAY").ok(), Some(TrendingWindow::Day));
    }

    #[test]
    fn page_zero_is_clamped() {
        assert_eq!(page_param(0).1, "1");
        assert_eq!(page_param(3).1, "3");
    }
}
