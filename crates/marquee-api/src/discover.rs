// Search, genre, and discover endpoints.

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::client::TmdbClient;
use crate::types::{GenreList, Page, RawMovie};

/// Default ordering for genre and discover queries.
pub const DEFAULT_SORT: &str = "popularity.desc";

/// Filters for `GET /discover/movie`.
///
/// Unset fields are omitted from the query string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoverFilters {
    pub genre: Option<i64>,
    pub year: Option<u16>,
    pub min_rating: Option<f32>,
    pub sort_by: String,
    pub page: u32,
}

impl Default for DiscoverFilters {
    fn default() -> Self {
        Self {
            genre: None,
            year: None,
            min_rating: None,
            sort_by: DEFAULT_SORT.to_owned(),
            page: 1,
        }
    }
}

impl DiscoverFilters {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("sort_by", self.sort_by.clone()),
            ("page", self.page.max(1).to_string()),
        ];
        if let Some(genre) = self.genre {
            params.push(("with_genres", genre.to_string()));
        }
        if let Some(year) = self.year {
            params.push(("primary_release_year", year.to_string()));
        }
        if let Some(rating) = self.min_rating {
            params.push(("vote_average.gte", rating.to_string()));
        }
        params
    }
}

impl TmdbClient {
    /// Free-text title search. Adult titles are excluded.
    pub async fn search_movies(&self, query: &str, page: u32) -> Result<Page<RawMovie>, Error> {
        self.get_with_params(
            "search/movie",
            &[
                ("query", query.to_owned()),
                ("page", page.max(1).to_string()),
                ("include_adult", "false".to_owned()),
            ],
        )
        .await
    }

    /// Most popular movies in one genre.
    pub async fn movies_by_genre(&self, genre_id: i64, page: u32) -> Result<Page<RawMovie>, Error> {
        self.discover(&DiscoverFilters {
            genre: Some(genre_id),
            page,
            ..DiscoverFilters::default()
        })
        .await
    }

    pub async fn discover(&self, filters: &DiscoverFilters) -> Result<Page<RawMovie>, Error> {
        self.get_with_params("discover/movie", &filters.to_params())
            .await
    }

    /// The official movie genre list.
    pub async fn movie_genres(&self) -> Result<GenreList, Error> {
        self.get("genre/movie/list").await
    }
}
