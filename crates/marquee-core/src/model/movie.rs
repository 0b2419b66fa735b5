use std::fmt;
use std::str::FromStr;

use marquee_api::{ImageKind, ImageSize, image_url};
use serde::{Deserialize, Serialize};

// ── MovieId ──────────────────────────────────────────────────────────

/// Catalog identifier. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct MovieId(i64);

impl MovieId {
    /// Returns `None` for zero or negative ids.
    pub fn new(raw: i64) -> Option<Self> {
        (raw > 0).then_some(Self(raw))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for MovieId {
    type Error = String;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::new(raw).ok_or_else(|| format!("movie id must be positive, got {raw}"))
    }
}

impl From<MovieId> for i64 {
    fn from(id: MovieId) -> Self {
        id.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MovieId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: i64 = s
            .trim()
            .parse()
            .map_err(|_| format!("'{s}' is not a movie id"))?;
        Self::try_from(raw)
    }
}

// ── MovieSummary ─────────────────────────────────────────────────────

/// The minimal catalog record shared by list views and My List.
///
/// Serialized with the same snake_case field names the metadata API
/// uses, so persisted lists stay readable by other tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
}

impl MovieSummary {
    /// Four-digit year from `release_date`, if it has one.
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .filter(|y| y.chars().all(|c| c.is_ascii_digit()))
    }

    pub fn poster_url(&self, size: ImageSize) -> Option<String> {
        image_url(self.poster_path.as_deref(), ImageKind::Poster, size)
    }

    pub fn backdrop_url(&self, size: ImageSize) -> Option<String> {
        image_url(self.backdrop_path.as_deref(), ImageKind::Backdrop, size)
    }
}

// ── MovieDetail ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// A playable trailer hosted on YouTube.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trailer {
    pub key: String,
    pub name: String,
}

impl Trailer {
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastCredit {
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

/// Everything the detail view shows for one movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub summary: MovieSummary,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    /// Minutes.
    pub runtime: Option<u32>,
    pub status: Option<String>,
    pub genres: Vec<Genre>,
    pub trailer: Option<Trailer>,
    /// Top-billed cast, in billing order.
    pub cast: Vec<CastCredit>,
    pub similar: Vec<MovieSummary>,
}

impl MovieDetail {
    /// Runtime formatted as `2h 16m`.
    pub fn runtime_label(&self) -> Option<String> {
        let minutes = self.runtime.filter(|m| *m > 0)?;
        Some(match (minutes / 60, minutes % 60) {
            (0, m) => format!("{m}m"),
            (h, 0) => format!("{h}h"),
            (h, m) => format!("{h}h {m}m"),
        })
    }
}
