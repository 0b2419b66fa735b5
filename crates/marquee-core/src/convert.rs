// ── API-to-domain conversions ──
//
// Strict schema at the API boundary. Raw wire types are lenient about
// what the remote sends; these conversions decide what is acceptable,
// coerce the rest to defaults, and reject records that cannot be shown.

use marquee_api::types::{CastMember, Page, RawMovie, RawMovieDetails, Video};
use tracing::warn;

use crate::error::CoreError;
use crate::model::{CastCredit, Genre, MovieDetail, MovieId, MovieSummary, Trailer};

/// Cast members kept on a detail record.
pub const MAX_CAST: usize = 10;

// ── Helpers ────────────────────────────────────────────────────────

/// Trim and drop empty strings.
fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

/// Ratings are 0-10; anything else (including NaN) is coerced into range.
fn clamp_rating(raw: Option<f64>) -> f64 {
    match raw {
        Some(v) if v.is_finite() => v.clamp(0.0, 10.0),
        _ => 0.0,
    }
}

fn is_youtube_trailer(video: &Video) -> bool {
    video.video_type == "Trailer"
        && video.site.eq_ignore_ascii_case("youtube")
        && !video.key.is_empty()
}

// ── MovieSummary ───────────────────────────────────────────────────

impl TryFrom<RawMovie> for MovieSummary {
    type Error = CoreError;

    fn try_from(raw: RawMovie) -> Result<Self, Self::Error> {
        let id = raw
            .id
            .and_then(MovieId::new)
            .ok_or_else(|| CoreError::InvalidPayload {
                message: format!("movie id missing or not positive: {:?}", raw.id),
            })?;

        let title = non_blank(raw.title)
            .or_else(|| non_blank(raw.name))
            .or_else(|| non_blank(raw.original_title))
            .ok_or_else(|| CoreError::InvalidPayload {
                message: format!("movie {id} has no title"),
            })?;

        Ok(Self {
            id,
            title,
            poster_path: non_blank(raw.poster_path),
            backdrop_path: non_blank(raw.backdrop_path),
            vote_average: clamp_rating(raw.vote_average),
            release_date: non_blank(raw.release_date),
            adult: raw.adult.unwrap_or(false),
            genre_ids: raw.genre_ids.unwrap_or_default(),
        })
    }
}

/// Convert a list of raw movies, dropping (and logging) rejected entries.
pub fn summaries(raw: Vec<RawMovie>) -> Vec<MovieSummary> {
    raw.into_iter()
        .filter_map(|movie| match MovieSummary::try_from(movie) {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!(error = %e, "dropping malformed movie from response");
                None
            }
        })
        .collect()
}

/// Convert one page of results.
pub fn summaries_from_page(page: Page<RawMovie>) -> Vec<MovieSummary> {
    summaries(page.results)
}

// ── MovieDetail ────────────────────────────────────────────────────

impl From<CastMember> for CastCredit {
    fn from(raw: CastMember) -> Self {
        Self {
            name: raw.name,
            character: non_blank(raw.character),
            profile_path: non_blank(raw.profile_path),
        }
    }
}

impl TryFrom<RawMovieDetails> for MovieDetail {
    type Error = CoreError;

    fn try_from(raw: RawMovieDetails) -> Result<Self, Self::Error> {
        let overview = non_blank(raw.movie.overview.clone());

        // Detail payloads carry `genres` instead of `genre_ids`.
        let mut movie = raw.movie;
        if movie.genre_ids.as_ref().is_none_or(Vec::is_empty) {
            movie.genre_ids = Some(raw.genres.iter().map(|g| g.id).collect());
        }
        let summary = MovieSummary::try_from(movie)?;

        let trailer = raw
            .videos
            .map(|v| v.results)
            .unwrap_or_default()
            .into_iter()
            .find(is_youtube_trailer)
            .map(|v| Trailer {
                key: v.key,
                name: v.name,
            });

        let mut cast_members = raw.credits.map(|c| c.cast).unwrap_or_default();
        cast_members.sort_by_key(|c| c.order.unwrap_or(i32::MAX));
        let cast = cast_members
            .into_iter()
            .filter(|c| !c.name.trim().is_empty())
            .take(MAX_CAST)
            .map(CastCredit::from)
            .collect();

        let similar = raw.similar.map(summaries_from_page).unwrap_or_default();

        Ok(Self {
            summary,
            overview,
            tagline: non_blank(raw.tagline),
            runtime: raw.runtime.filter(|m| *m > 0),
            status: non_blank(raw.status),
            genres: raw
                .genres
                .into_iter()
                .map(|g| Genre {
                    id: g.id,
                    name: g.name,
                })
                .collect(),
            trailer,
            cast,
            similar,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use marquee_api::types::{Credits, VideoList};
    use pretty_assertions::assert_eq;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < f64::EPSILON
    }

    fn raw(id: Option<i64>, title: Option<&str>) -> RawMovie {
        RawMovie {
            id,
            title: title.map(str::to_owned),
            ..RawMovie::default()
        }
    }

    #[test]
    fn missing_fields_get_defaults() {
        let summary = MovieSummary::try_from(raw(Some(5), Some("Heat"))).unwrap();
        assert!(approx(summary.vote_average, 0.0));
        assert!(!summary.adult);
        assert!(summary.genre_ids.is_empty());
        assert_eq!(summary.poster_path, None);
    }

    #[test]
    fn rejects_missing_or_non_positive_id() {
        assert!(MovieSummary::try_from(raw(None, Some("x"))).is_err());
        assert!(MovieSummary::try_from(raw(Some(0), Some("x"))).is_err());
    }

    #[test]
    fn title_falls_back_to_name_then_original() {
        let mut movie = raw(Some(1), Some("   "));
        movie.name = Some("Series Name".into());
        assert_eq!(MovieSummary::try_from(movie).unwrap().title, "Series Name");

        let mut movie = raw(Some(1), None);
        movie.original_title = Some("Le Titre".into());
        assert_eq!(MovieSummary::try_from(movie).unwrap().title, "Le Titre");

        assert!(MovieSummary::try_from(raw(Some(1), None)).is_err());
    }

    #[test]
    fn blank_paths_and_bad_ratings_are_coerced() {
        let mut movie = raw(Some(1), Some("A"));
        movie.poster_path = Some(String::new());
        movie.release_date = Some(" ".into());
        movie.vote_average = Some(f64::NAN);
        let summary = MovieSummary::try_from(movie).unwrap();
        assert_eq!(summary.poster_path, None);
        assert_eq!(summary.release_date, None);
        assert!(approx(summary.vote_average, 0.0));

        let mut movie = raw(Some(1), Some("A"));
        movie.vote_average = Some(42.0);
        assert!(approx(MovieSummary::try_from(movie).unwrap().vote_average, 10.0));
    }

    #[test]
    fn page_conversion_drops_rejects() {
        let page = Page {
            results: vec![raw(Some(1), Some("A")), raw(None, Some("B")), raw(Some(3), Some("C"))],
            ..Page::default()
        };
        let ids: Vec<i64> = summaries_from_page(page).iter().map(|m| m.id.get()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn detail_picks_youtube_trailer_and_top_cast() {
        let video = |key: &str, site: &str, kind: &str| Video {
            key: key.into(),
            name: format!("{kind} {key}"),
            site: site.into(),
            video_type: kind.into(),
            official: true,
        };
        let cast: Vec<CastMember> = (0..15)
            .rev()
            .map(|i| CastMember {
                id: i64::from(i),
                name: format!("Actor {i}"),
                character: Some(String::new()),
                profile_path: None,
                order: Some(i),
            })
            .collect();

        let details = RawMovieDetails {
            movie: raw(Some(603), Some("The Matrix")),
            runtime: Some(136),
            genres: vec![marquee_api::types::Genre {
                id: 28,
                name: "Action".into(),
            }],
            videos: Some(VideoList {
                id: None,
                results: vec![
                    video("t1", "YouTube", "Teaser"),
                    video("v1", "Vimeo", "Trailer"),
                    video("y1", "YouTube", "Trailer"),
                ],
            }),
            credits: Some(Credits {
                id: None,
                cast,
                crew: vec![],
            }),
            similar: Some(Page {
                results: vec![raw(Some(604), Some("Reloaded")), raw(None, None)],
                ..Page::default()
            }),
            ..RawMovieDetails::default()
        };

        let detail = MovieDetail::try_from(details).unwrap();
        assert_eq!(detail.trailer.as_ref().map(|t| t.key.as_str()), Some("y1"));
        assert_eq!(detail.cast.len(), MAX_CAST);
        assert_eq!(detail.cast[0].name, "Actor 0");
        assert_eq!(detail.cast[0].character, None);
        assert_eq!(detail.summary.genre_ids, vec![28]);
        assert_eq!(detail.similar.len(), 1);
        assert_eq!(detail.runtime_label().as_deref(), Some("2h 16m"));
    }
}
