// ── Cancellable catalog fetches ──
//
// Every fetch is tied to a `FetchScope` (one per mounted view) and to a
// per-category generation counter. A result is written to the catalog
// only if its scope is still live and no newer fetch for the same
// category has started since. Everything else is dropped on the floor.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use futures_util::future::join_all;
use marquee_api::{DiscoverFilters, TmdbClient, TrendingWindow};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::convert::summaries_from_page;
use crate::error::CoreError;
use crate::model::{CatalogCategory, Genre, MovieDetail, MovieId, MovieSummary};
use crate::store::CatalogStore;

// ── FetchScope ─────────────────────────────────────────────────────

/// Lifetime of one consumer (a view, a command). Dropping the scope or
/// calling [`cancel()`](Self::cancel) abandons its in-flight fetches.
#[derive(Debug)]
pub struct FetchScope {
    token: CancellationToken,
}

impl FetchScope {
    pub(crate) fn new(parent: &CancellationToken) -> Self {
        Self {
            token: parent.child_token(),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for FetchScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

// ── Requests and outcomes ──────────────────────────────────────────

/// A list fetch and the catalog partition its results land in.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogRequest {
    NowPlaying { page: u32 },
    Popular { page: u32 },
    TopRated { page: u32 },
    Upcoming { page: u32 },
    Trending(TrendingWindow),
    ByGenre { genre_id: i64, page: u32 },
    /// Filtered discovery. Results share the `by_genre` partition.
    Discover(DiscoverFilters),
}

impl CatalogRequest {
    pub fn category(&self) -> CatalogCategory {
        match self {
            Self::NowPlaying { .. } => CatalogCategory::NowPlaying,
            Self::Popular { .. } => CatalogCategory::Popular,
            Self::TopRated { .. } => CatalogCategory::TopRated,
            Self::Upcoming { .. } => CatalogCategory::Upcoming,
            Self::Trending(_) => CatalogCategory::Trending,
            Self::ByGenre { .. } | Self::Discover(_) => CatalogCategory::ByGenre,
        }
    }

    /// Request for a curated category. `None` for search, detail, and genre.
    pub fn curated(category: CatalogCategory, page: u32) -> Option<Self> {
        match category {
            CatalogCategory::NowPlaying => Some(Self::NowPlaying { page }),
            CatalogCategory::Popular => Some(Self::Popular { page }),
            CatalogCategory::TopRated => Some(Self::TopRated { page }),
            CatalogCategory::Upcoming => Some(Self::Upcoming { page }),
            CatalogCategory::Trending => Some(Self::Trending(TrendingWindow::default())),
            CatalogCategory::Search | CatalogCategory::Detail | CatalogCategory::ByGenre => None,
        }
    }
}

/// What happened to a fetch's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Written to the catalog.
    Applied,
    /// A newer fetch for the same category started first; result dropped.
    Superseded,
    /// The scope was cancelled before the result arrived; result dropped.
    Cancelled,
}

// ── Generation tracking ────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Ticket {
    category: CatalogCategory,
    generation: u64,
}

/// Per-category generation counters shared by every `CatalogService`
/// vended from one context.
#[derive(Debug, Default)]
pub(crate) struct FetchTracker {
    generations: DashMap<CatalogCategory, u64>,
    /// Categories whose latest fetch is still in flight.
    in_flight: DashMap<CatalogCategory, u64>,
}

impl FetchTracker {
    fn begin(&self, category: CatalogCategory) -> Ticket {
        let generation = {
            let mut entry = self.generations.entry(category).or_insert(0);
            *entry += 1;
            *entry
        };
        self.in_flight.insert(category, generation);
        Ticket {
            category,
            generation,
        }
    }

    /// Returns `true` if the ticket is still the newest for its category.
    fn finish(&self, ticket: Ticket) -> bool {
        let latest = self
            .generations
            .get(&ticket.category)
            .is_some_and(|g| *g == ticket.generation);
        if latest {
            self.in_flight
                .remove_if(&ticket.category, |_, g| *g == ticket.generation);
        }
        latest
    }

    /// Invalidate whatever is in flight for `category` without starting
    /// a new fetch.
    fn supersede(&self, category: CatalogCategory) {
        *self.generations.entry(category).or_insert(0) += 1;
        self.in_flight.remove(&category);
    }

    fn idle(&self) -> bool {
        self.in_flight.is_empty()
    }
}

// ── CatalogService ─────────────────────────────────────────────────

/// Fetches catalog data and records results in the catalog store.
#[derive(Clone)]
pub struct CatalogService {
    client: TmdbClient,
    catalog: Arc<CatalogStore>,
    tracker: Arc<FetchTracker>,
}

impl CatalogService {
    pub(crate) fn new(
        client: TmdbClient,
        catalog: Arc<CatalogStore>,
        tracker: Arc<FetchTracker>,
    ) -> Self {
        Self {
            client,
            catalog,
            tracker,
        }
    }

    /// Fetch one list into its category.
    pub async fn load(
        &self,
        scope: &FetchScope,
        request: CatalogRequest,
    ) -> Result<FetchOutcome, CoreError> {
        let category = request.category();
        let client = self.client.clone();
        let catalog = Arc::clone(&self.catalog);

        self.run(
            scope,
            category,
            async move {
                let page = match request {
                    CatalogRequest::NowPlaying { page } => client.now_playing(page).await?,
                    CatalogRequest::Popular { page } => client.popular(page).await?,
                    CatalogRequest::TopRated { page } => client.top_rated(page).await?,
                    CatalogRequest::Upcoming { page } => client.upcoming(page).await?,
                    CatalogRequest::Trending(window) => client.trending(window).await?,
                    CatalogRequest::ByGenre { genre_id, page } => {
                        client.movies_by_genre(genre_id, page).await?
                    }
                    CatalogRequest::Discover(filters) => client.discover(&filters).await?,
                };
                Ok(summaries_from_page(page))
            },
            move |items: Vec<MovieSummary>| catalog.set_results(category, items),
        )
        .await
    }

    /// Fetch every curated list concurrently, as the home view does.
    pub async fn load_curated(
        &self,
        scope: &FetchScope,
        page: u32,
    ) -> Vec<(CatalogCategory, Result<FetchOutcome, CoreError>)> {
        let loads = CatalogCategory::CURATED.into_iter().filter_map(|category| {
            let request = CatalogRequest::curated(category, page)?;
            Some(async move { (category, self.load(scope, request).await) })
        });
        join_all(loads).await
    }

    /// Fetch a movie's full record into the `detail` category.
    pub async fn load_detail(
        &self,
        scope: &FetchScope,
        id: MovieId,
    ) -> Result<FetchOutcome, CoreError> {
        let client = self.client.clone();
        let catalog = Arc::clone(&self.catalog);

        self.run(
            scope,
            CatalogCategory::Detail,
            async move {
                let raw = client.movie_details(id.get()).await?;
                MovieDetail::try_from(raw)
            },
            move |detail| catalog.set_detail(detail),
        )
        .await
    }

    /// Title search. A blank query clears the search results without
    /// touching the network and supersedes any search still in flight.
    pub async fn search(&self, scope: &FetchScope, query: &str) -> Result<FetchOutcome, CoreError> {
        let query = query.trim().to_owned();
        if query.is_empty() {
            self.tracker.supersede(CatalogCategory::Search);
            self.catalog.clear_search();
            self.settle_loading();
            return Ok(FetchOutcome::Applied);
        }

        let client = self.client.clone();
        let catalog = Arc::clone(&self.catalog);

        self.run(
            scope,
            CatalogCategory::Search,
            async move { Ok(summaries_from_page(client.search_movies(&query, 1).await?)) },
            move |items| catalog.set_results(CatalogCategory::Search, items),
        )
        .await
    }

    /// The genre list. Not cached.
    pub async fn genres(&self) -> Result<Vec<Genre>, CoreError> {
        let list = self.client.movie_genres().await?;
        Ok(list
            .genres
            .into_iter()
            .map(|g| Genre {
                id: g.id,
                name: g.name,
            })
            .collect())
    }

    // ── Internals ────────────────────────────────────────────────────

    async fn run<T, F>(
        &self,
        scope: &FetchScope,
        category: CatalogCategory,
        fetch: F,
        apply: impl FnOnce(T),
    ) -> Result<FetchOutcome, CoreError>
    where
        F: Future<Output = Result<T, CoreError>>,
    {
        let ticket = self.tracker.begin(category);
        self.catalog.set_loading(true);
        debug!(%category, generation = ticket.generation, "fetch started");

        let result = tokio::select! {
            biased;
            () = scope.token.cancelled() => None,
            result = fetch => Some(result),
        };
        let latest = self.tracker.finish(ticket);

        let outcome = match result {
            None => Ok(FetchOutcome::Cancelled),
            Some(_) if scope.is_cancelled() => Ok(FetchOutcome::Cancelled),
            Some(_) if !latest => Ok(FetchOutcome::Superseded),
            Some(Ok(value)) => {
                apply(value);
                self.catalog.clear_error();
                Ok(FetchOutcome::Applied)
            }
            Some(Err(e)) => {
                warn!(%category, error = %e, "fetch failed");
                self.catalog.record_error(e.user_message());
                Err(e)
            }
        };

        if let Ok(dropped @ (FetchOutcome::Cancelled | FetchOutcome::Superseded)) = &outcome {
            debug!(
                %category,
                generation = ticket.generation,
                outcome = ?dropped,
                "fetch result dropped"
            );
        }
        self.settle_loading();
        outcome
    }

    fn settle_loading(&self) {
        if self.tracker.idle() {
            self.catalog.set_loading(false);
        }
    }
}
