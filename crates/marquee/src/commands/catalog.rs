//! Catalog command handlers: browse, search, genre, genres.

use serde::Serialize;
use tabled::Tabled;
use tracing::warn;

use marquee_core::{
    AppContext, CatalogCategory, CatalogRequest, DiscoverFilters, Genre, MovieSummary,
    TrendingWindow,
};

use crate::cli::{
    BrowseArgs, BrowseCategory, GenreArgs, GlobalOpts, OutputFormat, SearchArgs, Window,
};
use crate::error::CliError;
use crate::output;

use super::util::{self, MovieRow};

// ── Rows ────────────────────────────────────────────────────────────

/// One curated row in `browse` output.
#[derive(Serialize)]
struct CatalogRow {
    category: CatalogCategory,
    title: &'static str,
    movies: Vec<MovieSummary>,
}

#[derive(Tabled)]
struct GenreRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
}

fn request_for(category: BrowseCategory, page: u32, window: Window) -> CatalogRequest {
    match category {
        BrowseCategory::NowPlaying => CatalogRequest::NowPlaying { page },
        BrowseCategory::Popular => CatalogRequest::Popular { page },
        BrowseCategory::TopRated => CatalogRequest::TopRated { page },
        BrowseCategory::Upcoming => CatalogRequest::Upcoming { page },
        BrowseCategory::Trending => CatalogRequest::Trending(match window {
            Window::Day => TrendingWindow::Day,
            Window::Week => TrendingWindow::Week,
        }),
    }
}

fn print_movies(items: &[MovieSummary], global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_list(global.output, items, |m: &MovieSummary| MovieRow::from(m), util::movie_id_line)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn browse(
    ctx: &AppContext,
    profile: &str,
    args: BrowseArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let service = util::service(ctx, profile)?;
    let scope = ctx.fetch_scope();

    if let Some(category) = args.category {
        let request = request_for(category, args.page, args.window);
        let target = request.category();
        let pb = output::spinner(global, "Loading movies...");
        let outcome = service.load(&scope, request).await;
        pb.finish_and_clear();
        util::applied(outcome?)?;
        return print_movies(&ctx.catalog().items(target), global);
    }

    let pb = output::spinner(global, "Loading movies...");
    let results = service.load_curated(&scope, args.page).await;
    pb.finish_and_clear();

    // A failed row is skipped as long as at least one row loaded.
    let mut first_err = None;
    for (category, result) in results {
        if let Err(e) = result {
            warn!(%category, error = %e, "row failed to load");
            if first_err.is_none() {
                first_err = Some(e);
            }
        }
    }

    let rows: Vec<CatalogRow> = CatalogCategory::CURATED
        .into_iter()
        .map(|category| CatalogRow {
            category,
            title: category.title(),
            movies: ctx.catalog().items(category),
        })
        .filter(|row| !row.movies.is_empty())
        .collect();

    if rows.is_empty() {
        if let Some(e) = first_err {
            return Err(e.into());
        }
    }

    let color = output::should_color(global.color);
    let out = output::render_single(
        global.output,
        rows.as_slice(),
        |rows| {
            rows.iter()
                .map(|row| {
                    let table = output::render_list(
                        OutputFormat::Table,
                        &row.movies,
                        |m: &MovieSummary| MovieRow::from(m),
                        util::movie_id_line,
                    )
                    .unwrap_or_default();
                    format!("{}\n{table}", output::heading(row.title, color))
                })
                .collect::<Vec<_>>()
                .join("\n\n")
        },
        |rows| {
            rows.iter()
                .flat_map(|row| {
                    row.movies
                        .iter()
                        .map(move |m| format!("{}\t{}", row.category, m.id))
                })
                .collect::<Vec<_>>()
                .join("\n")
        },
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn search(
    ctx: &AppContext,
    profile: &str,
    args: SearchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let query = args.query.join(" ");
    let service = util::service(ctx, profile)?;
    let scope = ctx.fetch_scope();

    let pb = output::spinner(global, "Searching...");
    let outcome = service.search(&scope, &query).await;
    pb.finish_and_clear();
    util::applied(outcome?)?;

    let items = ctx.catalog().items(CatalogCategory::Search);
    if items.is_empty() && global.output == OutputFormat::Table {
        if !global.quiet {
            eprintln!("No movies found for '{}'", query.trim());
        }
        return Ok(());
    }
    print_movies(&items, global)
}

pub async fn genre(
    ctx: &AppContext,
    profile: &str,
    args: GenreArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let service = util::service(ctx, profile)?;
    let scope = ctx.fetch_scope();

    let filtered = args.year.is_some() || args.min_rating.is_some() || args.sort_by.is_some();
    let request = if filtered {
        let defaults = DiscoverFilters::default();
        CatalogRequest::Discover(DiscoverFilters {
            genre: Some(args.id),
            year: args.year,
            min_rating: args.min_rating,
            sort_by: args.sort_by.unwrap_or(defaults.sort_by),
            page: args.page,
        })
    } else {
        CatalogRequest::ByGenre {
            genre_id: args.id,
            page: args.page,
        }
    };

    let pb = output::spinner(global, "Loading movies...");
    let outcome = service.load(&scope, request).await;
    pb.finish_and_clear();
    util::applied(outcome?)?;

    print_movies(&ctx.catalog().items(CatalogCategory::ByGenre), global)
}

pub async fn genres(ctx: &AppContext, profile: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let service = util::service(ctx, profile)?;
    let list: Vec<Genre> = service.genres().await?;

    let out = output::render_list(
        global.output,
        &list,
        |g| GenreRow {
            id: g.id,
            name: g.name.clone(),
        },
        |g| format!("{}\t{}", g.id, g.name),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
