//! Shared helpers for command handlers.

use tabled::Tabled;

use marquee_core::{AppContext, CatalogService, FetchOutcome, MovieId, MovieSummary};

use crate::error::CliError;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct MovieRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Year")]
    year: String,
    #[tabled(rename = "Rating")]
    rating: String,
}

impl From<&MovieSummary> for MovieRow {
    fn from(m: &MovieSummary) -> Self {
        Self {
            id: m.id.get(),
            title: m.title.clone(),
            year: m.release_year().unwrap_or("-").to_owned(),
            rating: format!("{:.1}", m.vote_average),
        }
    }
}

pub fn movie_id_line(m: &MovieSummary) -> String {
    m.id.to_string()
}

// ── Context helpers ─────────────────────────────────────────────────

/// The catalog service, or a credentials error naming the profile.
pub fn service(ctx: &AppContext, profile: &str) -> Result<CatalogService, CliError> {
    if ctx.client().is_none() {
        return Err(CliError::NoCredentials {
            profile: profile.into(),
        });
    }
    Ok(ctx.catalog_service()?)
}

/// A one-shot CLI fetch is never superseded; anything but `Applied`
/// means the context was torn down underneath us.
pub fn applied(outcome: FetchOutcome) -> Result<(), CliError> {
    match outcome {
        FetchOutcome::Applied => Ok(()),
        other => Err(CliError::Local(format!("request was dropped ({other:?})"))),
    }
}

pub fn movie_id(raw: i64) -> Result<MovieId, CliError> {
    MovieId::new(raw).ok_or_else(|| CliError::Validation {
        field: "id".into(),
        reason: format!("movie IDs are positive integers, got {raw}"),
    })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
/// Without a terminal the caller must pass `--yes`.
pub fn confirm(message: &str, yes_flag: bool, action: &str) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}
