//! Movie detail handler.

use std::fmt::Write as _;

use marquee_core::{AppContext, ImageSize, MovieDetail};

use crate::cli::{GlobalOpts, MovieArgs};
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(d: &MovieDetail, in_list: bool, color: bool) -> String {
    let s = &d.summary;
    let mut out = output::heading(&s.title, color);
    if let Some(ref tagline) = d.tagline {
        let _ = write!(out, "\n{tagline}");
    }
    let _ = writeln!(out);

    let genres = d
        .genres
        .iter()
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let fields = [
        ("ID", s.id.to_string()),
        ("Released", s.release_date.clone().unwrap_or_else(|| "-".into())),
        ("Runtime", d.runtime_label().unwrap_or_else(|| "-".into())),
        ("Rating", format!("{:.1}/10", s.vote_average)),
        ("Status", d.status.clone().unwrap_or_else(|| "-".into())),
        ("Genres", if genres.is_empty() { "-".into() } else { genres }),
        (
            "Trailer",
            d.trailer
                .as_ref()
                .map_or_else(|| "-".into(), marquee_core::Trailer::watch_url),
        ),
        (
            "Poster",
            s.poster_url(ImageSize::Large).unwrap_or_else(|| "-".into()),
        ),
        ("My List", if in_list { "yes" } else { "no" }.into()),
    ];
    for (label, value) in fields {
        let _ = writeln!(out, "{:<10}{value}", format!("{label}:"));
    }

    if let Some(ref overview) = d.overview {
        let _ = write!(out, "\n{overview}\n");
    }

    if !d.cast.is_empty() {
        let _ = write!(out, "\nCast:\n");
        for member in &d.cast {
            match member.character {
                Some(ref character) => {
                    let _ = writeln!(out, "  {} as {character}", member.name);
                }
                None => {
                    let _ = writeln!(out, "  {}", member.name);
                }
            }
        }
    }

    if !d.similar.is_empty() {
        let _ = write!(out, "\nSimilar:\n");
        for m in d.similar.iter().take(10) {
            let _ = writeln!(
                out,
                "  {:>8}  {} ({})",
                m.id,
                m.title,
                m.release_year().unwrap_or("-")
            );
        }
    }

    out.trim_end().to_owned()
}

pub async fn handle(
    ctx: &AppContext,
    profile: &str,
    args: MovieArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let id = util::movie_id(args.id)?;
    let service = util::service(ctx, profile)?;
    let scope = ctx.fetch_scope();

    let pb = output::spinner(global, "Loading details...");
    let outcome = service.load_detail(&scope, id).await;
    pb.finish_and_clear();
    util::applied(outcome?)?;

    let movie = ctx
        .catalog()
        .detail()
        .filter(|d| d.summary.id == id)
        .ok_or_else(|| CliError::NotFound {
            resource_type: "Movie".into(),
            identifier: id.to_string(),
        })?;
    let in_list = ctx.my_list().contains(id);
    let color = output::should_color(global.color);

    let out = output::render_single(
        global.output,
        movie.as_ref(),
        |d| detail(d, in_list, color),
        |d| d.summary.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
