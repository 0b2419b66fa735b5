//! My List command handlers.

use marquee_core::{AppContext, MovieId, MovieSummary};

use crate::cli::{GlobalOpts, ListArgs, ListCommand};
use crate::error::CliError;
use crate::output;

use super::util::{self, MovieRow};

/// Look a movie up so the saved entry carries its title and artwork.
async fn fetch_summary(
    ctx: &AppContext,
    profile: &str,
    id: MovieId,
    global: &GlobalOpts,
) -> Result<MovieSummary, CliError> {
    let service = util::service(ctx, profile)?;
    let scope = ctx.fetch_scope();

    let pb = output::spinner(global, "Looking up movie...");
    let outcome = service.load_detail(&scope, id).await;
    pb.finish_and_clear();
    util::applied(outcome?)?;

    ctx.catalog()
        .detail()
        .filter(|d| d.summary.id == id)
        .map(|d| d.summary.clone())
        .ok_or_else(|| CliError::NotFound {
            resource_type: "Movie".into(),
            identifier: id.to_string(),
        })
}

fn note(global: &GlobalOpts, message: &str) {
    if !global.quiet {
        eprintln!("{message}");
    }
}

pub async fn handle(
    ctx: &AppContext,
    profile: &str,
    args: ListArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let list = ctx.my_list();

    match args.command {
        ListCommand::Show => {
            let movies = list.movies();
            if movies.is_empty() && global.output == crate::cli::OutputFormat::Table {
                note(global, "My List is empty");
                return Ok(());
            }
            let out =
                output::render_list(global.output, &movies, |m: &MovieSummary| MovieRow::from(m), util::movie_id_line)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ListCommand::Add { id } => {
            let id = util::movie_id(id)?;
            if list.contains(id) {
                note(global, &format!("Movie {id} is already in My List"));
                return Ok(());
            }
            let movie = fetch_summary(ctx, profile, id, global).await?;
            let title = movie.title.clone();
            list.add(movie);
            note(global, &format!("Added '{title}' to My List"));
            Ok(())
        }

        ListCommand::Remove { id } => {
            let id = util::movie_id(id)?;
            if list.remove(id) {
                note(global, &format!("Removed {id} from My List"));
                Ok(())
            } else {
                Err(CliError::NotFound {
                    resource_type: "My List entry".into(),
                    identifier: id.to_string(),
                })
            }
        }

        ListCommand::Toggle { id } => {
            let id = util::movie_id(id)?;
            if list.contains(id) {
                list.remove(id);
                note(global, &format!("Removed {id} from My List"));
            } else {
                let movie = fetch_summary(ctx, profile, id, global).await?;
                let title = movie.title.clone();
                list.toggle(movie);
                note(global, &format!("Added '{title}' to My List"));
            }
            Ok(())
        }

        ListCommand::Clear => {
            if list.is_empty() {
                note(global, "My List is already empty");
                return Ok(());
            }
            let prompt = format!("Remove all {} movies from My List?", list.len());
            if !util::confirm(&prompt, global.yes, "list clear")? {
                return Ok(());
            }
            list.clear();
            note(global, "My List cleared");
            Ok(())
        }
    }
}
