//! Command dispatch: bridges CLI args -> core services -> output formatting.

pub mod catalog;
pub mod config_cmd;
pub mod list;
pub mod movie;
pub mod theme;
pub mod util;

use marquee_core::AppContext;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a context-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    ctx: &AppContext,
    profile: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Browse(args) => catalog::browse(ctx, profile, args, global).await,
        Command::Search(args) => catalog::search(ctx, profile, args, global).await,
        Command::Genre(args) => catalog::genre(ctx, profile, args, global).await,
        Command::Genres => catalog::genres(ctx, profile, global).await,
        Command::Movie(args) => movie::handle(ctx, profile, args, global).await,
        Command::List(args) => list::handle(ctx, profile, args, global).await,
        Command::Theme(args) => theme::handle(ctx, args, global),
        // Config and Completions are handled before a context exists
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
