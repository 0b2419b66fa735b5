//! Theme command handlers.

use marquee_core::{AppContext, ThemePreference};

use crate::cli::{GlobalOpts, ThemeArgs, ThemeCommand};
use crate::error::CliError;
use crate::output;

pub fn handle(ctx: &AppContext, args: ThemeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let theme = ctx.theme();
    let current = match args.command {
        ThemeCommand::Show => theme.get(),
        ThemeCommand::Toggle => theme.toggle(),
        ThemeCommand::Set { value } => {
            if ThemePreference::parse(&value).is_none() && !global.quiet {
                eprintln!("Unrecognized theme '{value}', using dark");
            }
            theme.set_from_str(&value)
        }
    };

    let out = output::render_single(
        global.output,
        &current,
        ToString::to_string,
        ToString::to_string,
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
