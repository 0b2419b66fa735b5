//! Clap derive structures for the `marquee` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Kept
//! free of workspace dependencies so `build.rs` can include it verbatim.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// marquee -- browse movies and keep a watch list from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "marquee",
    version,
    about = "Browse movies and manage your list from the command line",
    long_about = "Browse curated movie rows, search titles, inspect details and trailers,\n\
        and keep a persistent My List backed by the TMDB metadata API.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "MARQUEE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// TMDB v3 API key (overrides profile)
    #[arg(long, env = "MARQUEE_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// TMDB v4 read access token (overrides profile and --api-key)
    #[arg(long, env = "MARQUEE_ACCESS_TOKEN", global = true, hide_env_values = true)]
    pub access_token: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, env = "MARQUEE_API_URL", global = true, hide = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MARQUEE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "MARQUEE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Directory holding My List and the theme (overrides profile)
    #[arg(long, env = "MARQUEE_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show curated rows (now playing, popular, top rated, upcoming, trending)
    #[command(alias = "b")]
    Browse(BrowseArgs),

    /// Search movies by title
    #[command(alias = "s")]
    Search(SearchArgs),

    /// Movies in a genre, with optional discovery filters
    Genre(GenreArgs),

    /// List the available genres
    Genres,

    /// Show a movie's details, trailer, cast, and similar titles
    #[command(alias = "m")]
    Movie(MovieArgs),

    /// Manage My List
    #[command(alias = "l")]
    List(ListArgs),

    /// Show or change the color theme preference
    Theme(ThemeArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CATALOG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BrowseArgs {
    /// Row to show. All curated rows when omitted.
    pub category: Option<BrowseCategory>,

    /// Result page (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Trending time window
    #[arg(long, default_value = "day")]
    pub window: Window,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BrowseCategory {
    NowPlaying,
    Popular,
    TopRated,
    Upcoming,
    Trending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Window {
    Day,
    Week,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Title to search for
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,
}

#[derive(Debug, Args)]
pub struct GenreArgs {
    /// Genre ID (see `marquee genres`)
    pub id: i64,

    /// Only movies first released in this year
    #[arg(long)]
    pub year: Option<u16>,

    /// Minimum average rating (0-10)
    #[arg(long)]
    pub min_rating: Option<f32>,

    /// Sort order, e.g. `vote_average.desc`
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Result page (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,
}

#[derive(Debug, Args)]
pub struct MovieArgs {
    /// Movie ID
    pub id: i64,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  MY LIST
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(subcommand)]
    pub command: ListCommand,
}

#[derive(Debug, Subcommand)]
pub enum ListCommand {
    /// Show saved movies, oldest first
    #[command(alias = "ls")]
    Show,

    /// Look up a movie and save it
    Add {
        /// Movie ID
        id: i64,
    },

    /// Remove a saved movie
    #[command(alias = "rm")]
    Remove {
        /// Movie ID
        id: i64,
    },

    /// Save the movie if absent, remove it if present
    Toggle {
        /// Movie ID
        id: i64,
    },

    /// Remove every saved movie
    Clear,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  THEME
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ThemeArgs {
    #[command(subcommand)]
    pub command: ThemeCommand,
}

#[derive(Debug, Subcommand)]
pub enum ThemeCommand {
    /// Print the current preference
    Show,

    /// Switch between dark and light
    Toggle,

    /// Set the preference. Unrecognized values fall back to dark.
    Set {
        /// `dark` or `light`
        value: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init,

    /// Display the current configuration (secrets masked)
    Show,

    /// Store an API credential in the system keyring
    SetToken {
        /// Which credential to store
        #[arg(long, default_value = "access-token")]
        kind: TokenKind,
    },

    /// Print the config file location
    Path,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TokenKind {
    AccessToken,
    ApiKey,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
