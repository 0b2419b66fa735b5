//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use marquee_config::ConfigError;
use marquee_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the movie service")]
    #[diagnostic(
        code(marquee::connection_failed),
        help("Check your network connection, or point --api-url at a reachable endpoint.")
    )]
    ConnectionFailed { reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(marquee::timeout),
        help("Increase the timeout with --timeout or try again later.")
    )]
    Timeout,

    #[error("Rate limited by the movie service")]
    #[diagnostic(code(marquee::rate_limited), help("Retry after {retry_after_secs}s."))]
    RateLimited { retry_after_secs: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed for profile '{profile}'")]
    #[diagnostic(
        code(marquee::auth_failed),
        help(
            "Verify your TMDB API key or read access token.\n\
             Run: marquee config set-token --profile {profile}"
        )
    )]
    AuthFailed { profile: String },

    #[error("No API credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(marquee::no_credentials),
        help(
            "Configure credentials with: marquee config init\n\
             Or set MARQUEE_ACCESS_TOKEN / MARQUEE_API_KEY."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(marquee::not_found))]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(marquee::api_error))]
    Api { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(marquee::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(marquee::profile_not_found),
        help("Create one with: marquee config init")
    )]
    ProfileNotFound { name: String },

    #[error(transparent)]
    #[diagnostic(code(marquee::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(marquee::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Local ────────────────────────────────────────────────────────
    #[error("{0}")]
    #[diagnostic(code(marquee::local))]
    Local(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { reason } => Self::ConnectionFailed { reason },
            CoreError::Timeout => Self::Timeout,
            CoreError::RateLimited { retry_after_secs } => Self::RateLimited { retry_after_secs },
            CoreError::AuthenticationFailed { .. } => Self::AuthFailed {
                profile: "current".into(),
            },
            CoreError::NotFound { identifier } => Self::NotFound {
                resource_type: "Movie".into(),
                identifier,
            },
            CoreError::InvalidForm(errors) => Self::Validation {
                field: "input".into(),
                reason: errors.to_string(),
            },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Storage(e) => Self::Local(format!("Could not save local data: {e}")),
            other => Self::Api {
                message: other.user_message(),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::UnknownProfile { name } => Self::ProfileNotFound { name },
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let cases = [
            (CoreError::Timeout, exit_code::TIMEOUT),
            (
                CoreError::ConnectionFailed {
                    reason: "refused".into(),
                },
                exit_code::CONNECTION,
            ),
            (
                CoreError::AuthenticationFailed {
                    message: "bad key".into(),
                },
                exit_code::AUTH,
            ),
            (
                CoreError::NotFound {
                    identifier: "movie/9".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::Api {
                    message: "boom".into(),
                    status: Some(500),
                },
                exit_code::GENERAL,
            ),
        ];
        for (core, code) in cases {
            assert_eq!(CliError::from(core).exit_code(), code);
        }
    }

    #[test]
    fn api_errors_show_the_generic_banner() {
        let err = CliError::from(CoreError::Api {
            message: "upstream body".into(),
            status: Some(503),
        });
        assert_eq!(err.to_string(), "Failed to load movies. Please try again");
    }

    #[test]
    fn missing_credentials_is_an_auth_failure() {
        let err = CliError::from(ConfigError::NoCredentials {
            profile: "home".into(),
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
