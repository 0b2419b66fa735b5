// ── Core error types ──
//
// User-facing errors from marquee-core. Consumers never see HTTP status
// codes or JSON parse failures directly: the `From<marquee_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

use crate::storage::StorageError;
use crate::validation::FormErrors;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the movie service: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Request to the movie service timed out")]
    Timeout,

    #[error("Authentication with the movie service failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Rate limited -- retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {identifier}")]
    NotFound { identifier: String },

    #[error("Invalid payload: {message}")]
    InvalidPayload { message: String },

    /// Form input rejected before any remote call was made.
    #[error("Invalid input: {0}")]
    InvalidForm(FormErrors),

    // ── Remote errors (wrapped, not exposed raw) ─────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("{message}")]
    Identity {
        /// Provider error code, e.g. `auth/user-not-found`.
        code: Option<String>,
        message: String,
    },

    // ── Local errors ─────────────────────────────────────────────────
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Application context has been disposed")]
    Disposed,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Short message suitable for showing in an error banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::ConnectionFailed { .. } | Self::Timeout => {
                "Network error. Please check your connection".into()
            }
            Self::AuthenticationFailed { .. } => {
                "The movie service rejected our credentials".into()
            }
            Self::RateLimited { .. } => "Too many requests. Please try again shortly".into(),
            Self::NotFound { .. } => "We couldn't find that title".into(),
            Self::Identity { message, .. } => message.clone(),
            Self::InvalidForm(errors) => errors.to_string(),
            Self::Config { message } => format!("Configuration error: {message}"),
            Self::InvalidPayload { .. }
            | Self::Api { .. }
            | Self::Storage(_)
            | Self::Disposed
            | Self::Internal(_) => "Failed to load movies. Please try again".into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<marquee_api::Error> for CoreError {
    fn from(err: marquee_api::Error) -> Self {
        match err {
            marquee_api::Error::InvalidCredentials => CoreError::AuthenticationFailed {
                message: "Invalid API key or access token".into(),
            },
            marquee_api::Error::NotFound { path } => CoreError::NotFound { identifier: path },
            marquee_api::Error::RateLimited { retry_after_secs } => {
                CoreError::RateLimited { retry_after_secs }
            }
            marquee_api::Error::Api {
                status, message, ..
            } => CoreError::Api {
                message,
                status: Some(status),
            },
            marquee_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            marquee_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            marquee_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidPayload { message }
            }
            marquee_api::Error::Configuration(message) => CoreError::Config { message },
        }
    }
}
