// ── Runtime context configuration ──
//
// Describes how to reach the metadata API. Carries credential data but
// never touches disk: the CLI builds a `ContextConfig` from its profile
// and hands it in.

use std::time::Duration;

use marquee_api::{Credentials, DEFAULT_BASE_URL, DEFAULT_LANGUAGE};
use url::Url;

#[derive(Debug, Clone)]
pub struct ContextConfig {
    /// Metadata API base URL (e.g. `https://api.themoviedb.org/3/`).
    pub api_url: Url,
    /// `None` runs the context offline: stores work, catalog fetches don't.
    pub credentials: Option<Credentials>,
    pub language: String,
    pub timeout: Duration,
}

impl ContextConfig {
    /// Config with the default language and timeout.
    pub fn new(api_url: Url, credentials: Option<Credentials>) -> Self {
        Self {
            api_url,
            credentials,
            language: DEFAULT_LANGUAGE.to_owned(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Config against the public endpoint.
    pub fn public(credentials: Option<Credentials>) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(DEFAULT_BASE_URL)?, credentials))
    }
}
