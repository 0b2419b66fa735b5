// Async HTTP client for the TMDB v3 REST API.
//
// Base path: /3/
// Auth: `api_key` query parameter or `Authorization: Bearer` header

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types::ErrorBody;

/// Public TMDB v3 endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Language sent with every request unless overridden.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Number of body characters kept in deserialization error messages.
const BODY_PREVIEW_CHARS: usize = 200;

// ── Credentials ──────────────────────────────────────────────────────

/// How the client authenticates against the API.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// v3 API key, sent as the `api_key` query parameter.
    ApiKey(SecretString),
    /// v4 read access token, sent as `Authorization: Bearer <token>`.
    BearerToken(SecretString),
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the movie metadata API.
///
/// Cheap to clone: the inner `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<SecretString>,
    language: String,
}

impl TmdbClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from credentials and transport config.
    ///
    /// Bearer tokens are injected as a sensitive default header; API keys
    /// are appended to every request's query string.
    pub fn new(
        base_url: &str,
        credentials: Credentials,
        transport: &TransportConfig,
        language: Option<&str>,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let api_key = match credentials {
            Credentials::ApiKey(key) => Some(key),
            Credentials::BearerToken(token) => {
                let mut value =
                    HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                        .map_err(|e| {
                            Error::Configuration(format!("invalid access token header value: {e}"))
                        })?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
                None
            }
        };

        let http = transport.build_client_with_headers(headers)?;
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            api_key,
            language: language.unwrap_or(DEFAULT_LANGUAGE).to_owned(),
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            api_key: None,
            language: DEFAULT_LANGUAGE.to_owned(),
        })
    }

    /// Override the `language` parameter sent with each request.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Ensure the base URL ends with `/` so relative joins keep the
    /// version segment (`.../3/` + `movie/popular`).
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.get_with_params(path, &[]).await
    }

    /// GET with extra query parameters. `language` and `api_key` are
    /// always appended.
    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let mut request = self
            .http
            .get(url)
            .query(params)
            .query(&[("language", self.language.as_str())]);
        if let Some(ref key) = self.api_key {
            request = request.query(&[("api_key", key.expose_secret())]);
        }

        let resp = request.send().await?;
        Self::handle_response(path, resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        path: &str,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(path, status, resp).await)
        }
    }

    async fn parse_error(path: &str, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        match status {
            reqwest::StatusCode::UNAUTHORIZED => return Error::InvalidCredentials,
            reqwest::StatusCode::NOT_FOUND => {
                return Error::NotFound {
                    path: path.to_owned(),
                };
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => {
                let retry_after_secs = resp
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(1);
                return Error::RateLimited { retry_after_secs };
            }
            _ => {}
        }

        let raw = resp.text().await.unwrap_or_default();

        if let Ok(err) = serde_json::from_str::<ErrorBody>(&raw) {
            Error::Api {
                status: status.as_u16(),
                status_code: err.status_code,
                message: err.status_message.unwrap_or_else(|| status.to_string()),
            }
        } else {
            Error::Api {
                status: status.as_u16(),
                status_code: None,
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
            }
        }
    }
}
