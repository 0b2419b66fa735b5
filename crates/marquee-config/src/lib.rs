//! Shared configuration for marquee.
//!
//! TOML profiles, API credential resolution (env + keyring + plaintext),
//! data directory resolution, and translation to
//! `marquee_core::ContextConfig`. The CLI layers its flag overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use marquee_api::{Credentials, DEFAULT_BASE_URL, DEFAULT_LANGUAGE};
use marquee_core::ContextConfig;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Keyring service name. Entries are `<profile>/access-token` and
/// `<profile>/api-key`.
pub const KEYRING_SERVICE: &str = "marquee";

/// Prefix for environment overrides. Nested keys use `__`
/// (`MARQUEE_DEFAULTS__OUTPUT=json`).
pub const ENV_PREFIX: &str = "MARQUEE_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API key or access token configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named API profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Profile selected by name, falling back to `default_profile`.
    /// An unnamed, unconfigured default resolves to an empty profile.
    pub fn profile(&self, name: Option<&str>) -> Result<(String, Profile), ConfigError> {
        let explicit = name.is_some();
        let name = name
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into());

        match self.profiles.get(&name) {
            Some(profile) => Ok((name, profile.clone())),
            None if !explicit => Ok((name, Profile::default())),
            None => Err(ConfigError::UnknownProfile { name }),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            language: default_language(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_language() -> String {
    DEFAULT_LANGUAGE.into()
}

/// A named API profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// API base URL. Defaults to the public v3 endpoint.
    pub api_url: Option<String>,

    /// v3 API key (plaintext; prefer keyring or env var).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// v4 read access token (plaintext; prefer keyring or env var).
    pub access_token: Option<String>,

    /// Environment variable name containing the access token.
    pub access_token_env: Option<String>,

    /// Override the request language.
    pub language: Option<String>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Where My List and the theme are stored.
    pub data_dir: Option<PathBuf>,
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "marquee", "marquee")
}

fn home_fallback(parts: &[&str]) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.extend(parts);
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(&[".config", "marquee", "config.toml"]),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Platform data directory for persisted state.
pub fn default_data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(&[".local", "share", "marquee"]),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

/// Data directory for a profile: its override, else the platform default.
pub fn data_dir(profile: &Profile) -> PathBuf {
    profile.data_dir.clone().unwrap_or_else(default_data_dir)
}

// ── Config loading ──────────────────────────────────────────────────

fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    Ok(figment_for(path).extract()?)
}

/// Load config, returning a default if the file doesn't exist or is invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_account(profile_name: &str, kind: &str) -> String {
    format!("{profile_name}/{kind}")
}

/// env var named by `env_name` → keyring → plaintext.
fn resolve_secret(
    env_name: Option<&str>,
    profile_name: &str,
    kind: &str,
    plaintext: Option<&str>,
) -> Option<SecretString> {
    if let Some(val) = env_name.and_then(|name| std::env::var(name).ok()) {
        if !val.is_empty() {
            return Some(SecretString::from(val));
        }
    }

    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &keyring_account(profile_name, kind)) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    plaintext
        .filter(|s| !s.is_empty())
        .map(|s| SecretString::from(s.to_owned()))
}

/// Resolve API credentials. An access token wins over an API key.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Credentials, ConfigError> {
    if let Some(token) = resolve_secret(
        profile.access_token_env.as_deref(),
        profile_name,
        "access-token",
        profile.access_token.as_deref(),
    ) {
        return Ok(Credentials::BearerToken(token));
    }

    if let Some(key) = resolve_secret(
        profile.api_key_env.as_deref(),
        profile_name,
        "api-key",
        profile.api_key.as_deref(),
    ) {
        return Ok(Credentials::ApiKey(key));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a secret in the system keyring for a profile.
pub fn store_secret(profile_name: &str, kind: SecretKind, secret: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_account(profile_name, kind.as_str()))?;
    entry.set_password(secret)?;
    Ok(())
}

/// Which credential a keyring entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    AccessToken,
    ApiKey,
}

impl SecretKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccessToken => "access-token",
            Self::ApiKey => "api-key",
        }
    }
}

/// Build a `ContextConfig` from a profile and global defaults, without
/// CLI flag overrides. Missing credentials yield an offline config.
pub fn profile_to_context_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ContextConfig, ConfigError> {
    let raw_url = profile.api_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
    let api_url: url::Url = raw_url.parse().map_err(|_| ConfigError::Validation {
        field: "api_url".into(),
        reason: format!("invalid URL: {raw_url}"),
    })?;

    let credentials = match resolve_credentials(profile, profile_name) {
        Ok(creds) => Some(creds),
        Err(ConfigError::NoCredentials { .. }) => None,
        Err(e) => return Err(e),
    };

    let mut config = ContextConfig::new(api_url, credentials);
    config.language = profile
        .language
        .clone()
        .unwrap_or_else(|| defaults.language.clone());
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn file_and_env_are_merged_over_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                default_profile = "home"

                [defaults]
                output = "json"

                [profiles.home]
                api_key = "plain-key"
                language = "de-DE"
                "#,
            )?;
            jail.set_env("MARQUEE_DEFAULTS__TIMEOUT", "5");

            let cfg = load_config_from(Path::new("config.toml")).unwrap();
            assert_eq!(cfg.defaults.output, "json");
            assert_eq!(cfg.defaults.timeout, 5);
            assert_eq!(cfg.defaults.color, "auto");
            assert_eq!(cfg.default_profile.as_deref(), Some("home"));

            let (name, profile) = cfg.profile(None).unwrap();
            assert_eq!(name, "home");
            assert_eq!(profile.language.as_deref(), Some("de-DE"));
            Ok(())
        });
    }

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|_| {
            let cfg = load_config_from(Path::new("absent.toml")).unwrap();
            assert_eq!(cfg.defaults.output, "table");
            assert_eq!(cfg.defaults.language, "en-US");
            assert!(cfg.profiles.is_empty());
            Ok(())
        });
    }

    #[test]
    fn unknown_explicit_profile_is_an_error() {
        let cfg = Config::default();
        assert!(cfg.profile(None).is_ok());
        assert!(matches!(
            cfg.profile(Some("nope")),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn env_named_token_beats_plaintext_key() {
        Jail::expect_with(|jail| {
            jail.set_env("MARQUEE_TEST_TOKEN", "from-env");
            let profile = Profile {
                api_key: Some("plain".into()),
                access_token_env: Some("MARQUEE_TEST_TOKEN".into()),
                ..Profile::default()
            };
            let creds = resolve_credentials(&profile, "jail-profile-token").unwrap();
            assert!(matches!(creds, Credentials::BearerToken(_)));
            Ok(())
        });
    }

    #[test]
    fn context_config_uses_profile_overrides() {
        let profile = Profile {
            api_url: Some("http://localhost:8080/3".into()),
            timeout: Some(3),
            ..Profile::default()
        };
        let cfg =
            profile_to_context_config(&profile, "marquee-test-unconfigured", &Defaults::default())
                .unwrap();
        assert_eq!(cfg.api_url.as_str(), "http://localhost:8080/3");
        assert_eq!(cfg.timeout, Duration::from_secs(3));
        assert_eq!(cfg.language, "en-US");
    }

    #[test]
    fn invalid_api_url_is_rejected() {
        let profile = Profile {
            api_url: Some("not a url".into()),
            ..Profile::default()
        };
        assert!(matches!(
            profile_to_context_config(&profile, "x", &Defaults::default()),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                api_key_env: Some("TMDB_KEY".into()),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(
            loaded.profiles["default"].api_key_env.as_deref(),
            Some("TMDB_KEY")
        );
    }
}
