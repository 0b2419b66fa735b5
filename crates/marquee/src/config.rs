//! CLI configuration: thin wrapper around `marquee_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--api-key, --access-token, --timeout, --data-dir).

use std::path::PathBuf;

use secrecy::SecretString;

use marquee_core::{ContextConfig, Credentials};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use marquee_config::{
    Config, Profile, SecretKind, config_path, load_config_or_default, save_config,
};

/// Everything a command needs to build an `AppContext`.
pub struct Resolved {
    pub profile_name: String,
    pub context: ContextConfig,
    pub data_dir: PathBuf,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the runtime configuration. Flags beat the profile, the profile
/// beats `[defaults]`.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = load_config_or_default();
    let (profile_name, mut profile) = cfg.profile(global.profile.as_deref())?;

    if let Some(ref url) = global.api_url {
        profile.api_url = Some(url.clone());
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    let mut context =
        marquee_config::profile_to_context_config(&profile, &profile_name, &cfg.defaults)?;
    if let Some(creds) = credentials_from_flags(global) {
        context.credentials = Some(creds);
    }

    let data_dir = global
        .data_dir
        .clone()
        .unwrap_or_else(|| marquee_config::data_dir(&profile));

    Ok(Resolved {
        profile_name,
        context,
        data_dir,
    })
}

fn credentials_from_flags(global: &GlobalOpts) -> Option<Credentials> {
    let token = global.access_token.as_deref().filter(|s| !s.is_empty());
    let key = global.api_key.as_deref().filter(|s| !s.is_empty());

    token
        .map(|t| Credentials::BearerToken(SecretString::from(t.to_owned())))
        .or_else(|| key.map(|k| Credentials::ApiKey(SecretString::from(k.to_owned()))))
}
