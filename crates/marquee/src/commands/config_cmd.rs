//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, TokenKind};
use crate::config::{self, Config, Profile, SecretKind};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking secrets.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "language = \"{}\"", cfg.defaults.language);

    for (name, p) in &cfg.profiles {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        if let Some(ref url) = p.api_url {
            let _ = writeln!(out, "api_url = \"{url}\"");
        }
        if p.api_key.is_some() {
            let _ = writeln!(out, "api_key = \"****\"");
        }
        if let Some(ref env) = p.api_key_env {
            let _ = writeln!(out, "api_key_env = \"{env}\"");
        }
        if p.access_token.is_some() {
            let _ = writeln!(out, "access_token = \"****\"");
        }
        if let Some(ref env) = p.access_token_env {
            let _ = writeln!(out, "access_token_env = \"{env}\"");
        }
        if let Some(ref language) = p.language {
            let _ = writeln!(out, "language = \"{language}\"");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(ref dir) = p.data_dir {
            let _ = writeln!(out, "data_dir = \"{}\"", dir.display());
        }
    }

    out.trim_end().to_owned()
}

fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for p in cfg.profiles.values_mut() {
        if p.api_key.is_some() {
            p.api_key = Some("****".into());
        }
        if p.access_token.is_some() {
            p.access_token = Some("****".into());
        }
    }
    cfg
}

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn secret_kind(kind: TokenKind) -> SecretKind {
    match kind {
        TokenKind::AccessToken => SecretKind::AccessToken,
        TokenKind::ApiKey => SecretKind::ApiKey,
    }
}

fn prompt_secret(kind: SecretKind) -> Result<String, CliError> {
    let label = match kind {
        SecretKind::AccessToken => "Read access token: ",
        SecretKind::ApiKey => "API key: ",
    };
    let secret = rpassword::prompt_password(label).map_err(prompt_err)?;
    if secret.trim().is_empty() {
        return Err(CliError::Validation {
            field: kind.as_str().into(),
            reason: "cannot be empty".into(),
        });
    }
    Ok(secret.trim().to_owned())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(
                global.output,
                &redacted(&cfg),
                format_config_redacted,
                |_| config::config_path().display().to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::SetToken { kind } => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let kind = secret_kind(kind);
            let secret = prompt_secret(kind)?;
            marquee_config::store_secret(&profile_name, kind, &secret)?;
            if !global.quiet {
                eprintln!(
                    "✓ Stored {} for profile '{profile_name}' in the system keyring",
                    kind.as_str()
                );
            }
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("marquee configuration");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default(global.profile.clone().unwrap_or_else(|| "default".into()))
        .interact_text()
        .map_err(prompt_err)?;

    let kind_choices = &["Read access token (recommended)", "API key"];
    let kind = match Select::new()
        .with_prompt("Credential type")
        .items(kind_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?
    {
        0 => SecretKind::AccessToken,
        _ => SecretKind::ApiKey,
    };
    let secret = prompt_secret(kind)?;

    let store_choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let plaintext = Select::new()
        .with_prompt("Where to store it?")
        .items(store_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?
        == 1;

    let mut profile = Profile::default();
    if plaintext {
        match kind {
            SecretKind::AccessToken => profile.access_token = Some(secret),
            SecretKind::ApiKey => profile.api_key = Some(secret),
        }
    } else {
        marquee_config::store_secret(&profile_name, kind, &secret)?;
        eprintln!("   ✓ Stored in system keyring");
    }

    let language: String = Input::new()
        .with_prompt("Language")
        .default("en-US".into())
        .interact_text()
        .map_err(prompt_err)?;
    if language != "en-US" {
        profile.language = Some(language);
    }

    let mut cfg = config::load_config_or_default();
    cfg.default_profile = Some(profile_name.clone());
    cfg.profiles.insert(profile_name.clone(), profile);
    let path = config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: marquee browse popular");
    Ok(())
}
