//! Layers CLI flag overrides over the loaded profile and produces the
//! `iwf_core::ControllerConfig` for a run.
//!
//! Precedence: flag/env > profile > defaults.

use secrecy::SecretString;

use iwf_config::{Config, Profile};
use iwf_core::ControllerConfig;

use crate::cli::{GlobalOpts, MemberArgs};
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Apply global flag and member overrides onto a profile.
fn apply_overrides(profile: &mut Profile, global: &GlobalOpts, member: Option<&MemberArgs>) {
    if let Some(ref controller) = global.controller {
        profile.controller.clone_from(controller);
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if let Some(mode) = global.auth {
        profile.auth_mode = mode.as_str().into();
    }
    if let Some(ref provider) = global.login_provider {
        profile.login_provider = Some(provider.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    if let Some(args) = member {
        if let Some(interval) = args.poll_interval {
            profile.poll_interval = Some(interval);
        }
        if let Some(attempts) = args.poll_attempts {
            profile.poll_attempts = Some(attempts);
        }
    }
}

/// Build a `ControllerConfig` from the config file, profile, and CLI overrides.
///
/// A missing profile is fine as long as `--controller` is given; the run
/// then relies on flags and environment alone.
pub fn build_controller_config(
    cfg: &Config,
    global: &GlobalOpts,
    member: Option<&MemberArgs>,
) -> Result<ControllerConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.controller.is_some() => Profile {
            auth_mode: "basic".into(),
            ..Profile::default()
        },
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(cfg),
            });
        }
        None => {
            return Err(CliError::NoConfig {
                path: iwf_config::config_path().display().to_string(),
            });
        }
    };
    apply_overrides(&mut profile, global, member);

    // An explicit --password wins over every stored credential.
    let auth = match global.password {
        Some(ref password) => {
            let username = profile.username.clone().ok_or_else(|| CliError::NoCredentials {
                profile: profile_name.clone(),
            })?;
            iwf_config::build_auth(
                &profile.auth_mode,
                username,
                SecretString::from(password.clone()),
                profile.login_provider.as_deref(),
            )?
        }
        None => iwf_config::resolve_auth(&profile, &profile_name)?,
    };

    Ok(iwf_config::controller_config(&profile, &cfg.defaults, auth)?)
}

/// Comma-separated profile names, or "(none)".
pub fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}
