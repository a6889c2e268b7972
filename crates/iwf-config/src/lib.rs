//! Configuration for iwf-license.
//!
//! TOML profiles, credential resolution (env + plaintext + keyring),
//! and translation to `iwf_core::ControllerConfig`. The CLI layers its
//! flag overrides on top of what this crate produces.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use iwf_core::{
    AuthCredentials, ControllerConfig, DEFAULT_LOGIN_PROVIDER, TlsVerification, WaitPolicy,
};

/// Keyring service name under which profile passwords are stored.
pub const KEYRING_SERVICE: &str = "iwf-license";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

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
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Seconds between license state polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,

    /// Polls before giving up on a member.
    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
            poll_interval: default_poll_interval(),
            poll_attempts: default_poll_attempts(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_poll_interval() -> u64 {
    10
}
fn default_poll_attempts() -> u32 {
    180
}

/// A named controller profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Controller base URL (e.g., "https://iwf.example.net").
    pub controller: String,

    /// Username for both auth modes.
    pub username: Option<String>,

    /// Auth mode: "basic" or "token".
    #[serde(default = "default_auth_mode")]
    pub auth_mode: String,

    /// Login provider for token auth (defaults to "local").
    pub login_provider: Option<String>,

    /// Password (plaintext -- prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Override poll interval (seconds).
    pub poll_interval: Option<u64>,

    /// Override poll attempts.
    pub poll_attempts: Option<u32>,
}

fn default_auth_mode() -> String {
    "basic".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("net", "iwf-license", "iwf-license").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("iwf-license");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
///
/// Environment keys use `IWF_` and `__` as the nesting separator, e.g.
/// `IWF_DEFAULTS__TIMEOUT=60`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("IWF_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Serialize config to TOML and write it to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/password"),
    )?)
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password)?;
    Ok(())
}

/// Resolve a profile's password.
///
/// Order: the profile's `password_env` variable, `IWF_PASSWORD`, the
/// plaintext `password` field, then the system keyring.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    if let Ok(val) = std::env::var("IWF_PASSWORD") {
        return Ok(SecretString::from(val));
    }

    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Build `AuthCredentials` from an auth mode, username and password.
pub fn build_auth(
    auth_mode: &str,
    username: String,
    password: SecretString,
    login_provider: Option<&str>,
) -> Result<AuthCredentials, ConfigError> {
    match auth_mode {
        "basic" => Ok(AuthCredentials::Basic { username, password }),
        "token" => Ok(AuthCredentials::Token {
            username,
            password,
            login_provider: login_provider.unwrap_or(DEFAULT_LOGIN_PROVIDER).to_owned(),
        }),
        other => Err(ConfigError::Validation {
            field: "auth_mode".into(),
            reason: format!("expected 'basic' or 'token', got '{other}'"),
        }),
    }
}

/// Resolve `AuthCredentials` from a profile.
pub fn resolve_auth(profile: &Profile, profile_name: &str) -> Result<AuthCredentials, ConfigError> {
    let username = profile
        .username
        .clone()
        .or_else(|| std::env::var("IWF_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;
    let password = resolve_password(profile, profile_name)?;
    build_auth(
        &profile.auth_mode,
        username,
        password,
        profile.login_provider.as_deref(),
    )
}

/// Parse a controller URL, rejecting anything that is not http(s).
pub fn parse_controller_url(raw: &str) -> Result<url::Url, ConfigError> {
    let invalid = || ConfigError::Validation {
        field: "controller".into(),
        reason: format!("invalid URL: {raw}"),
    };
    let url: url::Url = raw.parse().map_err(|_| invalid())?;
    if matches!(url.scheme(), "http" | "https") {
        Ok(url)
    } else {
        Err(invalid())
    }
}

/// Build a `ControllerConfig` from a profile and the global defaults,
/// resolving credentials through the profile's chain.
pub fn profile_to_controller_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ControllerConfig, ConfigError> {
    let auth = resolve_auth(profile, profile_name)?;
    controller_config(profile, defaults, auth)
}

/// Build a `ControllerConfig` from a profile with already-resolved auth.
pub fn controller_config(
    profile: &Profile,
    defaults: &Defaults,
    auth: AuthCredentials,
) -> Result<ControllerConfig, ConfigError> {
    let url = parse_controller_url(&profile.controller)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let wait = WaitPolicy {
        interval: Duration::from_secs(profile.poll_interval.unwrap_or(defaults.poll_interval)),
        max_attempts: profile.poll_attempts.unwrap_or(defaults.poll_attempts),
    };
    if wait.max_attempts == 0 {
        return Err(ConfigError::Validation {
            field: "poll_attempts".into(),
            reason: "must be at least 1".into(),
        });
    }

    Ok(ControllerConfig {
        url,
        auth,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        wait,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    fn profile() -> Profile {
        Profile {
            controller: "https://iwf.example.net".into(),
            username: Some("admin".into()),
            auth_mode: "basic".into(),
            password: Some("s3cret".into()),
            ..Profile::default()
        }
    }

    #[test]
    fn loads_profiles_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "lab"

[defaults]
timeout = 45

[profiles.lab]
controller = "https://10.1.1.4"
username = "admin"
auth_mode = "token"
login_provider = "tmos"
poll_interval = 5
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();

        assert_eq!(cfg.default_profile.as_deref(), Some("lab"));
        assert_eq!(cfg.defaults.timeout, 45);
        assert_eq!(cfg.defaults.poll_attempts, 180);
        let lab = &cfg.profiles["lab"];
        assert_eq!(lab.auth_mode, "token");
        assert_eq!(lab.login_provider.as_deref(), Some("tmos"));
        assert_eq!(lab.poll_interval, Some(5));
    }

    #[test]
    fn save_then_load_keeps_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert("default".into(), profile());

        save_config_to(&cfg, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert_eq!(loaded.profiles["default"].controller, "https://iwf.example.net");
    }

    #[test]
    fn profile_maps_to_controller_config() {
        let mut p = profile();
        p.poll_attempts = Some(12);
        p.ca_cert = Some(PathBuf::from("/etc/ssl/iwf.pem"));

        let config = profile_to_controller_config(&p, "default", &Defaults::default()).unwrap();

        assert_eq!(config.url.as_str(), "https://iwf.example.net/");
        assert_eq!(config.tls, TlsVerification::CustomCa(PathBuf::from("/etc/ssl/iwf.pem")));
        assert_eq!(config.wait.max_attempts, 12);
        assert_eq!(config.wait.interval, Duration::from_secs(10));
        match config.auth {
            AuthCredentials::Basic { username, password } => {
                assert_eq!(username, "admin");
                assert_eq!(password.expose_secret(), "s3cret");
            }
            other @ AuthCredentials::Token { .. } => panic!("expected basic auth, got {other:?}"),
        }
    }

    #[test]
    fn token_mode_defaults_login_provider() {
        let auth = build_auth("token", "admin".into(), "pw".to_string().into(), None).unwrap();
        assert!(matches!(
            auth,
            AuthCredentials::Token { ref login_provider, .. } if login_provider == "local"
        ));
    }

    #[test]
    fn rejects_unknown_auth_mode() {
        let err = build_auth("kerberos", "admin".into(), "pw".to_string().into(), None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "auth_mode"));
    }

    #[test]
    fn rejects_non_http_controller() {
        assert!(parse_controller_url("ftp://iwf.example.net").is_err());
        assert!(parse_controller_url("not a url").is_err());
        assert!(parse_controller_url("http://10.0.0.2:8080").is_ok());
    }

    #[test]
    fn zero_poll_attempts_is_invalid() {
        let mut p = profile();
        p.poll_attempts = Some(0);
        let err = profile_to_controller_config(&p, "default", &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "poll_attempts"));
    }
}
