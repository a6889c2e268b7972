//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and a process exit code per error class.

use miette::Diagnostic;
use thiserror::Error;

use iwf_config::ConfigError;
use iwf_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const LICENSING: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(iwf::connection_failed),
        help(
            "Check that the controller is reachable.\n\
             Reason: {reason}\n\
             Self-signed certificate? Try --insecure (-k)."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Controller request timed out")]
    #[diagnostic(
        code(iwf::timeout),
        help("Increase the timeout with --timeout or check controller responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(iwf::auth_failed),
        help(
            "Verify the username and password for profile '{profile}'.\n\
             Store a new password with: iwf-license config set-password --profile {profile}"
        )
    )]
    AuthFailed { message: String, profile: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(iwf::no_credentials),
        help(
            "Set username in the profile (or --username) and provide a password with\n\
             --password, IWF_PASSWORD, or: iwf-license config set-password"
        )
    )]
    NoCredentials { profile: String },

    // ── Lookups ──────────────────────────────────────────────────────
    #[error("Device {} was not found", .identifiers.join(", "))]
    #[diagnostic(
        code(iwf::device_not_found),
        help(
            "Identifiers must match exactly one managed BIG-IP by hostname,\n\
             address, or management address."
        )
    )]
    DeviceNotFound { identifiers: Vec<String> },

    #[error("License pool '{name}' was not found")]
    #[diagnostic(code(iwf::pool_not_found))]
    PoolNotFound { name: String },

    #[error("Multiple license pools named '{name}' were found ({count})")]
    #[diagnostic(
        code(iwf::ambiguous_pool),
        help("Pool names must be unique on the controller.")
    )]
    AmbiguousPool { name: String, count: usize },

    // ── Licensing ────────────────────────────────────────────────────
    #[error("Licensing {device} failed: {details}")]
    #[diagnostic(code(iwf::licensing_failed), help("Pool member: {member}"))]
    LicensingFailed {
        device: String,
        member: String,
        details: String,
    },

    #[error("Licensing {device} did not complete after {attempts} status checks")]
    #[diagnostic(
        code(iwf::licensing_timeout),
        help(
            "Pool member {member} is still pending.\n\
             Raise --poll-attempts or --poll-interval and re-run; completed members are kept."
        )
    )]
    LicensingTimeout {
        device: String,
        member: String,
        attempts: u32,
    },

    #[error("Failed to remove {} from license pool '{pool}'", .remaining.join(", "))]
    #[diagnostic(code(iwf::removal_failed))]
    RemovalVerification { pool: String, remaining: Vec<String> },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error{}: {message}", status_suffix(.status))]
    #[diagnostic(code(iwf::api_error))]
    ApiError { status: Option<u16>, message: String },

    #[error("Internal error: {0}")]
    #[diagnostic(code(iwf::internal))]
    Internal(String),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(iwf::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(iwf::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No controller configured")]
    #[diagnostic(
        code(iwf::no_config),
        help(
            "Pass --controller (or IWF_CONTROLLER), or add a profile to\n\
             {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(iwf::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(iwf::render))]
    Render(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout | Self::LicensingTimeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::DeviceNotFound { .. } | Self::PoolNotFound { .. } => exit_code::NOT_FOUND,
            Self::AmbiguousPool { .. } => exit_code::CONFLICT,
            Self::LicensingFailed { .. } => exit_code::LICENSING,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Fill in the active profile name on auth errors.
    pub fn with_profile(self, profile_name: &str) -> Self {
        match self {
            Self::AuthFailed { message, .. } => Self::AuthFailed {
                message,
                profile: profile_name.into(),
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::AuthenticationFailed { message } => Self::AuthFailed {
                message,
                profile: "default".into(),
            },
            CoreError::Timeout => Self::Timeout,
            CoreError::DeviceNotFound { identifiers } => Self::DeviceNotFound { identifiers },
            CoreError::PoolNotFound { name } => Self::PoolNotFound { name },
            CoreError::AmbiguousPool { name, count } => Self::AmbiguousPool { name, count },
            CoreError::LicensingFailed {
                device,
                member,
                details,
            } => Self::LicensingFailed {
                device,
                member,
                details,
            },
            CoreError::LicensingTimeout {
                device,
                member,
                attempts,
            } => Self::LicensingTimeout {
                device,
                member,
                attempts,
            },
            CoreError::RemovalVerification { pool, remaining } => {
                Self::RemovalVerification { pool, remaining }
            }
            CoreError::Api { message, status } => Self::ApiError { status, message },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config(other),
        }
    }
}
