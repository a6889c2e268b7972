// ── Core error types ──
//
// User-facing errors from iwf-core. Consumers never see raw HTTP or JSON
// failures; the `From<iwf_api::Error>` impl translates transport-layer
// errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to controller at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Controller request timed out")]
    Timeout,

    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Device {} was not found", .identifiers.join(", "))]
    DeviceNotFound { identifiers: Vec<String> },

    #[error("License pool '{name}' was not found")]
    PoolNotFound { name: String },

    #[error("Multiple license pools named '{name}' were found ({count})")]
    AmbiguousPool { name: String, count: usize },

    // ── Licensing errors ─────────────────────────────────────────────
    #[error("Licensing {device} failed: {details}")]
    LicensingFailed {
        device: String,
        member: String,
        details: String,
    },

    #[error("Licensing {device} did not complete after {attempts} status checks")]
    LicensingTimeout {
        device: String,
        member: String,
        attempts: u32,
    },

    #[error("Failed to remove {} from license pool '{pool}'", .remaining.join(", "))]
    RemovalVerification {
        pool: String,
        remaining: Vec<String>,
    },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<iwf_api::Error> for CoreError {
    fn from(err: iwf_api::Error) -> Self {
        match err {
            iwf_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            iwf_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            iwf_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            iwf_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            iwf_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            iwf_api::Error::UnexpectedLink { link } => {
                CoreError::Internal(format!("unexpected resource link from controller: {link}"))
            }
            iwf_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
