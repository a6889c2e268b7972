// ── Runtime connection configuration ──
//
// These types describe *how* to reach an iWorkflow controller and how
// long to wait for licensing. They carry credential data but never touch
// disk; the CLI builds a `ControllerConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::waiter::WaitPolicy;

/// How to authenticate with the controller.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// HTTP Basic on every request.
    Basic {
        username: String,
        password: SecretString,
    },
    /// Token login through the given provider (`local`, `tmos`, or a
    /// configured remote provider), then `X-F5-Auth-Token`.
    Token {
        username: String,
        password: SecretString,
        login_provider: String,
    },
}

impl AuthCredentials {
    pub fn username(&self) -> &str {
        match self {
            Self::Basic { username, .. } | Self::Token { username, .. } => username,
        }
    }
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs). Default for controllers.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for talking to a single controller.
///
/// Built by the CLI, passed to `Controller` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller URL (e.g., `https://iwf.example.net`).
    pub url: Url,
    /// Authentication method and credentials.
    pub auth: AuthCredentials,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// How often and how many times to poll a new member's license state.
    pub wait: WaitPolicy,
}

impl ControllerConfig {
    pub fn new(url: Url, auth: AuthCredentials) -> Self {
        Self {
            url,
            auth,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            wait: WaitPolicy::default(),
        }
    }
}
