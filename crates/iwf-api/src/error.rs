use thiserror::Error;

/// Top-level error type for the `iwf-api` crate.
///
/// Covers every failure mode of the REST surface: authentication,
/// transport, controller-reported errors, and payload decoding.
/// `iwf-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed or the controller rejected our credentials (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Controller ──────────────────────────────────────────────────
    /// Non-success response from the REST API.
    ///
    /// iWorkflow reports failures as `{"code": N, "message": "..."}`;
    /// `message` carries that text when present, otherwise a body preview.
    #[error("iWorkflow API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// A `selfLink` returned by the controller could not be mapped onto
    /// the configured controller URL.
    #[error("Unexpected resource link: {link}")]
    UnexpectedLink { link: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// HTTP status attached to the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Authentication { .. } => Some(401),
            _ => None,
        }
    }
}
