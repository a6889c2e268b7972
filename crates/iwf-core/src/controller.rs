// ── Controller connection ──
//
// Owns the authenticated `IWorkflowClient` for one run: builds the
// transport from `ControllerConfig`, logs in when token auth is
// configured, runs reconciliations, and releases the token afterwards.

use tracing::{debug, warn};

use iwf_api::IWorkflowClient;
use iwf_api::transport::{TlsMode, TransportConfig};

use crate::config::{AuthCredentials, ControllerConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{DesiredState, ReconcileOutcome};
use crate::reconciler::Reconciler;

/// An authenticated connection to one iWorkflow controller.
pub struct Controller {
    config: ControllerConfig,
    client: IWorkflowClient,
}

impl Controller {
    /// Build the HTTP client and authenticate.
    ///
    /// Basic credentials are attached to every request and need no round
    /// trip; token credentials are exchanged for a token here.
    pub async fn connect(config: ControllerConfig) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let client = IWorkflowClient::new(config.url.clone(), &transport)?;

        let client = match &config.auth {
            AuthCredentials::Basic { username, password } => {
                debug!(username, "using basic auth");
                client.with_basic_auth(username.clone(), password.clone())
            }
            AuthCredentials::Token {
                username,
                password,
                login_provider,
            } => {
                client.login(username, password, login_provider).await?;
                debug!(username, login_provider, "token authentication successful");
                client
            }
        };

        Ok(Self { config, client })
    }

    /// Run one reconciliation with the configured wait policy.
    pub async fn reconcile(&self, desired: &DesiredState) -> Result<ReconcileOutcome, CoreError> {
        Reconciler::new(&self.client, self.config.wait)
            .reconcile(desired)
            .await
    }

    /// Release the auth token, if any. Failures are logged, not returned.
    pub async fn disconnect(self) {
        if let Err(e) = self.client.logout().await {
            warn!(error = %e, "token release failed (non-fatal)");
        }
        debug!("disconnected");
    }
}

fn build_transport(config: &ControllerConfig) -> TransportConfig {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    };
    TransportConfig {
        tls,
        timeout: config.timeout,
    }
}
