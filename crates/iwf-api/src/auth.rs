// iWorkflow authentication
//
// Two strategies: HTTP Basic on every request, or a token obtained from
// `POST /mgmt/shared/authn/login` and sent as `X-F5-Auth-Token`.
// Tokens are released on logout via `DELETE /mgmt/shared/authz/tokens/{token}`.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::client::IWorkflowClient;
use crate::error::Error;

/// Login provider used when none is configured.
pub const DEFAULT_LOGIN_PROVIDER: &str = "local";

/// Which authentication strategy the client uses.
///
/// Marker enum (no data) -- credentials live on the client itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    /// No credentials attached (tests, pre-authenticated proxies).
    None,
    /// `Authorization: Basic` on every request.
    Basic,
    /// `X-F5-Auth-Token` from a prior login.
    Token,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: Option<LoginToken>,
}

#[derive(Deserialize)]
struct LoginToken {
    token: String,
}

impl IWorkflowClient {
    /// Exchange username/password for an auth token.
    ///
    /// On success the token is stored on the client and attached to all
    /// subsequent requests, replacing any Basic credentials.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
        login_provider: &str,
    ) -> Result<(), Error> {
        let url = self.api_url("shared/authn/login")?;
        debug!(%url, login_provider, "requesting auth token");

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
            "loginProviderName": login_provider,
        });

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {}", preview(&body)),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let parsed: LoginResponse =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: format!("{e} (body preview: {:?})", preview(&body)),
                body: body.clone(),
            })?;

        let token = parsed
            .token
            .map(|t| t.token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Authentication {
                message: "login response did not contain a token".into(),
            })?;

        self.set_token(SecretString::from(token));
        debug!("login successful");
        Ok(())
    }

    /// Release the current auth token, if any. Basic auth is a no-op.
    pub async fn logout(&self) -> Result<(), Error> {
        let Some(token) = self.take_token() else {
            return Ok(());
        };

        let url = self.api_url(&format!("shared/authz/tokens/{}", token.expose_secret()))?;
        debug!("releasing auth token");

        let resp = self
            .http()
            .delete(url)
            .header("X-F5-Auth-Token", token.expose_secret())
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
            return Err(Error::Api {
                status: status.as_u16(),
                message: "token release rejected".into(),
            });
        }
        Ok(())
    }
}

pub(crate) fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
