// iWorkflow REST HTTP client
//
// Wraps `reqwest::Client` with iWorkflow URL construction, credential
// injection, collection unwrapping and error mapping. Endpoint groups
// (devices, pools, auth) are implemented as inherent methods in separate
// files to keep this module focused on transport mechanics.

use std::sync::{PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::{AuthStrategy, preview};
use crate::error::Error;
use crate::models::Collection;
use crate::transport::TransportConfig;

/// iWorkflow reports failures as `{"code": 400, "message": "..."}`.
#[derive(serde::Deserialize)]
struct RestError {
    message: Option<String>,
}

/// Raw HTTP client for the iWorkflow REST API.
///
/// All paths live under `/mgmt/`. Resource `selfLink`s returned by the
/// controller point at `https://localhost/...`; [`link_url`](Self::link_url)
/// rebases them onto the configured controller URL before use.
pub struct IWorkflowClient {
    http: reqwest::Client,
    base_url: Url,
    basic: Option<(String, SecretString)>,
    /// Auth token from `login()`. Takes precedence over Basic credentials.
    token: RwLock<Option<SecretString>>,
}

impl IWorkflowClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the controller root, e.g. `https://iwf.example.net`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            basic: None,
            token: RwLock::new(None),
        }
    }

    /// Attach HTTP Basic credentials to every request.
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: SecretString) -> Self {
        self.basic = Some((username.into(), password));
        self
    }

    /// The underlying HTTP client (for auth flows that need direct access).
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Strategy currently in effect.
    pub fn auth_strategy(&self) -> AuthStrategy {
        if self.read_token().is_some() {
            AuthStrategy::Token
        } else if self.basic.is_some() {
            AuthStrategy::Basic
        } else {
            AuthStrategy::None
        }
    }

    // ── Token management ─────────────────────────────────────────────

    pub(crate) fn set_token(&self, token: SecretString) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub(crate) fn take_token(&self) -> Option<SecretString> {
        self.token
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn read_token(&self) -> Option<SecretString> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn apply_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = self.read_token() {
            return builder.header("X-F5-Auth-Token", token.expose_secret());
        }
        match &self.basic {
            Some((user, password)) => builder.basic_auth(user, Some(password.expose_secret())),
            None => builder,
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for a REST path: `{base}/mgmt/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/mgmt/{path}"))?)
    }

    /// Map a resource `selfLink` onto the controller URL.
    ///
    /// Only the path (and query, if any) of the link is kept. Relative
    /// links starting with `/mgmt/` are accepted as-is.
    pub fn link_url(&self, link: &str) -> Result<Url, Error> {
        let unexpected = || Error::UnexpectedLink { link: link.into() };

        let (path, query) = if link.starts_with('/') {
            match link.split_once('?') {
                Some((p, q)) => (p.to_owned(), Some(q.to_owned())),
                None => (link.to_owned(), None),
            }
        } else {
            let parsed = Url::parse(link).map_err(|_| unexpected())?;
            (parsed.path().to_owned(), parsed.query().map(String::from))
        };

        if !path.starts_with("/mgmt/") {
            return Err(unexpected());
        }

        let mut url = self.base_url.clone();
        url.set_path(&path);
        url.set_query(query.as_deref());
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET a collection and unwrap its `items`.
    pub(crate) async fn get_collection<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, Error> {
        let collection: Collection<T> = self.get(url).await?;
        Ok(collection.items)
    }

    /// GET a single resource.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self
            .apply_auth(self.http.get(url))
            .send()
            .await
            .map_err(Error::Transport)?;
        parse_json(resp).await
    }

    /// POST a JSON body and decode the created resource.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let resp = self
            .apply_auth(self.http.post(url).json(body))
            .send()
            .await
            .map_err(Error::Transport)?;
        parse_json(resp).await
    }

    /// DELETE a resource. The response body is ignored.
    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {}", url);
        let resp = self
            .apply_auth(self.http.delete(url))
            .send()
            .await
            .map_err(Error::Transport)?;
        check_status(resp).await.map(drop)
    }
}

/// Turn a non-success response into an [`Error`].
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<RestError>(&body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or_else(|| preview(&body).to_owned());

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Error::Authentication {
            message: if message.is_empty() {
                "credentials rejected by controller".into()
            } else {
                message
            },
        });
    }

    Err(Error::Api {
        status: status.as_u16(),
        message: if message.is_empty() {
            status.to_string()
        } else {
            message
        },
    })
}

async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let resp = check_status(resp).await?;
    let body = resp.text().await.map_err(Error::Transport)?;
    trace!(len = body.len(), "response body received");

    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body,
    })
}
