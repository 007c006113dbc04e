//! Typed gateway over the backend services.
//!
//! Every operation issues exactly one HTTP request against the base URL configured for
//! its domain and maps the response to a typed value or a [`ClientError`]. There is no
//! retry, caching or timeout layer: each failure reaches the caller once.

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::{Domain, ServiceEndpoints};
use crate::error::{ClientError, ClientResult};
use crate::session::Identity;

pub mod auth;
pub mod booking;
pub mod calendar;
pub mod facility;
pub mod notification;
pub mod payment;

/// Header the booking service trusts for the acting user.
pub const USER_ID_HEADER: &str = "X-User-Id";

#[derive(Clone)]
pub struct GatewayClient {
    endpoints: ServiceEndpoints,
    http: reqwest::Client,
    bearer: Option<String>,
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("endpoints", &self.endpoints)
            .field("bearer", &self.bearer.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl GatewayClient {
    pub fn new(endpoints: ServiceEndpoints) -> Self {
        Self::with_http_client(endpoints, reqwest::Client::new())
    }

    pub fn with_http_client(endpoints: ServiceEndpoints, http: reqwest::Client) -> Self {
        Self { endpoints, http, bearer: None }
    }

    /// Client for endpoints resolved from the `PRPO_*` environment.
    pub fn from_env() -> Self { Self::new(ServiceEndpoints::from_env()) }

    /// Attach `Authorization: Bearer <token>` to every request.
    pub fn with_bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer = token.filter(|t| !t.is_empty());
        self
    }

    /// Clone of this client carrying the identity's login token, if it has one.
    pub fn for_identity(&self, identity: &Identity) -> Self {
        self.clone().with_bearer_token(identity.token.clone())
    }

    pub fn endpoints(&self) -> &ServiceEndpoints { &self.endpoints }

    pub fn bearer_token(&self) -> Option<&str> { self.bearer.as_deref() }

    pub(crate) fn request(&self, method: Method, domain: Domain, path: &str) -> RequestBuilder {
        let url = self.endpoints.url(domain, path);
        debug!(%method, %url, "gateway request");
        let rb = self.http.request(method, url);
        match &self.bearer {
            Some(token) => rb.bearer_auth(token),
            None => rb,
        }
    }

    pub(crate) fn user_request(&self, method: Method, domain: Domain, path: &str, user_id: i64) -> RequestBuilder {
        self.request(method, domain, path).header(USER_ID_HEADER, user_id.to_string())
    }
}

/// Send and check the status. A non-2xx response is read as text: non-empty text is the
/// error message, an empty body yields `"<label> (<status>)"`.
pub(crate) async fn dispatch(operation: &'static str, label: &'static str, rb: RequestBuilder) -> ClientResult<Response> {
    let resp = rb.send().await.map_err(|e| {
        warn!(operation, error = %e, "transport failure");
        ClientError::transport(operation, e.to_string())
    })?;
    let status = resp.status();
    if status.is_success() {
        debug!(operation, status = status.as_u16(), "gateway response");
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let err = ClientError::application(operation, label, status.as_u16(), body);
    warn!(operation, status = status.as_u16(), reason = err.message(), "service rejected request");
    Err(err)
}

pub(crate) async fn read_json<T: DeserializeOwned>(operation: &'static str, resp: Response) -> ClientResult<T> {
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| ClientError::transport(operation, e.to_string()))?;
    serde_json::from_slice::<T>(&bytes).map_err(|e| {
        warn!(operation, error = %e, "undecodable response body");
        ClientError::decode(operation, format!("unable to parse response from {}: {}", operation, e))
    })
}

pub(crate) async fn read_text(operation: &'static str, resp: Response) -> ClientResult<String> {
    resp.text().await.map_err(|e| ClientError::transport(operation, e.to_string()))
}

pub(crate) async fn call_json<T: DeserializeOwned>(
    operation: &'static str,
    label: &'static str,
    rb: RequestBuilder,
) -> ClientResult<T> {
    let resp = dispatch(operation, label, rb).await?;
    read_json(operation, resp).await
}

/// Path segment from free text (session ids, facility types).
pub(crate) fn segment(raw: &str) -> String { urlencoding::encode(raw).into_owned() }
