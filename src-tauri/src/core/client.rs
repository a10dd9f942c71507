use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::adapter::IdentityAdapter;
use super::errors::AdapterError;
use super::fields::{FieldEntry, FieldValue, ProfileField};
use super::session::Session;

pub(crate) const API_KEY_HEADER: &str = "x-api-key";

// ── HTTP Helpers ─────────────────────────────────────────────────────────────

/// Append path segments to `base`, percent-encoding each one.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, AdapterError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| AdapterError::Session(format!("{base} cannot be a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Turn a non-2xx response into `AdapterError::Status`.
pub(crate) async fn check_status(
    resp: reqwest::Response,
) -> Result<reqwest::Response, AdapterError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(AdapterError::Status {
        status: status.as_u16(),
        body,
    })
}

// ── Wire Types ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct DataResponse {
    #[serde(default)]
    data: Vec<Option<FieldValue>>,
}

#[derive(Serialize)]
struct PutRequest<'a> {
    data: &'a [FieldEntry],
}

// ── HTTP Identity Client ─────────────────────────────────────────────────────

/// [`IdentityAdapter`] backed by the identity service's REST API.
///
/// Every request carries the API key and a session token for the address it
/// targets.  A 401 drops the cached token so the next call signs in again;
/// the failing call itself is not retried.
pub struct HttpIdentityClient {
    http: reqwest::Client,
    api_url: Url,
    api_key: Option<String>,
    session: Arc<dyn Session>,
}

impl HttpIdentityClient {
    pub fn new(
        http: reqwest::Client,
        api_url: Url,
        api_key: Option<String>,
        session: Arc<dyn Session>,
    ) -> Self {
        Self {
            http,
            api_url,
            api_key,
            session,
        }
    }

    /// Shared reqwest client for the identity service.
    pub fn http_client() -> Result<reqwest::Client, AdapterError> {
        Ok(reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?)
    }

    fn data_url(&self, address: &str) -> Result<Url, AdapterError> {
        endpoint(&self.api_url, &["users", address, "data"])
    }

    async fn send(
        &self,
        address: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<DataResponse, AdapterError> {
        let api_key = self.api_key.as_deref().ok_or(AdapterError::MissingApiKey)?;
        let token = self.session.token(address).await?;

        let resp = request
            .header(API_KEY_HEADER, api_key)
            .bearer_auth(token)
            .send()
            .await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            warn!("session for {address} rejected, dropping cached token");
            self.session.invalidate(address);
        }

        Ok(check_status(resp).await?.json().await?)
    }
}

#[async_trait]
impl IdentityAdapter for HttpIdentityClient {
    async fn get(
        &self,
        address: &str,
        fields: &[ProfileField],
    ) -> Result<Vec<Option<FieldValue>>, AdapterError> {
        let ids = fields.iter().map(|f| f.id()).collect::<Vec<_>>().join(",");
        debug!("GET {} for {address}", ids);

        let request = self
            .http
            .get(self.data_url(address)?)
            .query(&[("fields", ids.as_str())]);
        let resp = self.send(address, request).await?;

        // Align by field id; the service may omit trailing nulls.
        Ok(fields
            .iter()
            .map(|field| {
                resp.data
                    .iter()
                    .flatten()
                    .find(|v| v.field() == Some(*field))
                    .cloned()
            })
            .collect())
    }

    async fn put(
        &self,
        address: &str,
        entries: &[FieldEntry],
    ) -> Result<Vec<FieldValue>, AdapterError> {
        debug!("PUT {} fields for {address}", entries.len());

        let request = self
            .http
            .post(self.data_url(address)?)
            .json(&PutRequest { data: entries });
        let resp = self.send(address, request).await?;

        Ok(resp.data.into_iter().flatten().collect())
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
