//! TFE Client
//!
//! Main client for interacting with the TFE API, combining the resolved
//! address, the API token and the HTTP wrapper.

use super::error::{Result, TfeError};
use super::http::TfeHttpClient;
use serde_json::Value;
use url::Url;

/// Default TFE hostname
pub const DEFAULT_HOSTNAME: &str = "app.terraform.io";

/// Page size requested from list endpoints
const PAGE_SIZE: u32 = 100;

/// Main TFE client
#[derive(Clone)]
pub struct TfeClient {
    pub http: TfeHttpClient,
    address: String,
    token: String,
}

impl std::fmt::Debug for TfeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfeClient")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl TfeClient {
    /// Create a new TFE client for `hostname`
    ///
    /// `hostname` may be a bare host (`app.terraform.io`) or a full address
    /// with scheme and port (`http://127.0.0.1:8080`).
    pub fn new(hostname: &str, token: &str, ssl_skip_verify: bool) -> Result<Self> {
        if token.is_empty() {
            return Err(TfeError::InvalidRequest(format!(
                "no API token configured for {}",
                hostname
            )));
        }

        let address = normalize_address(hostname)?;
        let http = TfeHttpClient::new(ssl_skip_verify)?;
        tracing::debug!("TFE client configured for {}", address);

        Ok(Self {
            http,
            address,
            token: token.to_string(),
        })
    }

    /// Base address, without trailing slash
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Build a `/api/v2` URL from already-encoded path segments
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api/v2/{}", self.address, path.trim_start_matches('/'))
    }

    /// Make a GET request to a TFE API
    pub async fn get(&self, url: &str) -> Result<Value> {
        self.http.get(url, &self.token, &[]).await
    }

    /// Make a POST request to a TFE API
    pub async fn post(&self, url: &str, body: &Value) -> Result<Value> {
        self.http.post(url, &self.token, body).await
    }

    /// Make a PATCH request to a TFE API
    pub async fn patch(&self, url: &str, body: &Value) -> Result<Value> {
        self.http.patch(url, &self.token, body).await
    }

    /// Make a DELETE request to a TFE API
    pub async fn delete(&self, url: &str) -> Result<Value> {
        self.http.delete(url, &self.token).await
    }

    /// Fetch every page of a list endpoint and return the `data` items
    pub async fn get_all(&self, url: &str) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        let mut page: u32 = 1;

        loop {
            let query = [
                ("page[number]", page.to_string()),
                ("page[size]", PAGE_SIZE.to_string()),
            ];
            let response = self.http.get(url, &self.token, &query).await?;

            let data = response
                .get("data")
                .and_then(|v| v.as_array())
                .ok_or_else(|| TfeError::decode("list response", "missing data array"))?;
            items.extend(data.iter().cloned());

            match next_page(&response) {
                Some(next) if next > page => page = next,
                _ => break,
            }
        }

        Ok(items)
    }
}

/// Read `meta.pagination.next-page` from a list response
fn next_page(response: &Value) -> Option<u32> {
    response
        .get("meta")
        .and_then(|m| m.get("pagination"))
        .and_then(|p| p.get("next-page"))
        .and_then(|v| v.as_u64())
        .and_then(|n| u32::try_from(n).ok())
}

/// Turn a configured hostname into a base address
fn normalize_address(hostname: &str) -> Result<String> {
    let hostname = hostname.trim();
    let candidate = if hostname.contains("://") {
        hostname.to_string()
    } else {
        format!("https://{}", hostname)
    };

    let url = Url::parse(&candidate)
        .map_err(|e| TfeError::InvalidRequest(format!("invalid hostname {}: {}", hostname, e)))?;
    if url.host_str().is_none() {
        return Err(TfeError::InvalidRequest(format!(
            "invalid hostname {}: missing host",
            hostname
        )));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Percent-encode a single path segment (organization or workspace name)
pub fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
