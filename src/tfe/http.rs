//! HTTP utilities for TFE REST API calls

use super::error::{Result, TfeError};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::Value;

/// Media type used by the JSON:API endpoints
pub const JSONAPI_CONTENT_TYPE: &str = "application/vnd.api+json";

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Pull a readable message out of a JSON:API error document
///
/// `{"errors": [{"status": "422", "title": "invalid attribute", "detail": "..."}]}`
fn error_message(body: &str) -> String {
    let Ok(doc) = serde_json::from_str::<Value>(body) else {
        return sanitize_for_log(body);
    };

    let messages: Vec<String> = doc
        .get("errors")
        .and_then(|v| v.as_array())
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| {
                    // Older endpoints return a bare list of strings
                    if let Some(s) = e.as_str() {
                        return Some(s.to_string());
                    }
                    let title = e.get("title").and_then(|v| v.as_str());
                    let detail = e.get("detail").and_then(|v| v.as_str());
                    match (title, detail) {
                        (Some(t), Some(d)) => Some(format!("{}: {}", t, d)),
                        (Some(t), None) => Some(t.to_string()),
                        (None, Some(d)) => Some(d.to_string()),
                        (None, None) => None,
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    if messages.is_empty() {
        sanitize_for_log(body)
    } else {
        messages.join("; ")
    }
}

/// Map a non-success status to a client error
pub(crate) fn error_for_status(status: StatusCode, body: &str) -> TfeError {
    match status {
        StatusCode::NOT_FOUND => TfeError::NotFound,
        StatusCode::UNAUTHORIZED => TfeError::Unauthorized,
        _ => TfeError::Api {
            status: status.as_u16(),
            message: error_message(body),
        },
    }
}

/// HTTP client wrapper for TFE API calls
#[derive(Clone)]
pub struct TfeHttpClient {
    client: Client,
}

impl TfeHttpClient {
    /// Create a new HTTP client
    pub fn new(ssl_skip_verify: bool) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("tfe-runtask/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(ssl_skip_verify)
            .build()?;

        Ok(Self { client })
    }

    /// Make a GET request to a TFE API
    pub async fn get(&self, url: &str, token: &str, query: &[(&str, String)]) -> Result<Value> {
        tracing::debug!("GET {}", url);
        let request = self.request(Method::GET, url, token).query(query);
        self.send(request).await
    }

    /// Make a POST request to a TFE API
    pub async fn post(&self, url: &str, token: &str, body: &Value) -> Result<Value> {
        tracing::debug!("POST {}", url);
        let request = self
            .request(Method::POST, url, token)
            .header(CONTENT_TYPE, JSONAPI_CONTENT_TYPE)
            .body(serde_json::to_vec(body)?);
        self.send(request).await
    }

    /// Make a PATCH request to a TFE API
    pub async fn patch(&self, url: &str, token: &str, body: &Value) -> Result<Value> {
        tracing::debug!("PATCH {}", url);
        let request = self
            .request(Method::PATCH, url, token)
            .header(CONTENT_TYPE, JSONAPI_CONTENT_TYPE)
            .body(serde_json::to_vec(body)?);
        self.send(request).await
    }

    /// Make a DELETE request to a TFE API
    pub async fn delete(&self, url: &str, token: &str) -> Result<Value> {
        tracing::debug!("DELETE {}", url);
        let request = self.request(Method::DELETE, url, token);
        self.send(request).await
    }

    fn request(&self, method: Method, url: &str, token: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(token)
            .header(ACCEPT, JSONAPI_CONTENT_TYPE)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            if status == StatusCode::NOT_FOUND {
                tracing::debug!("API returned 404");
            } else {
                tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            }
            return Err(error_for_status(status, &body));
        }

        // Handle empty response (204 No Content)
        if body.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| TfeError::decode("response JSON", e))
    }
}
