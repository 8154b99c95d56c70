//! TFE API errors

use thiserror::Error;

/// Errors returned by the TFE client
///
/// The service answers 404 both for missing resources and for resources the
/// token cannot see, so `NotFound` covers both.
#[derive(Debug, Error)]
pub enum TfeError {
    #[error("resource not found")]
    NotFound,

    #[error("unauthorized: check the API token")]
    Unauthorized,

    #[error("API request failed: {status} {message}")]
    Api { status: u16, message: String },

    #[error("failed to send request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse response: {0}")]
    Decode(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl TfeError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TfeError::NotFound)
    }

    pub(crate) fn decode(what: &str, detail: impl std::fmt::Display) -> Self {
        TfeError::Decode(format!("{}: {}", what, detail))
    }
}

impl From<serde_json::Error> for TfeError {
    fn from(err: serde_json::Error) -> Self {
        TfeError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TfeError>;
