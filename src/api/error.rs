//! Errors returned by the GED REST client.

use reqwest::StatusCode;
use thiserror::Error;

/// Generic message shown to the user when a request fails.
const GENERIC_FAILURE: &str = "La requête vers le serveur a échoué";

/// Errors that can occur while talking to the GED backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or timeout failure.
    #[error("Connection error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Server answered with a non-2xx status.
    #[error("HTTP {status}{}", detail_suffix(.detail))]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },

    /// Response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Local validation failed; no request was sent.
    #[error("{0}")]
    Validation(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {}", d))
        .unwrap_or_default()
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e)
        }
    }
}

impl ApiError {
    /// Server-provided detail, when there is one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            ApiError::Validation(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Single user-facing message: the generic text plus any detail.
    pub fn user_message(&self) -> String {
        match self.detail() {
            Some(detail) => format!("{} : {}", GENERIC_FAILURE, detail),
            None => GENERIC_FAILURE.to_string(),
        }
    }
}
