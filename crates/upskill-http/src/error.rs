//! HTTP-specific error types and conversions.

use upskill_core::error::UpskillError;

/// Transport-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Undecodable response body: {0}")]
    Decode(String),

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl From<HttpError> for UpskillError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Reqwest(_) | HttpError::Decode(_) => UpskillError::network(),
            HttpError::InvalidBaseUrl { .. } => UpskillError::Internal(err.to_string()),
        }
    }
}
