//! Error types shared by every UpSkillHub crate.

use thiserror::Error;

/// Message shown for any failure that never produced a backend answer.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection and try again.";

#[derive(Debug, Clone, Error)]
pub enum UpskillError {
    /// The backend answered with a non-2xx status and (usually) an
    /// `{error, details?}` body.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Network or decode failure, already normalized for display.
    #[error("{0}")]
    Transport(String),

    #[error("{message}")]
    Validation { message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl UpskillError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// The transport failure every caller sees, whatever the cause.
    pub fn network() -> Self {
        Self::Transport(NETWORK_ERROR_MESSAGE.into())
    }

    /// Human-readable text meant for direct display.
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

pub type UpskillResult<T> = Result<T, UpskillError>;
