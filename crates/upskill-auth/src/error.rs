//! Authentication error types.
//!
//! The `Display` text of every variant is shown to the user as-is.

use thiserror::Error;
use upskill_core::error::{NETWORK_ERROR_MESSAGE, UpskillError};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("An account with this email already exists. Please sign in instead.")]
    EmailTaken,

    #[error("Invalid email or password.")]
    InvalidCredentials,

    #[error("{}", NETWORK_ERROR_MESSAGE)]
    Network,

    /// Unmapped backend message, passed through verbatim.
    #[error("{0}")]
    Rejected(String),

    #[error("invalid token: {0}")]
    TokenInvalid(String),
}

impl AuthError {
    /// Fixed lookup from backend error text to a display variant.
    pub fn translate(message: &str) -> Self {
        match message.trim().trim_end_matches('.').to_ascii_lowercase().as_str() {
            "user with this email already exists" | "email already exists" => Self::EmailTaken,
            "invalid email or password" | "invalid credentials" => Self::InvalidCredentials,
            _ => Self::Rejected(message.to_string()),
        }
    }
}

impl From<UpskillError> for AuthError {
    fn from(err: UpskillError) -> Self {
        match err {
            UpskillError::Transport(_) => AuthError::Network,
            UpskillError::Api { message, .. } => AuthError::translate(&message),
            other => AuthError::Rejected(other.message()),
        }
    }
}

impl From<AuthError> for UpskillError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Network => UpskillError::network(),
            AuthError::TokenInvalid(_) => UpskillError::Internal(err.to_string()),
            other => UpskillError::Validation {
                message: other.to_string(),
            },
        }
    }
}
