use thiserror::Error;
use upskill_auth::AuthError;
use upskill_core::error::UpskillError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Upskill(#[from] UpskillError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The checkout flow ended without granting access.
    #[error("{0}")]
    Declined(String),

    #[error("{0}")]
    Usage(String),
}

pub type CliResult<T> = Result<T, CliError>;
