//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::google::ProviderError;

/// Errors that can occur while signing a visitor in.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The callback's `state` is missing or does not match the stored one.
    #[error("invalid OAuth state")]
    InvalidState,

    /// The callback carried no authorization code.
    #[error("missing authorization code")]
    MissingCode,

    /// The Google account is not a provisioned user.
    #[error("account {0} is not authorized")]
    NotAuthorized(String),

    /// Token exchange or profile fetch failed.
    #[error("identity provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Reading or writing the cookie session failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
