//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. Route handlers return
//! `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::{AuthError, LinkError};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Sign-in failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Link operation failed.
    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    /// Reading or writing the cookie session failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidState | AuthError::MissingCode => StatusCode::BAD_REQUEST,
                AuthError::NotAuthorized(_) => StatusCode::FORBIDDEN,
                AuthError::Provider(_) => StatusCode::BAD_GATEWAY,
                AuthError::Session(_) | AuthError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Link(err) => match err {
                LinkError::InvalidSlug(_) | LinkError::InvalidDestination(_) => {
                    StatusCode::BAD_REQUEST
                }
                LinkError::NotFound(_) => StatusCode::NOT_FOUND,
                LinkError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server and upstream errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Auth(AuthError::Provider(_)) => "Sign-in provider unavailable".to_string(),
            Self::Auth(AuthError::NotAuthorized(_)) => {
                "This account is not allowed to sign in".to_string()
            }
            Self::Auth(AuthError::InvalidState | AuthError::MissingCode) => {
                "Sign-in expired, please try again".to_string()
            }
            Self::Link(LinkError::InvalidSlug(e)) => e.to_string(),
            Self::Link(LinkError::InvalidDestination(e)) => e.to_string(),
            Self::Link(LinkError::NotFound(_)) => "Not found".to_string(),
            _ => "Internal server error".to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context after a successful sign-in.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
mod tests {
    use golinks_core::SlugError;

    use super::*;
    use crate::db::RepositoryError;
    use crate::google::ProviderError;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::from(LinkError::NotFound("foo".to_string()));
        assert_eq!(err.to_string(), "Link error: no link named 'foo'");
    }

    #[test]
    fn test_auth_error_status_codes() {
        assert_eq!(
            get_status(AuthError::NotAuthorized("1337".to_string()).into()),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AuthError::InvalidState.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AuthError::MissingCode.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AuthError::Provider(ProviderError::OAuth("denied".to_string())).into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(
                AuthError::Repository(RepositoryError::Unavailable("down".to_string())).into()
            ),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_link_error_status_codes() {
        assert_eq!(
            get_status(LinkError::NotFound("foo".to_string()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(LinkError::InvalidSlug(SlugError::Empty).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(
                LinkError::Repository(RepositoryError::Unavailable("down".to_string())).into()
            ),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
