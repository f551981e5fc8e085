//! Slug redirects.
//!
//! `GET /` goes to the configured default; `GET /{*slug}` goes wherever the
//! slug was registered to. Both answer `301 Moved Permanently`.

use std::borrow::Cow;
use std::fmt::Write;

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};

use golinks_core::{Destination, Slug};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Percent-encode every non-ASCII byte so the URL fits in a header value.
///
/// ASCII is left alone, including existing `%XX` escapes.
fn escape_non_ascii(s: &str) -> Cow<'_, str> {
    if s.is_ascii() {
        return Cow::Borrowed(s);
    }

    let mut escaped = String::with_capacity(s.len() * 3);
    for byte in s.bytes() {
        if byte.is_ascii() {
            escaped.push(char::from(byte));
        } else {
            let _ = write!(escaped, "%{byte:02X}");
        }
    }
    Cow::Owned(escaped)
}

/// Build a `301` to `destination`.
///
/// `axum::response::Redirect::permanent` answers `308`, which is not what
/// existing clients of the shortener expect.
fn moved_permanently(destination: &Destination) -> Result<Response> {
    let location = escape_non_ascii(destination.as_str());
    let location = HeaderValue::from_str(&location).map_err(|e| {
        AppError::Internal(format!("unusable destination {destination}: {e}"))
    })?;
    Ok((StatusCode::MOVED_PERMANENTLY, [(LOCATION, location)]).into_response())
}

/// Redirect to the default destination.
///
/// # Route
///
/// `GET /`
pub async fn root(State(state): State<AppState>) -> Result<Response> {
    let destination = state.links().resolve(&Slug::from_path("")).await?;
    moved_permanently(&destination)
}

/// Redirect a slug to its destination.
///
/// # Route
///
/// `GET /{*slug}`
pub async fn follow(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Response> {
    let destination = state.links().resolve(&Slug::from_path(slug)).await?;
    moved_permanently(&destination)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_non_ascii() {
        assert_eq!(
            escape_non_ascii("https://example.com/café"),
            "https://example.com/caf%C3%A9"
        );
        assert_eq!(
            escape_non_ascii("https://example.com/a%20b?q=1"),
            "https://example.com/a%20b?q=1"
        );
    }

    #[test]
    fn test_moved_permanently_non_ascii_location() {
        let destination = Destination::parse("https://example.com/日本").unwrap();
        let response = moved_permanently(&destination).unwrap();

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            response.headers()[LOCATION].to_str().unwrap(),
            "https://example.com/%E6%97%A5%E6%9C%AC"
        );
    }
}
