//! Session middleware configuration.
//!
//! Cookie sessions via tower-sessions. The cookie is signed with the
//! configured session secret; session data lives in the store.

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore, service::SignedCookie};

use crate::config::{ConfigError, GolinksConfig};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "golinks_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer over the given store.
///
/// Production passes a `PostgresStore`; tests pass a `MemoryStore`.
///
/// # Errors
///
/// Returns `ConfigError::InsecureSecret` if the session secret cannot be used
/// as a signing key.
pub fn create_session_layer<S>(
    store: S,
    config: &GolinksConfig,
) -> Result<SessionManagerLayer<S, SignedCookie>, ConfigError>
where
    S: SessionStore + Clone,
{
    let key = config.session_key()?;

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key))
}
