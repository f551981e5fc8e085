//! Authentication service.
//!
//! Runs the Google sign-in handshake: `begin_login` sends the visitor to the
//! consent page, `complete_login` handles the callback and signs them in.

mod error;

pub use error::AuthError;

use rand::Rng;
use tower_sessions::Session;

use golinks_core::{Clock, User, UserSession};

use crate::db::{Datastore, UserRepository, UserSessionRepository};
use crate::google::{IdentityProvider, ProviderError};
use crate::models::{CurrentUser, session_keys};

/// Length of the anti-forgery `state` token.
pub const STATE_LENGTH: usize = 32;

/// Authentication service.
pub struct AuthService<'a> {
    provider: &'a dyn IdentityProvider,
    users: UserRepository<'a>,
    sessions: UserSessionRepository<'a>,
    clock: &'a dyn Clock,
    redirect_uri: &'a str,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    ///
    /// `redirect_uri` must be the callback URL registered with the provider.
    #[must_use]
    pub fn new(
        store: &'a dyn Datastore,
        provider: &'a dyn IdentityProvider,
        clock: &'a dyn Clock,
        redirect_uri: &'a str,
    ) -> Self {
        Self {
            provider,
            users: UserRepository::new(store),
            sessions: UserSessionRepository::new(store),
            clock,
            redirect_uri,
        }
    }

    /// Start a sign-in.
    ///
    /// Stores a fresh `state` token in the session and returns the consent
    /// URL to redirect the visitor to.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Session` if the state cannot be stored.
    pub async fn begin_login(&self, session: &Session) -> Result<String, AuthError> {
        let state = generate_state();
        session.insert(session_keys::OAUTH_STATE, &state).await?;

        Ok(self.provider.authorization_url(self.redirect_uri, &state))
    }

    /// Finish a sign-in from the provider's callback.
    ///
    /// On success exactly one `UserSession` record is written and the session
    /// carries the user's id under a fresh session id.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidState` if `state` does not match the stored token.
    /// Returns `AuthError::MissingCode` if no code was supplied.
    /// Returns `AuthError::Provider` if the code exchange or profile fetch fails.
    /// Returns `AuthError::NotAuthorized` if the account is not a provisioned user.
    pub async fn complete_login(
        &self,
        session: &Session,
        code: Option<&str>,
        state: Option<&str>,
    ) -> Result<User, AuthError> {
        // One-time use: removed before comparing
        let expected: Option<String> = session.remove(session_keys::OAUTH_STATE).await?;
        match (expected.as_deref(), state) {
            (Some(expected), Some(returned)) if expected == returned => {}
            _ => return Err(AuthError::InvalidState),
        }

        let code = code.filter(|c| !c.is_empty()).ok_or(AuthError::MissingCode)?;

        let token = self.provider.exchange_code(code, self.redirect_uri).await?;
        let profile = self.provider.fetch_profile(&token).await?;
        if profile.id.as_str().is_empty() {
            return Err(ProviderError::Profile("profile has no id".to_string()).into());
        }

        let user = self
            .users
            .get(&profile.id)
            .await?
            .ok_or_else(|| AuthError::NotAuthorized(profile.id.to_string()))?;

        self.sessions
            .create(&UserSession {
                user_id: user.id.clone(),
                created_at: self.clock.now(),
            })
            .await?;

        session.cycle_id().await?;
        session
            .insert(
                session_keys::USER_ID,
                CurrentUser {
                    id: user.id.clone(),
                },
            )
            .await?;

        tracing::info!(user_id = %user.id, "User signed in");

        Ok(user)
    }
}

/// Generate a random alphanumeric `state` token.
fn generate_state() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..STATE_LENGTH)
        .filter_map(|_| CHARSET.get(rng.random_range(0..CHARSET.len())))
        .map(|&b| char::from(b))
        .collect()
}
