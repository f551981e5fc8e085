//! Google OAuth 2.0 client.
//!
//! # OAuth Flow
//!
//! 1. Generate authorization URL with `authorization_url()`
//! 2. Redirect the visitor to Google's consent page
//! 3. Google redirects back with an authorization code
//! 4. Exchange the code for tokens with `exchange_code()`
//! 5. Fetch the account profile with `fetch_profile()`
//!
//! The [`IdentityProvider`] trait is the seam the sign-in flow depends on;
//! [`GoogleClient`] is the production implementation.

mod types;

pub use types::{AccessToken, Profile};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::GoogleConfig;
use types::TokenResponse;

/// Scope requested from Google: read the account's email address.
pub const EMAIL_SCOPE: &str = "https://www.googleapis.com/auth/userinfo.email";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur when talking to the identity provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed (connect, timeout, decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The token endpoint rejected the exchange.
    #[error("OAuth error: {0}")]
    OAuth(String),

    /// The profile endpoint returned an error.
    #[error("profile error: {0}")]
    Profile(String),
}

/// An external OAuth 2.0 identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Build the consent URL the visitor is redirected to.
    fn authorization_url(&self, redirect_uri: &str, state: &str) -> String;

    /// Exchange a one-time authorization code for tokens.
    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<AccessToken, ProviderError>;

    /// Fetch the signed-in account's profile.
    async fn fetch_profile(&self, token: &AccessToken) -> Result<Profile, ProviderError>;
}

/// Client for Google's OAuth 2.0 endpoints.
#[derive(Clone)]
pub struct GoogleClient {
    inner: Arc<GoogleClientInner>,
}

struct GoogleClientInner {
    client: reqwest::Client,
    config: GoogleConfig,
}

impl GoogleClient {
    /// Create a new Google OAuth client.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Http` if the HTTP client cannot be built.
    pub fn new(config: &GoogleConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("golinks/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(GoogleClientInner {
                client,
                config: config.clone(),
            }),
        })
    }

    /// Get the OAuth client ID.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.inner.config.client_id
    }
}

#[async_trait]
impl IdentityProvider for GoogleClient {
    /// Consent URL requesting the email scope with offline access.
    fn authorization_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}?\
            client_id={}&\
            redirect_uri={}&\
            response_type=code&\
            scope={}&\
            access_type=offline&\
            state={}",
            self.inner.config.auth_uri,
            urlencoding::encode(&self.inner.config.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(EMAIL_SCOPE),
            urlencoding::encode(state)
        )
    }

    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<AccessToken, ProviderError> {
        let config = &self.inner.config;
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.expose_secret()),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];

        let response = self
            .inner
            .client
            .post(&config.token_uri)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::OAuth(format!(
                "Token exchange failed ({status}): {text}"
            )));
        }

        let token_response: TokenResponse = response.json().await?;
        Ok(token_response.into())
    }

    async fn fetch_profile(&self, token: &AccessToken) -> Result<Profile, ProviderError> {
        let response = self
            .inner
            .client
            .get(&self.inner.config.userinfo_uri)
            .bearer_auth(token.access_token.expose_secret())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Profile(format!(
                "Profile request failed ({status}): {text}"
            )));
        }

        Ok(response.json().await?)
    }
}
