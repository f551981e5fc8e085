//! Wire types for Google's OAuth 2.0 token and profile endpoints.

use secrecy::SecretString;
use serde::Deserialize;

use golinks_core::ExternalId;

/// Token endpoint response.
///
/// Refresh tokens and lifetimes are ignored: the access token is used once,
/// for the profile fetch that follows the exchange.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

/// Access token obtained from an authorization code.
#[derive(Debug)]
pub struct AccessToken {
    /// Bearer token for profile requests.
    pub access_token: SecretString,
}

impl From<TokenResponse> for AccessToken {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: SecretString::from(response.access_token),
        }
    }
}

/// The `userinfo/v2/me` document.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    /// Stable account id; the key users are provisioned under.
    pub id: ExternalId,
    /// Primary email, present with the `userinfo.email` scope.
    pub email: Option<String>,
    /// Whether Google verified `email`.
    pub verified_email: Option<bool>,
    /// Avatar URL.
    pub picture: Option<String>,
}
