//! Session-related types.
//!
//! Types stored in the cookie session for authentication state.

use serde::{Deserialize, Serialize};

use golinks_core::ExternalId;

/// Session-stored user identity.
///
/// Only the external id is kept. The gate trusts its presence and does not
/// re-check the user store on each request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrentUser {
    /// The signed-in user's external id.
    pub id: ExternalId,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for the signed-in user's external id.
    pub const USER_ID: &str = "user_id";

    /// Key for the pending OAuth state (CSRF protection).
    pub const OAUTH_STATE: &str = "oauth_state";
}
