//! Entities persisted in the datastore.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Destination, Email, ExternalId, Slug};

/// A pre-provisioned user allowed to sign in.
///
/// Users are created by the seeding step and never mutated by the sign-in
/// flow. Two users are the same user when their ids match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Identity issued by the external provider.
    pub id: ExternalId,
    /// Email address on file.
    pub email: Email,
    /// Profile picture URL.
    pub picture: String,
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

/// A short link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Unique slug; the datastore key.
    pub slug: Slug,
    /// Where the slug redirects to.
    pub destination: Destination,
}

/// Audit record written on each successful sign-in.
///
/// Authorization never reads these; the cookie session is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    /// The user who signed in.
    pub user_id: ExternalId,
    /// When the sign-in completed.
    pub created_at: DateTime<Utc>,
}
