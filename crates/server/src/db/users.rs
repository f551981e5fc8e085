//! User repository.
//!
//! Users are stored under kind `User` keyed by their external id. The id is
//! not repeated in the body.

use serde::{Deserialize, Serialize};

use golinks_core::{Email, ExternalId, User};

use super::{Datastore, Kind, RepositoryError, decode, encode};

#[derive(Debug, Serialize, Deserialize)]
struct UserRecord {
    email: Email,
    #[serde(default)]
    picture: String,
}

/// Repository for provisioned users.
pub struct UserRepository<'a> {
    store: &'a dyn Datastore,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a dyn Datastore) -> Self {
        Self { store }
    }

    /// Get a user by their external id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails or the stored record is invalid.
    pub async fn get(&self, id: &ExternalId) -> Result<Option<User>, RepositoryError> {
        let Some(record) = self.store.get(Kind::User, id.as_str()).await? else {
            return Ok(None);
        };

        let record: UserRecord = decode(Kind::User, id.as_str(), record)?;
        Ok(Some(User {
            id: id.clone(),
            email: record.email,
            picture: record.picture,
        }))
    }

    /// Insert or overwrite a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    pub async fn put(&self, user: &User) -> Result<(), RepositoryError> {
        let record = UserRecord {
            email: user.email.clone(),
            picture: user.picture.clone(),
        };
        let key = user.id.as_str();
        self.store
            .put(Kind::User, key, encode(Kind::User, key, &record)?)
            .await
    }
}
