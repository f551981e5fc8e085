//! Sign-in audit records.
//!
//! One `UserSession` record is written per successful sign-in. Nothing reads
//! them on the request path; the cookie session decides who is signed in.

use uuid::Uuid;

use golinks_core::{SessionRecordId, UserSession};

use super::{Datastore, Kind, RepositoryError, decode, encode};

/// Repository for `UserSession` audit records.
pub struct UserSessionRepository<'a> {
    store: &'a dyn Datastore,
}

impl<'a> UserSessionRepository<'a> {
    /// Create a new session record repository.
    #[must_use]
    pub const fn new(store: &'a dyn Datastore) -> Self {
        Self { store }
    }

    /// Store a new record under a fresh UUID key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    pub async fn create(&self, session: &UserSession) -> Result<SessionRecordId, RepositoryError> {
        let id = SessionRecordId::new(Uuid::new_v4().to_string());
        self.store
            .put(
                Kind::UserSession,
                id.as_str(),
                encode(Kind::UserSession, id.as_str(), session)?,
            )
            .await?;
        Ok(id)
    }

    /// All records, ordered by key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails or a stored record is invalid.
    pub async fn list(&self) -> Result<Vec<(SessionRecordId, UserSession)>, RepositoryError> {
        self.store
            .all(Kind::UserSession)
            .await?
            .into_iter()
            .map(|(key, record)| {
                let session: UserSession = decode(Kind::UserSession, &key, record)?;
                Ok((SessionRecordId::new(key), session))
            })
            .collect()
    }

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    pub async fn count(&self) -> Result<u64, RepositoryError> {
        self.store.count(Kind::UserSession).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use golinks_core::{Clock, ExternalId, FixedClock};

    use super::*;
    use crate::db::MemoryDatastore;

    #[tokio::test]
    async fn test_create_assigns_distinct_keys() {
        let store = MemoryDatastore::new();
        let sessions = UserSessionRepository::new(&store);
        let record = UserSession {
            user_id: ExternalId::new("42"),
            created_at: FixedClock::default().now(),
        };

        let first = sessions.create(&record).await.unwrap();
        let second = sessions.create(&record).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(sessions.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_list_decodes_records() {
        let store = MemoryDatastore::new();
        let sessions = UserSessionRepository::new(&store);
        let record = UserSession {
            user_id: ExternalId::new("42"),
            created_at: FixedClock::default().now(),
        };
        let id = sessions.create(&record).await.unwrap();

        let listed = sessions.list().await.unwrap();
        assert_eq!(listed, vec![(id, record)]);
    }
}
