//! Datastore access.
//!
//! The application treats persistence as a schemaless key-value store: every
//! record lives under a [`Kind`] and a string key, and the body is a JSON
//! document. The typed repositories ([`LinkRepository`], [`UserRepository`],
//! [`UserSessionRepository`]) translate between those documents and the core
//! entities.
//!
//! ## Backends
//!
//! - [`PgDatastore`] - `golinks.entity` table in `PostgreSQL` (JSONB records)
//! - [`MemoryDatastore`] - process-local map, used by tests
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p golinks-cli -- migrate
//! ```

pub mod links;
pub mod memory;
pub mod postgres;
pub mod sessions;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use links::LinkRepository;
pub use memory::MemoryDatastore;
pub use postgres::PgDatastore;
pub use sessions::UserSessionRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the datastore is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The backing store cannot be reached.
    #[error("datastore unavailable: {0}")]
    Unavailable(String),
}

/// Record namespace, the first half of every datastore key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    /// Pre-provisioned users, keyed by external id.
    User,
    /// Short links, keyed by slug.
    Link,
    /// Sign-in audit records, keyed by UUID.
    UserSession,
}

impl Kind {
    /// Name stored in the `kind` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Link => "Link",
            Self::UserSession => "UserSession",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key-value store of JSON records grouped by kind.
///
/// Every operation touches a single key or a single kind. There are no
/// transactions: `put` is an upsert and the last write wins.
#[async_trait]
pub trait Datastore: Send + Sync {
    /// Fetch the record stored under `(kind, key)`.
    async fn get(&self, kind: Kind, key: &str) -> Result<Option<Value>, RepositoryError>;

    /// Insert or replace the record stored under `(kind, key)`.
    async fn put(&self, kind: Kind, key: &str, record: Value) -> Result<(), RepositoryError>;

    /// All records of a kind as `(key, record)` pairs, ordered by key bytes.
    async fn all(&self, kind: Kind) -> Result<Vec<(String, Value)>, RepositoryError>;

    /// Number of records of a kind.
    async fn count(&self, kind: Kind) -> Result<u64, RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Decode a stored record, reporting the key on failure.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(
    kind: Kind,
    key: &str,
    record: Value,
) -> Result<T, RepositoryError> {
    serde_json::from_value(record)
        .map_err(|e| RepositoryError::DataCorruption(format!("{kind} {key:?}: {e}")))
}

/// Encode a record for storage.
pub(crate) fn encode<T: serde::Serialize>(
    kind: Kind,
    key: &str,
    record: &T,
) -> Result<Value, RepositoryError> {
    serde_json::to_value(record)
        .map_err(|e| RepositoryError::DataCorruption(format!("{kind} {key:?}: {e}")))
}
