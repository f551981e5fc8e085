//! `PostgreSQL` datastore backend.
//!
//! All kinds share one table:
//!
//! ```sql
//! golinks.entity (kind TEXT, key TEXT, record JSONB, updated_at TIMESTAMPTZ,
//!                 PRIMARY KEY (kind, key))
//! ```
//!
//! Queries use the runtime `sqlx::query` API so the crate builds without a
//! live database.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use super::{Datastore, Kind, RepositoryError};

/// Datastore backed by the `golinks.entity` table.
#[derive(Clone)]
pub struct PgDatastore {
    pool: PgPool,
}

impl PgDatastore {
    /// Create a datastore over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Datastore for PgDatastore {
    async fn get(&self, kind: Kind, key: &str) -> Result<Option<Value>, RepositoryError> {
        let row: Option<(Value,)> = sqlx::query_as(
            r"
            SELECT record
            FROM golinks.entity
            WHERE kind = $1 AND key = $2
            ",
        )
        .bind(kind.as_str())
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(record,)| record))
    }

    async fn put(&self, kind: Kind, key: &str, record: Value) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO golinks.entity (kind, key, record)
            VALUES ($1, $2, $3)
            ON CONFLICT (kind, key)
            DO UPDATE SET record = EXCLUDED.record, updated_at = now()
            ",
        )
        .bind(kind.as_str())
        .bind(key)
        .bind(record)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn all(&self, kind: Kind) -> Result<Vec<(String, Value)>, RepositoryError> {
        let rows: Vec<(String, Value)> = sqlx::query_as(
            r#"
            SELECT key, record
            FROM golinks.entity
            WHERE kind = $1
            ORDER BY key COLLATE "C" ASC
            "#,
        )
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn count(&self, kind: Kind) -> Result<u64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as(
            r"
            SELECT COUNT(*)
            FROM golinks.entity
            WHERE kind = $1
            ",
        )
        .bind(kind.as_str())
        .fetch_one(&self.pool)
        .await?;

        u64::try_from(count)
            .map_err(|_| RepositoryError::DataCorruption(format!("negative count for {kind}")))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
