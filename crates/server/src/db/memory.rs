//! In-memory datastore backend.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{Datastore, Kind, RepositoryError};

/// Datastore held in a process-local ordered map.
///
/// Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryDatastore {
    records: RwLock<BTreeMap<(Kind, String), Value>>,
}

impl MemoryDatastore {
    /// Create an empty datastore.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Datastore for MemoryDatastore {
    async fn get(&self, kind: Kind, key: &str) -> Result<Option<Value>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records.get(&(kind, key.to_owned())).cloned())
    }

    async fn put(&self, kind: Kind, key: &str, record: Value) -> Result<(), RepositoryError> {
        self.records
            .write()
            .await
            .insert((kind, key.to_owned()), record);
        Ok(())
    }

    async fn all(&self, kind: Kind) -> Result<Vec<(String, Value)>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .map(|((_, key), record)| (key.clone(), record.clone()))
            .collect())
    }

    async fn count(&self, kind: Kind) -> Result<u64, RepositoryError> {
        let records = self.records.read().await;
        let count = records.keys().filter(|(k, _)| *k == kind).count();
        u64::try_from(count).map_err(|e| RepositoryError::DataCorruption(e.to_string()))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
