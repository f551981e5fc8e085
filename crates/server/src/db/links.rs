//! Link repository.
//!
//! Links are stored under kind `Link` with the slug as key and the body
//! `{"location": "<destination>"}`.

use serde::{Deserialize, Serialize};

use golinks_core::{Destination, Link, Slug};

use super::{Datastore, Kind, RepositoryError, decode, encode};

#[derive(Debug, Serialize, Deserialize)]
struct LinkRecord {
    location: Destination,
}

/// Repository for short links.
pub struct LinkRepository<'a> {
    store: &'a dyn Datastore,
}

impl<'a> LinkRepository<'a> {
    /// Create a new link repository.
    #[must_use]
    pub const fn new(store: &'a dyn Datastore) -> Self {
        Self { store }
    }

    /// Get a link by its slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails or the stored record is invalid.
    pub async fn get(&self, slug: &Slug) -> Result<Option<Link>, RepositoryError> {
        let Some(record) = self.store.get(Kind::Link, slug.as_str()).await? else {
            return Ok(None);
        };

        let record: LinkRecord = decode(Kind::Link, slug.as_str(), record)?;
        Ok(Some(Link {
            slug: slug.clone(),
            destination: record.location,
        }))
    }

    /// Insert or overwrite a link.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    pub async fn put(&self, link: &Link) -> Result<(), RepositoryError> {
        let record = LinkRecord {
            location: link.destination.clone(),
        };
        let key = link.slug.as_str();
        self.store
            .put(Kind::Link, key, encode(Kind::Link, key, &record)?)
            .await
    }

    /// All links, ordered by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails or a stored record is invalid.
    pub async fn list(&self) -> Result<Vec<Link>, RepositoryError> {
        self.store
            .all(Kind::Link)
            .await?
            .into_iter()
            .map(|(key, record)| {
                let record: LinkRecord = decode(Kind::Link, &key, record)?;
                Ok(Link {
                    slug: Slug::from_path(key),
                    destination: record.location,
                })
            })
            .collect()
    }

    /// Number of stored links.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    pub async fn count(&self) -> Result<u64, RepositoryError> {
        self.store.count(Kind::Link).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::db::MemoryDatastore;

    fn link(slug: &str, destination: &str) -> Link {
        Link {
            slug: Slug::parse(slug).unwrap(),
            destination: Destination::parse(destination).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = MemoryDatastore::new();
        let links = LinkRepository::new(&store);

        links.put(&link("example", "http://www.example.com/example")).await.unwrap();

        let found = links.get(&Slug::from_path("example")).await.unwrap().unwrap();
        assert_eq!(found.destination.as_str(), "http://www.example.com/example");
        assert!(links.get(&Slug::from_path("foo")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_record_layout() {
        let store = MemoryDatastore::new();
        LinkRepository::new(&store)
            .put(&link("docs", "https://docs.example.com"))
            .await
            .unwrap();

        assert_eq!(
            store.get(Kind::Link, "docs").await.unwrap(),
            Some(json!({"location": "https://docs.example.com"}))
        );
    }

    #[tokio::test]
    async fn test_list_is_ordered() {
        let store = MemoryDatastore::new();
        let links = LinkRepository::new(&store);
        links.put(&link("zeta", "http://z.example")).await.unwrap();
        links.put(&link("alpha", "http://a.example")).await.unwrap();

        let slugs: Vec<String> = links
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.slug.to_string())
            .collect();
        assert_eq!(slugs, vec!["alpha", "zeta"]);
        assert_eq!(links.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_record() {
        let store = MemoryDatastore::new();
        store
            .put(Kind::Link, "broken", json!({"location": ""}))
            .await
            .unwrap();

        let result = LinkRepository::new(&store)
            .get(&Slug::from_path("broken"))
            .await;
        assert!(matches!(result, Err(RepositoryError::DataCorruption(_))));
    }
}
