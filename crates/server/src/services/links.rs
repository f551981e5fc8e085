//! Link service.
//!
//! Resolves slugs to destinations and registers new links.

use thiserror::Error;

use golinks_core::{Destination, DestinationError, Link, Slug, SlugError};

use crate::db::{Datastore, LinkRepository, RepositoryError};

/// Errors that can occur during link operations.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The slug cannot be registered.
    #[error("invalid slug: {0}")]
    InvalidSlug(#[from] SlugError),

    /// The destination is not an absolute http(s) URL.
    #[error("invalid destination: {0}")]
    InvalidDestination(#[from] DestinationError),

    /// No link is registered under the slug.
    #[error("no link named '{0}'")]
    NotFound(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Link service.
pub struct LinkService<'a> {
    links: LinkRepository<'a>,
    default_redirect: &'a Destination,
}

impl<'a> LinkService<'a> {
    /// Create a new link service.
    ///
    /// `default_redirect` is where the empty slug (`GET /`) goes.
    #[must_use]
    pub const fn new(store: &'a dyn Datastore, default_redirect: &'a Destination) -> Self {
        Self {
            links: LinkRepository::new(store),
            default_redirect,
        }
    }

    /// Resolve a slug to the destination it redirects to.
    ///
    /// The empty slug always resolves to the default destination without
    /// touching the store. Other slugs are matched exactly.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::NotFound` if no link is registered under `slug`.
    /// Returns `LinkError::Repository` if the store fails.
    pub async fn resolve(&self, slug: &Slug) -> Result<Destination, LinkError> {
        if slug.is_empty() {
            return Ok(self.default_redirect.clone());
        }

        self.links
            .get(slug)
            .await?
            .map(|link| link.destination)
            .ok_or_else(|| LinkError::NotFound(slug.to_string()))
    }

    /// Validate registration input. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::InvalidSlug` or `LinkError::InvalidDestination`.
    pub fn parse_link(id: &str, location: &str) -> Result<Link, LinkError> {
        Ok(Link {
            slug: Slug::parse(id.trim())?,
            destination: Destination::parse(location.trim())?,
        })
    }

    /// Register a link, overwriting any existing one with the same slug.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::InvalidSlug` or `LinkError::InvalidDestination` if
    /// validation fails, before anything is written.
    /// Returns `LinkError::Repository` if the store fails.
    pub async fn register(&self, id: &str, location: &str) -> Result<Link, LinkError> {
        let link = Self::parse_link(id, location)?;

        self.links.put(&link).await?;
        tracing::info!(slug = %link.slug, destination = %link.destination, "Link registered");

        Ok(link)
    }

    /// All links, ordered by slug.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::Repository` if the store fails.
    pub async fn list(&self) -> Result<Vec<Link>, LinkError> {
        Ok(self.links.list().await?)
    }
}
