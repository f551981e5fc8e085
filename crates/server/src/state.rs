//! Application state shared across handlers.

use std::sync::Arc;

use golinks_core::Clock;

use crate::config::GolinksConfig;
use crate::db::Datastore;
use crate::google::IdentityProvider;
use crate::services::{AuthService, LinkService};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Every collaborator is a trait object so tests
/// can swap in in-memory and fixed implementations.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: GolinksConfig,
    datastore: Arc<dyn Datastore>,
    provider: Arc<dyn IdentityProvider>,
    clock: Arc<dyn Clock>,
    redirect_uri: String,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        config: GolinksConfig,
        datastore: Arc<dyn Datastore>,
        provider: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let redirect_uri = config.oauth_redirect_uri();
        Self {
            inner: Arc::new(AppStateInner {
                config,
                datastore,
                provider,
                clock,
                redirect_uri,
            }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &GolinksConfig {
        &self.inner.config
    }

    /// Get a reference to the datastore.
    #[must_use]
    pub fn datastore(&self) -> &dyn Datastore {
        self.inner.datastore.as_ref()
    }

    /// Get a reference to the identity provider.
    #[must_use]
    pub fn provider(&self) -> &dyn IdentityProvider {
        self.inner.provider.as_ref()
    }

    /// Get a reference to the clock.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.inner.clock.as_ref()
    }

    /// Sign-in service bound to this state.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(
            self.datastore(),
            self.provider(),
            self.clock(),
            &self.inner.redirect_uri,
        )
    }

    /// Link service bound to this state.
    #[must_use]
    pub fn links(&self) -> LinkService<'_> {
        LinkService::new(self.datastore(), &self.inner.config.default_redirect)
    }
}
