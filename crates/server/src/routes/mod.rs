//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (datastore)
//!
//! # Auth
//! GET  /login.html             - Login page
//! GET  /oauth                  - Redirect to Google OAuth
//! GET  /oauth/callback         - Handle OAuth callback
//!
//! # Links (requires auth)
//! GET  /links.html             - Link list and registration form
//! POST /links                  - Register a link
//!
//! # Redirects
//! GET  /                       - Default destination
//! GET  /{*slug}                - Registered destination
//! ```

pub mod auth;
pub mod health;
pub mod links;
pub mod redirect;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all routes.
///
/// The slug catch-all is registered last; fixed paths take precedence.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/login.html", get(auth::login_page))
        .route("/oauth", get(auth::login))
        .route("/oauth/callback", get(auth::callback))
        .route("/links.html", get(links::index))
        .route("/links", post(links::register))
        .route("/", get(redirect::root))
        .route("/{*slug}", get(redirect::follow))
}
