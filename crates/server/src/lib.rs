//! golinks server library.
//!
//! Short links behind Google sign-in: `GET /{slug}` redirects, signed-in
//! users register links. Exposed as a library so the router can be driven
//! in tests with in-memory collaborators.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod google;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, http::Request, response::Response};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::SessionStore;
use tracing::Span;

use config::ConfigError;
use state::AppState;

/// Build the application router.
///
/// Layers, innermost first: session, security headers, request ID, tracing.
/// Sentry layers and static files are added by the binary.
///
/// # Errors
///
/// Returns `ConfigError` if the session layer cannot be configured.
pub fn app<S>(state: AppState, session_store: S) -> Result<Router, ConfigError>
where
    S: SessionStore + Clone,
{
    let session_layer = middleware::create_session_layer(session_store, state.config())?;

    Ok(routes::routes()
        .layer(session_layer)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &Response<_>, latency: std::time::Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state))
}
