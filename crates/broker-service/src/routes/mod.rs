//! HTTP routes for the broker.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::handlers;
use crate::sources::CredentialResolver;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
pub struct AppState {
    /// Service configuration.
    pub config: Config,

    /// The credential-resolution chain.
    pub resolver: CredentialResolver,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `POST /token` - credential resolution
/// - `GET /health` - health check (no resolver involvement)
/// - `GET /getToken` - legacy token endpoint
/// - permissive CORS (web clients call the broker cross-origin)
/// - TraceLayer for request logging
/// - 30 second request timeout
pub fn build_routes(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        .route("/token", post(handlers::issue_token))
        .route("/health", get(handlers::health_check))
        .route("/getToken", get(handlers::legacy_token))
        .with_state(state);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    // 3. CorsLayer - CORS headers on every response
    routes
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
}
