//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use admission::CancellationToken;

use crate::kernel::ServerDeps;
use crate::server::routes::{health_handler, scrape_callback_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub deps: Arc<ServerDeps>,
    /// Cancelled on shutdown; in-flight callbacks get child tokens
    pub shutdown: CancellationToken,
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps, shutdown: CancellationToken) -> Router {
    let state = AppState {
        db_pool: deps.db_pool.clone(),
        deps: Arc::new(deps),
        shutdown,
    };

    Router::new()
        .route("/api/scrape/callback", post(scrape_callback_handler))
        .route("/health", get(health_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}
