//! Gateway router assembly

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::handlers;
use crate::AppState;

/// Build the gateway's axum router.
///
/// `/health` and `/status` are answered locally; every other request goes
/// through the route table in the fallback.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/health",
            get(handlers::health).fallback(handlers::method_not_allowed),
        )
        .route(
            "/status",
            get(handlers::status).fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::forward)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
