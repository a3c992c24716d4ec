//! HTTP handlers for the gateway

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::backend::traits::ForwardRequest;
use crate::error::{AppError, Result};
use crate::gateway::{HealthReport, RouteMatch};
use crate::AppState;

/// Gateway liveness payload
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "api-gateway",
    })
}

/// `GET /status`: gateway liveness plus a fresh probe of every backend
pub async fn status(State(state): State<Arc<AppState>>) -> Json<HealthReport> {
    Json(state.health_aggregator.check_all().await)
}

/// Method fallback for locally served paths
pub async fn method_not_allowed(uri: Uri) -> AppError {
    AppError::MethodNotAllowed(uri.path().to_string())
}

/// Fallback handler dispatching through the route table
pub async fn forward(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let path = uri.path();

    let route = match state.route_table.resolve(&method, path) {
        RouteMatch::Forward(route) => route,
        RouteMatch::MethodNotAllowed => return Err(AppError::MethodNotAllowed(path.to_string())),
        RouteMatch::NotFound => return Err(AppError::RouteNotFound(path.to_string())),
    };

    let backend = state.backend_registry.get(&route.service).ok_or_else(|| {
        AppError::Internal(format!("No backend registered for '{}'", route.service))
    })?;

    let mut request = ForwardRequest::new(method, route.path);
    if !body.is_empty() {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        request = request.with_body(body, content_type);
    }

    match backend.forward(request).await {
        Ok(response) => {
            let status =
                StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);
            Ok((status, [(CONTENT_TYPE, "application/json")], response.body).into_response())
        }
        Err(e) => {
            warn!(
                backend = %backend.name(),
                url = %backend.base_url(),
                cause = e.cause(),
                error = %e,
                "Backend call failed"
            );
            Err(AppError::ServiceUnavailable(backend.display_name().to_string()))
        }
    }
}
