//! Functional tests for the `/status` health aggregation endpoint

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use mesh_gateway::{
    api::routes::create_router,
    backend::{BackendRegistry, BackendResponse, ForwardError, ForwardRequest, ServiceBackend},
    config::{BackendConfig, Settings},
    gateway::RouteTable,
    AppState,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const UNREACHABLE: &str = "http://127.0.0.1:1";

fn create_test_app(user_url: &str, product_url: &str) -> Router {
    let mut settings = Settings::default();
    settings.backends.insert("user".to_string(), BackendConfig::new(user_url));
    settings.backends.insert("product".to_string(), BackendConfig::new(product_url));
    settings.gateway.health_check_timeout_ms = 300;

    create_router(Arc::new(AppState::new(settings).unwrap()))
}

async fn get_status(app: Router) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn healthy_server(service: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "healthy", "service": service})),
        )
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_status_all_healthy() {
    let users = healthy_server("user-service").await;
    let products = healthy_server("product-service").await;

    let (status, body) = get_status(create_test_app(&users.uri(), &products.uri())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "gateway": "healthy",
            "services": {"user-service": "healthy", "product-service": "healthy"}
        })
    );
}

#[tokio::test]
async fn test_status_isolates_offline_backend() {
    let users = healthy_server("user-service").await;

    let (status, body) = get_status(create_test_app(&users.uri(), UNREACHABLE)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gateway"], "healthy");
    assert_eq!(body["services"]["user-service"], "healthy");
    assert_eq!(body["services"]["product-service"], "offline");
}

#[tokio::test]
async fn test_status_all_offline_still_answers() {
    let (status, body) = get_status(create_test_app(UNREACHABLE, UNREACHABLE)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["services"]["user-service"], "offline");
    assert_eq!(body["services"]["product-service"], "offline");
}

#[tokio::test]
async fn test_status_error_code_is_unhealthy() {
    let users = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&users)
        .await;
    let products = healthy_server("product-service").await;

    let (_, body) = get_status(create_test_app(&users.uri(), &products.uri())).await;

    assert_eq!(body["services"]["user-service"], "unhealthy");
    assert_eq!(body["services"]["product-service"], "healthy");
}

#[tokio::test]
async fn test_status_slow_backend_is_offline() {
    let users = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&users)
        .await;
    let products = healthy_server("product-service").await;

    let (status, body) = get_status(create_test_app(&users.uri(), &products.uri())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["services"]["user-service"], "offline");
    assert_eq!(body["services"]["product-service"], "healthy");
}

/// Backend whose health endpoint never answers
struct HangingBackend {
    name: &'static str,
    service_id: &'static str,
}

#[async_trait]
impl ServiceBackend for HangingBackend {
    fn name(&self) -> &str {
        self.name
    }

    fn display_name(&self) -> &str {
        self.name
    }

    fn service_id(&self) -> &str {
        self.service_id
    }

    fn base_url(&self) -> &str {
        "http://hanging.invalid"
    }

    async fn forward(&self, _request: ForwardRequest) -> Result<BackendResponse, ForwardError> {
        Err(ForwardError::Timeout)
    }

    async fn probe_health(&self) -> Result<u16, ForwardError> {
        futures::future::pending().await
    }
}

#[tokio::test]
async fn test_aggregator_bounds_probes_that_never_finish() {
    let mut settings = Settings::default();
    settings.gateway.health_check_timeout_ms = 100;

    let registry = BackendRegistry::from_backends([
        Arc::new(HangingBackend {
            name: "user",
            service_id: "user-service",
        }) as Arc<dyn ServiceBackend>,
        Arc::new(HangingBackend {
            name: "product",
            service_id: "product-service",
        }) as Arc<dyn ServiceBackend>,
    ]);
    let state = AppState::with_registry(settings, registry, RouteTable::standard()).unwrap();

    let report = state.health_aggregator.check_all().await;

    assert_eq!(report.services.len(), 2);
    assert!(report
        .services
        .values()
        .all(|health| *health == mesh_gateway::gateway::ServiceHealth::Offline));
}
