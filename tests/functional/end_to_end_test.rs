//! Gateway in front of real user and product services on ephemeral ports

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use mesh_gateway::{
    api::routes::create_router,
    config::{BackendConfig, Settings},
    store::{
        routes::{product_router, user_router},
        Product, ResourceStore, User,
    },
    AppState,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceExt;

async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn mesh() -> Router {
    let user_url = spawn(user_router(Arc::new(ResourceStore::new(User::seed())))).await;
    let product_url = spawn(product_router(Arc::new(ResourceStore::new(Product::seed())))).await;

    let mut settings = Settings::default();
    settings.backends.insert("user".to_string(), BackendConfig::new(user_url));
    settings.backends.insert("product".to_string(), BackendConfig::new(product_url));

    create_router(Arc::new(AppState::new(settings).unwrap()))
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_create_product_through_gateway() {
    let app = mesh().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/products")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"name": "Monitor", "price": 199.99}).to_string()))
        .unwrap();
    let (status, created) = call(&app, request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Monitor");
    assert_eq!(created["price"], 199.99);
    assert_eq!(created["stock"], 0);
    assert!(created["created_at"].is_string());
    let id = created["id"].as_str().unwrap();

    let (status, fetched) = call(&app, get(&format!("/api/products/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (_, listing) = call(&app, get("/api/products")).await;
    assert_eq!(listing["count"], 4);
}

#[tokio::test]
async fn test_store_errors_pass_through_gateway() {
    let app = mesh().await;

    let (status, body) = call(&app, get("/api/users/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "User not found"}));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"email": "x@example.com"}"#))
        .unwrap();
    let (status, body) = call(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Name and email are required"}));
}

#[tokio::test]
async fn test_status_reports_running_services() {
    let app = mesh().await;
    let (status, body) = call(&app, get("/status")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "gateway": "healthy",
            "services": {"user-service": "healthy", "product-service": "healthy"}
        })
    );
}
