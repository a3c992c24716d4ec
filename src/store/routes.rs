//! HTTP surface of the resource services

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, MethodRouter},
    Json, Router,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::api::handlers::method_not_allowed;
use crate::error::{AppError, Result};
use crate::store::payload::parse_body;
use crate::store::{Product, ProductPatch, Resource, ResourceStore, User};

type StoreState<R> = Arc<ResourceStore<R>>;

/// Router for the user service
pub fn user_router(store: Arc<ResourceStore<User>>) -> Router {
    resource_routes::<User>(item_routes::<User>()).with_state(store)
}

/// Router for the product service; products additionally support `PUT`
pub fn product_router(store: Arc<ResourceStore<Product>>) -> Router {
    resource_routes::<Product>(item_routes::<Product>().put(update_product)).with_state(store)
}

fn item_routes<R: Resource>() -> MethodRouter<StoreState<R>> {
    get(get_record::<R>).delete(delete_record::<R>)
}

fn resource_routes<R: Resource>(item: MethodRouter<StoreState<R>>) -> Router<StoreState<R>> {
    let collection = format!("/{}", R::COLLECTION);
    let member = format!("/{}/:id", R::COLLECTION);

    Router::new()
        .route("/health", get(health::<R>).fallback(method_not_allowed))
        .route(
            &collection,
            get(list_records::<R>)
                .post(create_record::<R>)
                .fallback(method_not_allowed),
        )
        .route(&member, item.fallback(method_not_allowed))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health<R: Resource>() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": R::SERVICE_NAME }))
}

async fn list_records<R: Resource>(State(store): State<StoreState<R>>) -> Result<Json<Value>> {
    let records = store.list();
    let count = records.len();

    let mut body = Map::new();
    body.insert(R::COLLECTION.to_string(), serde_json::to_value(records)?);
    body.insert("count".to_string(), Value::from(count));
    Ok(Json(Value::Object(body)))
}

async fn get_record<R: Resource>(
    State(store): State<StoreState<R>>,
    Path(id): Path<String>,
) -> Result<Json<R>> {
    store
        .get(&id)
        .map(Json)
        .ok_or(AppError::NotFound(R::DISPLAY_NAME))
}

async fn create_record<R: Resource>(
    State(store): State<StoreState<R>>,
    body: Bytes,
) -> Result<(StatusCode, Json<R>)> {
    let payload = parse_body(&body);
    let record = store.insert(R::from_payload(payload.as_ref())?)?;
    info!(resource = R::DISPLAY_NAME, id = %record.id(), "Created record");
    Ok((StatusCode::CREATED, Json(record)))
}

async fn delete_record<R: Resource>(
    State(store): State<StoreState<R>>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    store
        .remove(&id)
        .ok_or(AppError::NotFound(R::DISPLAY_NAME))?;
    info!(resource = R::DISPLAY_NAME, id = %id, "Deleted record");
    Ok(Json(json!({ "message": format!("{} deleted", R::DISPLAY_NAME) })))
}

async fn update_product(
    State(store): State<StoreState<Product>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Product>> {
    if store.get(&id).is_none() {
        return Err(AppError::NotFound(Product::DISPLAY_NAME));
    }

    let patch = ProductPatch::from_payload(parse_body(&body).as_ref())?;
    store
        .update(&id, |product| product.apply(patch))
        .map(Json)
        .ok_or(AppError::NotFound(Product::DISPLAY_NAME))
}
