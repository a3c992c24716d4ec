//! Product service: in-memory product catalogue behind a small REST API

use mesh_gateway::{
    api,
    config::StoreSettings,
    logging,
    store::{routes::product_router, Product, ResourceStore},
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = StoreSettings::load("product-service", 5001)?;
    logging::init(&settings.logging);

    let store = Arc::new(ResourceStore::new(Product::seed()));
    info!(records = store.len(), "Starting product service");

    api::serve(product_router(store), &settings.server).await?;
    Ok(())
}
