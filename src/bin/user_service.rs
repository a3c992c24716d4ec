//! User service: in-memory user store behind a small REST API

use mesh_gateway::{
    api,
    config::StoreSettings,
    logging,
    store::{routes::user_router, ResourceStore, User},
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = StoreSettings::load("user-service", 5000)?;
    logging::init(&settings.logging);

    let store = Arc::new(ResourceStore::new(User::seed()));
    info!(records = store.len(), "Starting user service");

    api::serve(user_router(store), &settings.server).await?;
    Ok(())
}
