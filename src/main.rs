//! Main entry point for the mesh gateway

use mesh_gateway::{api, config::Settings, logging, AppState};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::load()?;
    logging::init(&settings.logging);
    settings.validate()?;

    info!("Starting mesh gateway");
    info!(
        "Loaded configuration: server={}:{}",
        settings.server.host, settings.server.port
    );

    let server = settings.server.clone();
    let state = Arc::new(AppState::new(settings)?);
    info!(
        backends = state.backend_registry.len(),
        routes = state.route_table.routes().len(),
        "Gateway initialized"
    );

    let app = api::routes::create_router(state);
    api::serve(app, &server).await?;

    Ok(())
}
