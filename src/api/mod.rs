//! HTTP surface of the gateway, plus the server loop shared by all binaries

pub mod handlers;
pub mod routes;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::Result;

/// Bind `server` and serve `app` until Ctrl-C
pub async fn serve(app: Router, server: &ServerConfig) -> Result<()> {
    let addr = format!("{}:{}", server.host, server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
