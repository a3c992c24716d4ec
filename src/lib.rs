//! Service mesh gateway
//!
//! Fronts the user and product services behind a single REST surface,
//! relays their responses verbatim, and aggregates their health.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod store;

pub use error::{AppError, Result};

use std::sync::Arc;
use std::time::Duration;

use crate::backend::registry::BackendRegistry;
use crate::config::Settings;
use crate::gateway::{health_check::HealthAggregator, router::RouteTable};

/// Application state shared across all gateway handlers
pub struct AppState {
    pub settings: Arc<Settings>,
    pub backend_registry: Arc<BackendRegistry>,
    pub route_table: Arc<RouteTable>,
    pub health_aggregator: Arc<HealthAggregator>,
}

impl AppState {
    /// Build HTTP backends from configuration and wire up the standard routes
    pub fn new(settings: Settings) -> Result<Self> {
        let registry = BackendRegistry::from_settings(&settings)?;
        Self::with_registry(settings, registry, RouteTable::standard())
    }

    /// Assemble state around an existing registry and route table
    pub fn with_registry(
        settings: Settings,
        registry: BackendRegistry,
        route_table: RouteTable,
    ) -> Result<Self> {
        route_table.validate(&registry)?;

        let backend_registry = Arc::new(registry);
        let health_aggregator = Arc::new(HealthAggregator::new(
            backend_registry.clone(),
            Duration::from_millis(settings.gateway.health_check_timeout_ms),
        ));

        Ok(Self {
            settings: Arc::new(settings),
            backend_registry,
            route_table: Arc::new(route_table),
            health_aggregator,
        })
    }
}
