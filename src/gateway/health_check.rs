//! Health aggregation across registered backends

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::backend::registry::BackendRegistry;
use crate::backend::traits::{ForwardError, ServiceBackend};

/// Health classification of one component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceHealth {
    /// Health endpoint answered with a success status
    Healthy,
    /// Health endpoint answered with any other status
    Unhealthy,
    /// Health endpoint could not be reached in time
    Offline,
}

impl ServiceHealth {
    /// Classify the outcome of a single probe
    pub fn classify(outcome: &Result<u16, ForwardError>) -> Self {
        match outcome {
            Ok(status) if (200..300).contains(status) => Self::Healthy,
            Ok(_) => Self::Unhealthy,
            Err(_) => Self::Offline,
        }
    }
}

/// Body of the gateway's `/status` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub gateway: ServiceHealth,
    pub services: BTreeMap<String, ServiceHealth>,
}

/// Probes every backend on demand. Nothing is cached between calls.
pub struct HealthAggregator {
    registry: Arc<BackendRegistry>,
    timeout: Duration,
}

impl HealthAggregator {
    pub fn new(registry: Arc<BackendRegistry>, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probe all backends concurrently. Never fails.
    pub async fn check_all(&self) -> HealthReport {
        let probes = self
            .registry
            .get_all()
            .into_iter()
            .map(|backend| async move {
                let health = self.check_one(backend.as_ref()).await;
                (backend.service_id().to_string(), health)
            });

        let services = join_all(probes).await.into_iter().collect();

        HealthReport {
            gateway: ServiceHealth::Healthy,
            services,
        }
    }

    /// Probe a single backend within the configured timeout
    pub async fn check_one(&self, backend: &dyn ServiceBackend) -> ServiceHealth {
        let outcome = match tokio::time::timeout(self.timeout, backend.probe_health()).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ForwardError::Timeout),
        };
        let health = ServiceHealth::classify(&outcome);

        match &outcome {
            Ok(status) => debug!(
                backend = %backend.name(),
                status = status,
                health = ?health,
                "Health check completed"
            ),
            Err(e) => debug!(
                backend = %backend.name(),
                cause = e.cause(),
                error = %e,
                "Health check failed"
            ),
        }

        health
    }
}
