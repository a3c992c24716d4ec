//! Immutable registry of downstream services

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::backend::http_backend::HttpBackend;
use crate::backend::traits::ServiceBackend;
use crate::config::Settings;
use crate::error::Result;

/// Maps logical service names to backends. Fixed once built.
pub struct BackendRegistry {
    backends: BTreeMap<String, Arc<dyn ServiceBackend>>,
}

impl BackendRegistry {
    /// Build HTTP backends for every configured service
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut backends: Vec<Arc<dyn ServiceBackend>> = Vec::with_capacity(settings.backends.len());

        for (name, config) in &settings.backends {
            let backend = HttpBackend::new(name, config, &settings.gateway)?;
            info!(backend = %name, url = %backend.base_url(), "Registered backend");
            backends.push(Arc::new(backend));
        }

        Ok(Self::from_backends(backends))
    }

    /// Build a registry from already constructed backends.
    /// A later backend with the same name replaces an earlier one.
    pub fn from_backends(backends: impl IntoIterator<Item = Arc<dyn ServiceBackend>>) -> Self {
        let backends = backends
            .into_iter()
            .map(|backend| (backend.name().to_string(), backend))
            .collect();
        Self { backends }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ServiceBackend>> {
        self.backends.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.backends.contains_key(name)
    }

    /// All backends, ordered by name
    pub fn get_all(&self) -> Vec<Arc<dyn ServiceBackend>> {
        self.backends.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}
