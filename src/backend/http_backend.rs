//! HTTP backend client implementation

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use serde::de::IgnoredAny;
use std::time::Duration;
use tracing::debug;

use crate::backend::traits::{BackendResponse, ForwardError, ForwardRequest, ServiceBackend};
use crate::config::{BackendConfig, GatewayConfig};
use crate::error::Result;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Resource service reached over plain HTTP
pub struct HttpBackend {
    name: String,
    display_name: String,
    service_id: String,
    base_url: String,
    health_check_path: String,
    client: Client,
}

impl HttpBackend {
    /// Create a new HTTP backend from configuration
    pub fn new(name: &str, config: &BackendConfig, gateway: &GatewayConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if gateway.forward_timeout_ms > 0 {
            builder = builder.timeout(Duration::from_millis(gateway.forward_timeout_ms));
        }
        let client = builder.build()?;

        Ok(Self {
            name: name.to_string(),
            display_name: config.display_name_for(name),
            service_id: config.service_id_for(name),
            base_url: config.url.trim_end_matches('/').to_string(),
            health_check_path: config.health_check_path.clone(),
            client,
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ServiceBackend for HttpBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn service_id(&self) -> &str {
        &self.service_id
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn forward(&self, request: ForwardRequest) -> std::result::Result<BackendResponse, ForwardError> {
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|_| ForwardError::UnsupportedMethod(request.method.to_string()))?;
        let url = self.url_for(&request.path);

        debug!(backend = %self.name, method = %method, url = %url, "Forwarding request");

        let mut builder = self.client.request(method, &url);
        if let Some(body) = request.body {
            let content_type = request
                .content_type
                .unwrap_or_else(|| JSON_CONTENT_TYPE.to_string());
            builder = builder.header(CONTENT_TYPE, content_type).body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        // Anything that is not a JSON document counts as an incomplete call
        serde_json::from_slice::<IgnoredAny>(&body)?;

        Ok(BackendResponse { status, body })
    }

    async fn probe_health(&self) -> std::result::Result<u16, ForwardError> {
        let url = self.url_for(&self.health_check_path);
        let response = self.client.get(&url).send().await?;
        Ok(response.status().as_u16())
    }
}
