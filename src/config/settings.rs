//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Root configuration of the gateway
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Backend registry, keyed by logical service name
    #[serde(default = "default_backends")]
    pub backends: BTreeMap<String, BackendConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Downstream call discipline
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    /// Timeout for forwarded CRUD calls; 0 means no timeout
    #[serde(default = "default_forward_timeout")]
    pub forward_timeout_ms: u64,
    /// Timeout for each `/health` probe issued by `/status`
    #[serde(default = "default_health_check_timeout")]
    pub health_check_timeout_ms: u64,
}

fn default_forward_timeout() -> u64 {
    30000
}

fn default_health_check_timeout() -> u64 {
    5000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            forward_timeout_ms: default_forward_timeout(),
            health_check_timeout_ms: default_health_check_timeout(),
        }
    }
}

/// Backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    pub url: String,
    #[serde(default = "default_health_check_path")]
    pub health_check_path: String,
    /// Name used in client-facing errors, e.g. "User"
    #[serde(default)]
    pub display_name: Option<String>,
    /// Key under which the backend appears in the `/status` report
    #[serde(default)]
    pub service_id: Option<String>,
}

fn default_health_check_path() -> String {
    "/health".to_string()
}

impl BackendConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            health_check_path: default_health_check_path(),
            display_name: None,
            service_id: None,
        }
    }

    /// Display name for the backend registered under `name`
    pub fn display_name_for(&self, name: &str) -> String {
        if let Some(display) = &self.display_name {
            return display.clone();
        }
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Status report key for the backend registered under `name`
    pub fn service_id_for(&self, name: &str) -> String {
        self.service_id
            .clone()
            .unwrap_or_else(|| format!("{}-service", name))
    }
}

const DEFAULT_USER_URL: &str = "http://user-service:5000";
const DEFAULT_PRODUCT_URL: &str = "http://product-service:5001";

fn default_backends() -> BTreeMap<String, BackendConfig> {
    BTreeMap::from([
        ("user".to_string(), BackendConfig::new(DEFAULT_USER_URL)),
        ("product".to_string(), BackendConfig::new(DEFAULT_PRODUCT_URL)),
    ])
}

impl Settings {
    /// Load settings from configuration files and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/gateway.toml")
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("backends.user.url", DEFAULT_USER_URL)?
            .set_default("backends.product.url", DEFAULT_PRODUCT_URL)?
            .add_source(File::from(path.as_ref()).required(false))
            // Override with environment variables (prefixed with MESH_GATEWAY__)
            .add_source(
                Environment::with_prefix("MESH_GATEWAY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(invalid("Server port cannot be 0".to_string()));
        }

        if self.gateway.health_check_timeout_ms == 0 {
            return Err(invalid(
                "Health check timeout must be greater than 0".to_string(),
            ));
        }

        if self.backends.is_empty() {
            return Err(invalid("At least one backend must be configured".to_string()));
        }

        for (name, backend) in &self.backends {
            if name.is_empty() {
                return Err(invalid("Backend name cannot be empty".to_string()));
            }
            if !(backend.url.starts_with("http://") || backend.url.starts_with("https://")) {
                return Err(invalid(format!(
                    "Backend '{}' has invalid url '{}'. Must start with http:// or https://",
                    name, backend.url
                )));
            }
            if !backend.health_check_path.starts_with('/') {
                return Err(invalid(format!(
                    "Backend '{}' health check path must start with '/'",
                    name
                )));
            }
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
            },
            logging: LoggingConfig::default(),
            gateway: GatewayConfig::default(),
            backends: default_backends(),
        }
    }
}

/// Configuration of a single resource service process
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreSettings {
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StoreSettings {
    /// Load settings for the service `name` (e.g. "user-service").
    ///
    /// Reads `config/<name>.toml` if present, then environment variables
    /// prefixed with the upper-cased name (`USER_SERVICE__SERVER__PORT`).
    pub fn load(name: &str, default_port: u16) -> Result<Self> {
        Self::load_from_path(name, default_port, format!("config/{}.toml", name))
    }

    pub fn load_from_path<P: AsRef<Path>>(name: &str, default_port: u16, path: P) -> Result<Self> {
        let prefix = name.replace('-', "_").to_uppercase();

        let config = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port))?
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix(&prefix)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

fn invalid(message: String) -> AppError {
    AppError::Config(config::ConfigError::Message(message))
}
