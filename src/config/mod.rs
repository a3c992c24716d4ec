//! Configuration module

pub mod settings;

pub use settings::{
    BackendConfig, GatewayConfig, LoggingConfig, ServerConfig, Settings, StoreSettings,
};
