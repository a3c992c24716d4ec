//! Backend module - Service trait, HTTP client, and registry

pub mod http_backend;
pub mod registry;
pub mod traits;

pub use registry::BackendRegistry;
pub use traits::{BackendResponse, ForwardError, ForwardRequest, ServiceBackend};
