//! Common traits and types for downstream resource services

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::Method;
use thiserror::Error;

/// A request captured from a gateway client, re-targeted at one backend
#[derive(Debug, Clone)]
pub struct ForwardRequest {
    pub method: Method,

    /// Backend-relative path, e.g. `/users/42`
    pub path: String,

    /// Raw request body; forwarded without inspection
    pub body: Option<Bytes>,

    /// Content type of `body`, if the client sent one
    pub content_type: Option<String>,
}

impl ForwardRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            content_type: None,
        }
    }

    pub fn with_body(mut self, body: Bytes, content_type: Option<String>) -> Self {
        self.body = Some(body);
        self.content_type = content_type;
        self
    }
}

/// A completed downstream call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendResponse {
    pub status: u16,

    /// Response body, guaranteed to be a JSON document
    pub body: Bytes,
}

/// Why a downstream call could not be completed.
///
/// All variants surface to clients as the same 503; the distinction is kept
/// for logs.
#[derive(Error, Debug)]
pub enum ForwardError {
    #[error("connection failed: {0}")]
    Connect(#[source] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),
}

impl ForwardError {
    /// Short label for structured logs
    pub fn cause(&self) -> &'static str {
        match self {
            ForwardError::Connect(_) => "connect",
            ForwardError::Timeout => "timeout",
            ForwardError::MalformedBody(_) => "malformed_body",
            ForwardError::Transport(_) => "transport",
            ForwardError::UnsupportedMethod(_) => "unsupported_method",
        }
    }
}

impl From<reqwest::Error> for ForwardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ForwardError::Timeout
        } else if err.is_connect() {
            ForwardError::Connect(err)
        } else {
            ForwardError::Transport(err)
        }
    }
}

/// Trait for resource services reachable through the gateway
#[async_trait]
pub trait ServiceBackend: Send + Sync {
    /// Logical service name used by the route table, e.g. "user"
    fn name(&self) -> &str;

    /// Name shown in client-facing errors, e.g. "User"
    fn display_name(&self) -> &str;

    /// Key in the `/status` report, e.g. "user-service"
    fn service_id(&self) -> &str;

    fn base_url(&self) -> &str;

    /// Issue exactly one call; no retries
    async fn forward(&self, request: ForwardRequest) -> Result<BackendResponse, ForwardError>;

    /// Call the health endpoint and return the status code it answered with
    async fn probe_health(&self) -> Result<u16, ForwardError>;
}
