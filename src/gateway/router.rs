//! Static routing table mapping gateway endpoints to backend calls

use axum::http::Method;
use tracing::debug;

use crate::backend::registry::BackendRegistry;
use crate::error::{AppError, Result};

/// One forwarding rule: `method pattern` → `service target`.
///
/// Patterns and targets are `/`-separated; a segment written `{name}` matches
/// exactly one non-empty path segment and is substituted verbatim into the
/// target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: Method,
    pub pattern: String,
    pub service: String,
    pub target: String,
}

impl Route {
    pub fn new(
        method: Method,
        pattern: impl Into<String>,
        service: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            method,
            pattern: pattern.into(),
            service: service.into(),
            target: target.into(),
        }
    }

    /// Match `path` against the pattern, returning captured parameters
    fn captures<'p>(&self, path: &'p str) -> Option<Vec<(&str, &'p str)>> {
        let mut pattern_segments = segments(&self.pattern);
        let mut path_segments = segments(path);
        let mut params = Vec::new();

        loop {
            match (pattern_segments.next(), path_segments.next()) {
                (None, None) => return Some(params),
                (Some(expected), Some(actual)) => {
                    if let Some(name) = param_name(expected) {
                        if actual.is_empty() {
                            return None;
                        }
                        params.push((name, actual));
                    } else if expected != actual {
                        return None;
                    }
                }
                _ => return None,
            }
        }
    }

    fn render_target(&self, params: &[(&str, &str)]) -> String {
        let rendered: Vec<&str> = segments(&self.target)
            .map(|segment| match param_name(segment) {
                Some(name) => params
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| *value)
                    .unwrap_or(segment),
                None => segment,
            })
            .collect();
        format!("/{}", rendered.join("/"))
    }
}

fn segments(path: &str) -> std::str::Split<'_, char> {
    path.strip_prefix('/').unwrap_or(path).split('/')
}

fn param_name(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

/// A resolved forwarding target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub service: String,
    /// Backend-relative path with parameters substituted
    pub path: String,
}

/// Outcome of looking up a request in the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatch {
    Forward(ResolvedRoute),
    /// The path is known but not for this method
    MethodNotAllowed,
    NotFound,
}

/// Explicit dispatch table, built once at start-up
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The gateway's public surface for the user and product services
    pub fn standard() -> Self {
        Self::new(vec![
            Route::new(Method::GET, "/api/users", "user", "/users"),
            Route::new(Method::GET, "/api/users/{id}", "user", "/users/{id}"),
            Route::new(Method::POST, "/api/users", "user", "/users"),
            Route::new(Method::GET, "/api/products", "product", "/products"),
            Route::new(Method::GET, "/api/products/{id}", "product", "/products/{id}"),
            Route::new(Method::POST, "/api/products", "product", "/products"),
        ])
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Resolve an inbound request to its single backend call
    pub fn resolve(&self, method: &Method, path: &str) -> RouteMatch {
        let mut path_known = false;

        for route in &self.routes {
            let Some(params) = route.captures(path) else {
                continue;
            };
            if route.method != *method {
                path_known = true;
                continue;
            }

            let resolved = ResolvedRoute {
                service: route.service.clone(),
                path: route.render_target(&params),
            };
            debug!(
                method = %method,
                path = %path,
                service = %resolved.service,
                target = %resolved.path,
                "Resolved route"
            );
            return RouteMatch::Forward(resolved);
        }

        if path_known {
            RouteMatch::MethodNotAllowed
        } else {
            RouteMatch::NotFound
        }
    }

    /// Every route must point at a registered backend
    pub fn validate(&self, registry: &BackendRegistry) -> Result<()> {
        for route in &self.routes {
            if !registry.contains(&route.service) {
                return Err(AppError::Config(config::ConfigError::Message(format!(
                    "Route {} {} targets unknown service '{}'",
                    route.method, route.pattern, route.service
                ))));
            }
        }
        Ok(())
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}
