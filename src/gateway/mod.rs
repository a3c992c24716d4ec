//! Gateway module - Routing table and health aggregation

pub mod health_check;
pub mod router;

pub use health_check::{HealthAggregator, HealthReport, ServiceHealth};
pub use router::{ResolvedRoute, Route, RouteMatch, RouteTable};
