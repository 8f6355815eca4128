//! Gamepass aggregation gateway library.
//!
//! Resolves a platform user, lists their newest experiences, walks each
//! experience's paginated gamepass listing and joins per-item pricing into
//! one JSON response.

pub mod aggregation;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use aggregation::{AggregateResult, Aggregator};
pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
