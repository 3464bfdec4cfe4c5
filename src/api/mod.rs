//! API layer - HTTP endpoint handlers.

mod health;
mod metrics;
mod process;
mod routes;

// Re-export all handlers for use in server/app.rs
pub use health::{health, root, EndpointList, HealthResponse, ServiceDescriptor, PRESERVED_CONTENT};
pub use metrics::prometheus_metrics;
pub use process::{process_word_document, PROCESS_PATH};
pub use routes::api_routes;
