// Supporting modules
pub mod config;
pub mod error;
pub mod metrics;
pub mod telemetry;

// Document model and substitution
pub mod document;
pub mod substitution;
pub mod template_source;

// Application layer
pub mod api;
pub mod processing;
pub mod server;
