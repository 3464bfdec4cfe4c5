use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;

use super::health::{health, root};
use super::metrics::prometheus_metrics;
use super::process::{process_word_document, PROCESS_PATH};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Service descriptor & health
        .route("/", get(root))
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        // Document processing
        .route(PROCESS_PATH, post(process_word_document))
}
