//! Service descriptor and health check endpoints.

use axum::{extract::State, Json};
use chrono::Local;
use serde::Serialize;

use crate::server::AppState;

/// What the processor leaves untouched, advertised by `/health`
pub const PRESERVED_CONTENT: [&str; 4] = ["signature images", "all formatting", "logos", "layout"];

#[derive(Debug, Serialize)]
pub struct ServiceDescriptor {
    pub message: String,
    pub status: String,
    pub version: String,
    pub endpoints: EndpointList,
}

#[derive(Debug, Serialize)]
pub struct EndpointList {
    pub health: String,
    pub process: String,
    pub metrics: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
    pub preserves: Vec<String>,
    pub template_id: String,
    pub uptime_seconds: u64,
}

/// GET / - Service identity and endpoints
pub async fn root() -> Json<ServiceDescriptor> {
    Json(ServiceDescriptor {
        message: "Document Processing Service".to_string(),
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: EndpointList {
            health: "/health".to_string(),
            process: super::PROCESS_PATH.to_string(),
            metrics: "/metrics".to_string(),
        },
    })
}

/// GET /health - Liveness and template information
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "Word document processor with signature image preservation".to_string(),
        timestamp: Local::now().to_rfc3339(),
        preserves: PRESERVED_CONTENT.iter().map(|s| s.to_string()).collect(),
        template_id: state.processor.template_id().to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}
