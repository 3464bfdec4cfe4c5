//! Prometheus metrics for the document service.
//!
//! - Document outcomes (processed, failed by pipeline stage)
//! - Placeholder replacements by document surface
//! - Template download latency and size
//! - End-to-end processing latency

mod helpers;

pub use helpers::{encode_metrics, ProcessingMetrics, TemplateMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "docsvc";

lazy_static! {
    // ============================================================================
    // Document Metrics
    // ============================================================================

    /// Documents successfully filled and returned
    pub static ref DOCUMENTS_PROCESSED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_documents_processed_total", METRIC_PREFIX),
        "Total documents successfully processed"
    ).unwrap();

    /// Failed requests by the pipeline stage that failed
    pub static ref DOCUMENTS_FAILED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_documents_failed_total", METRIC_PREFIX),
        "Total failed document requests",
        &["stage"]
    ).unwrap();

    /// Placeholder occurrences replaced, by surface
    pub static ref REPLACEMENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_replacements_total", METRIC_PREFIX),
        "Total placeholder occurrences replaced",
        &["surface"]
    ).unwrap();

    /// End-to-end request processing time
    pub static ref PROCESSING_SECONDS: Histogram = register_histogram!(
        format!("{}_processing_seconds", METRIC_PREFIX),
        "Document processing latency in seconds",
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    ).unwrap();

    // ============================================================================
    // Template Metrics
    // ============================================================================

    /// Template download time
    pub static ref TEMPLATE_DOWNLOAD_SECONDS: Histogram = register_histogram!(
        format!("{}_template_download_seconds", METRIC_PREFIX),
        "Template download latency in seconds",
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    ).unwrap();

    /// Template size
    pub static ref TEMPLATE_BYTES: Histogram = register_histogram!(
        format!("{}_template_bytes", METRIC_PREFIX),
        "Downloaded template size in bytes",
        vec![16_384.0, 65_536.0, 262_144.0, 1_048_576.0, 4_194_304.0, 16_777_216.0]
    ).unwrap();
}
