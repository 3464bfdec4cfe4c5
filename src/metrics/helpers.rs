//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use super::{
    DOCUMENTS_FAILED_TOTAL, DOCUMENTS_PROCESSED_TOTAL, PROCESSING_SECONDS, REPLACEMENTS_TOTAL,
    TEMPLATE_BYTES, TEMPLATE_DOWNLOAD_SECONDS,
};
use crate::processing::ProcessingStage;
use crate::substitution::ReplacementCount;

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording document pipeline metrics
pub struct ProcessingMetrics;

impl ProcessingMetrics {
    /// Record a document returned to the caller
    pub fn record_processed(elapsed: Duration, replacements: &ReplacementCount) {
        DOCUMENTS_PROCESSED_TOTAL.inc();
        PROCESSING_SECONDS.observe(elapsed.as_secs_f64());

        for (surface, count) in [
            ("body", replacements.body),
            ("tables", replacements.tables),
            ("headers", replacements.headers),
            ("footers", replacements.footers),
        ] {
            REPLACEMENTS_TOTAL
                .with_label_values(&[surface])
                .inc_by(count as u64);
        }
    }

    /// Record a request that failed in `stage`
    pub fn record_failure(stage: ProcessingStage) {
        DOCUMENTS_FAILED_TOTAL
            .with_label_values(&[stage.as_str()])
            .inc();
    }
}

/// Helper struct for recording template download metrics
pub struct TemplateMetrics;

impl TemplateMetrics {
    /// Record a successful download
    pub fn record_download(elapsed: Duration, size: usize) {
        TEMPLATE_DOWNLOAD_SECONDS.observe(elapsed.as_secs_f64());
        TEMPLATE_BYTES.observe(size as f64);
    }
}
