use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::processing::DocumentProcessor;
use crate::template_source::{HttpTemplateSource, TemplateSource, TemplateSourceError};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub processor: Arc<DocumentProcessor>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self, TemplateSourceError> {
        let source = Arc::new(HttpTemplateSource::new(&settings.template)?);
        tracing::info!(url = %source.url(), "Template source configured");
        Ok(Self::with_source(settings, source))
    }

    /// Build state around an existing template source
    pub fn with_source(settings: Settings, source: Arc<dyn TemplateSource>) -> Self {
        let processor = Arc::new(DocumentProcessor::new(source, settings.output.clone()));

        Self {
            settings: Arc::new(settings),
            processor,
            start_time: Instant::now(),
        }
    }
}
