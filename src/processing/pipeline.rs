//! Download → parse → substitute → serialize

use std::io::{Read, Seek};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::{Local, Utc};
use tempfile::NamedTempFile;

use super::{output_filename, ProcessRequest, ProcessingStage};
use crate::config::OutputConfig;
use crate::document::Document;
use crate::error::AppError;
use crate::metrics::ProcessingMetrics;
use crate::substitution::{substitute, ReplacementCount, ReplacementMap};
use crate::template_source::TemplateSource;

/// A filled document ready to be returned
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub replacements: ReplacementCount,
}

/// Runs the affidavit pipeline for one request at a time; holds no
/// per-request state.
pub struct DocumentProcessor {
    source: Arc<dyn TemplateSource>,
    output: OutputConfig,
}

impl DocumentProcessor {
    pub fn new(source: Arc<dyn TemplateSource>, output: OutputConfig) -> Self {
        Self { source, output }
    }

    pub fn template_id(&self) -> &str {
        self.source.template_id()
    }

    #[tracing::instrument(name = "document.process", skip(self, request))]
    pub async fn process(&self, request: ProcessRequest) -> Result<ProcessedDocument, AppError> {
        let started = Instant::now();

        enter(ProcessingStage::Validating);
        let fields = request
            .into_fields(Local::now().date_naive())
            .map_err(|e| failed(ProcessingStage::Validating, e))?;
        tracing::info!(seller_name = %fields.seller_name, "Processing document");

        enter(ProcessingStage::Downloading);
        let template = self
            .source
            .fetch()
            .await
            .map_err(|e| failed(ProcessingStage::Downloading, e.into()))?;

        let replacements = fields.replacements();
        tracing::info!(?replacements, "Replacements to make");

        let scratch_dir = self.output.scratch_dir.clone();
        let (bytes, count) =
            tokio::task::spawn_blocking(move || render(template, &replacements, scratch_dir))
                .await
                .map_err(|e| {
                    failed(
                        ProcessingStage::Substituting,
                        AppError::Unexpected(format!("document worker failed: {}", e)),
                    )
                })??;

        enter(ProcessingStage::Responding);
        let filename = output_filename(
            &self.output.filename_prefix,
            &fields.seller_name,
            Utc::now().timestamp(),
        );
        ProcessingMetrics::record_processed(started.elapsed(), &count);
        tracing::info!(
            %filename,
            size = bytes.len(),
            replacements = count.total(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Document ready"
        );

        Ok(ProcessedDocument {
            filename,
            bytes,
            replacements: count,
        })
    }
}

/// Parse, fill and serialize the template. Runs on the blocking pool.
fn render(
    template: Vec<u8>,
    replacements: &ReplacementMap,
    scratch_dir: Option<PathBuf>,
) -> Result<(Vec<u8>, ReplacementCount), AppError> {
    enter(ProcessingStage::Parsing);
    let mut document =
        Document::parse(template).map_err(|e| failed(ProcessingStage::Parsing, e.into()))?;

    enter(ProcessingStage::Substituting);
    let count = substitute(&mut document, replacements);
    tracing::info!(
        total = count.total(),
        body = count.body,
        tables = count.tables,
        headers = count.headers,
        footers = count.footers,
        "Placeholders replaced"
    );

    enter(ProcessingStage::Serializing);
    let bytes = serialize(&document, scratch_dir)
        .map_err(|e| failed(ProcessingStage::Serializing, e))?;

    Ok((bytes, count))
}

/// Write the document to a uniquely named scratch file and read it back.
/// The scratch file is removed when it goes out of scope.
fn serialize(document: &Document, scratch_dir: Option<PathBuf>) -> Result<Vec<u8>, AppError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("affidavit-").suffix(".docx");
    let mut scratch: NamedTempFile = match scratch_dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };
    tracing::debug!(path = %scratch.path().display(), "Writing scratch document");

    let file = document.write_to(scratch.as_file_mut())?;
    file.rewind()?;

    let mut bytes = Vec::new();
    scratch.as_file_mut().read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn enter(stage: ProcessingStage) {
    tracing::info!(%stage, "Entering stage");
}

fn failed(stage: ProcessingStage, error: AppError) -> AppError {
    ProcessingMetrics::record_failure(stage);
    tracing::warn!(%stage, error = %error, "Document processing failed");
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::document::fixtures::{DocxBuilder, IMAGE_RUN};
    use crate::template_source::TemplateSourceError;

    struct StaticSource {
        result: Result<Vec<u8>, u16>,
        calls: AtomicUsize,
    }

    impl StaticSource {
        fn ok(bytes: Vec<u8>) -> Arc<Self> {
            Arc::new(Self {
                result: Ok(bytes),
                calls: AtomicUsize::new(0),
            })
        }

        fn status(status: u16) -> Arc<Self> {
            Arc::new(Self {
                result: Err(status),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl TemplateSource for StaticSource {
        fn template_id(&self) -> &str {
            "static"
        }

        async fn fetch(&self) -> Result<Vec<u8>, TemplateSourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.result {
                Ok(bytes) => Ok(bytes.clone()),
                Err(status) => Err(TemplateSourceError::Status { status: *status }),
            }
        }
    }

    fn request(seller_name: Option<&str>) -> ProcessRequest {
        ProcessRequest {
            seller_name: seller_name.map(str::to_string),
            ..ProcessRequest::default()
        }
    }

    fn template() -> Vec<u8> {
        DocxBuilder::new()
            .body(format!(
                r#"<w:p><w:r><w:t>Seller: {{{{SellerName}}}}</w:t></w:r>{}</w:p>"#,
                IMAGE_RUN
            ))
            .body(r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>{{PropertyAddress}}</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#)
            .build()
    }

    #[tokio::test]
    async fn test_process_fills_template() {
        let source = StaticSource::ok(template());
        let processor = DocumentProcessor::new(source.clone(), OutputConfig::default());

        let processed = processor.process(request(Some("Jane Doe"))).await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(processed.replacements.body, 1);
        assert_eq!(processed.replacements.tables, 1);
        assert!(processed.filename.starts_with("Processed_Affidavit_Jane_Doe_"));
        assert!(processed.filename.ends_with(".docx"));

        let document = Document::parse(processed.bytes).unwrap();
        let paragraph = document.paragraphs().next().unwrap();
        assert_eq!(paragraph.text(), "Seller: Jane Doe");
        assert!(paragraph.runs()[1].has_drawing());
        let cell = &document.tables().next().unwrap().rows()[0].cells()[0];
        assert_eq!(cell.paragraphs()[0].text(), "TBD");
    }

    #[tokio::test]
    async fn test_missing_seller_name_skips_download() {
        let source = StaticSource::ok(template());
        let processor = DocumentProcessor::new(source.clone(), OutputConfig::default());

        let err = processor.process(request(None)).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_download_status_is_reported() {
        let processor =
            DocumentProcessor::new(StaticSource::status(500), OutputConfig::default());

        let err = processor.process(request(Some("Jane"))).await.unwrap_err();
        assert!(matches!(err, AppError::Download { status: 500 }));
    }

    #[tokio::test]
    async fn test_malformed_template() {
        let processor = DocumentProcessor::new(
            StaticSource::ok(b"<html>quota exceeded</html>".to_vec()),
            OutputConfig::default(),
        );

        let err = processor.process(request(Some("Jane"))).await.unwrap_err();
        assert!(matches!(err, AppError::MalformedDocument(_)));
    }

    #[tokio::test]
    async fn test_unwritable_scratch_dir() {
        let output = OutputConfig {
            scratch_dir: Some(PathBuf::from("/nonexistent/scratch/dir")),
            ..OutputConfig::default()
        };
        let processor = DocumentProcessor::new(StaticSource::ok(template()), output);

        let err = processor.process(request(Some("Jane"))).await.unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[test]
    fn test_scratch_file_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let document = Document::parse(template()).unwrap();

        let bytes = serialize(&document, Some(dir.path().to_path_buf())).unwrap();

        assert!(!bytes.is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
