//! HTTP template source

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::{TemplateSource, TemplateSourceError};
use crate::config::TemplateConfig;
use crate::metrics::TemplateMetrics;

/// Downloads the configured template over HTTP(S)
pub struct HttpTemplateSource {
    client: Client,
    template_id: String,
    url: String,
    max_bytes: u64,
}

impl HttpTemplateSource {
    pub fn new(config: &TemplateConfig) -> Result<Self, TemplateSourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            template_id: config.id.clone(),
            url: config.resolved_url(),
            max_bytes: config.max_bytes,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn check_size(&self, size: u64) -> Result<(), TemplateSourceError> {
        if size > self.max_bytes {
            return Err(TemplateSourceError::TooLarge {
                size,
                max: self.max_bytes,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl TemplateSource for HttpTemplateSource {
    fn template_id(&self) -> &str {
        &self.template_id
    }

    #[tracing::instrument(name = "template.fetch", skip(self), fields(template_id = %self.template_id))]
    async fn fetch(&self) -> Result<Vec<u8>, TemplateSourceError> {
        tracing::info!(url = %self.url, "Downloading template");
        let started = Instant::now();

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(status = status.as_u16(), "Template download failed");
            return Err(TemplateSourceError::Status {
                status: status.as_u16(),
            });
        }

        if let Some(length) = response.content_length() {
            self.check_size(length)?;
        }
        let bytes = response.bytes().await?;
        self.check_size(bytes.len() as u64)?;

        TemplateMetrics::record_download(started.elapsed(), bytes.len());
        tracing::info!(size = bytes.len(), "Template downloaded");
        Ok(bytes.to_vec())
    }
}
