//! Template document retrieval.
//!
//! The template lives in a remote object store and is fetched once per
//! request. There is no caching and no retry: a non-success response ends the
//! request.

mod http;

use async_trait::async_trait;
use thiserror::Error;

pub use http::HttpTemplateSource;

/// Template download errors
#[derive(Debug, Error)]
pub enum TemplateSourceError {
    /// The store answered with a non-success status
    #[error("Could not download template. Status: {status}")]
    Status { status: u16 },

    /// Body exceeds the configured maximum
    #[error("Template size ({size} bytes) exceeds maximum ({max} bytes)")]
    TooLarge { size: u64, max: u64 },

    /// Connection, TLS or timeout failure
    #[error("Template request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Supplier of raw template bytes
#[async_trait]
pub trait TemplateSource: Send + Sync {
    /// Identifier of the template this source serves
    fn template_id(&self) -> &str;

    /// Download the template document
    async fn fetch(&self) -> Result<Vec<u8>, TemplateSourceError>;
}
