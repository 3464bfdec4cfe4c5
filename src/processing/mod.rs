//! Affidavit document pipeline.
//!
//! A request moves through `Validating → Downloading → Parsing →
//! Substituting → Serializing → Responding`. Any stage before `Responding`
//! may fail and end the request; failures are isolated to that request.

mod filename;
mod pipeline;
mod request;

use std::fmt;

pub use filename::{content_disposition, output_filename, sanitize_component};
pub use pipeline::{DocumentProcessor, ProcessedDocument};
pub use request::{
    format_notary_date, AffidavitFields, ProcessRequest, CONTRACT_DATE_TOKEN, DEFAULT_FIELD_VALUE,
    NOTARY_DATE_TOKEN, PROPERTY_ADDRESS_TOKEN, SELLER_NAME_TOKEN,
};

/// Pipeline stage, used for logging and failure metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessingStage {
    Validating,
    Downloading,
    Parsing,
    Substituting,
    Serializing,
    Responding,
}

impl ProcessingStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStage::Validating => "validating",
            ProcessingStage::Downloading => "downloading",
            ProcessingStage::Parsing => "parsing",
            ProcessingStage::Substituting => "substituting",
            ProcessingStage::Serializing => "serializing",
            ProcessingStage::Responding => "responding",
        }
    }
}

impl fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
