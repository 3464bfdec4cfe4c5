//! Word document (.docx) model.
//!
//! This module provides:
//! - Package access that copies untouched entries (images, styles) verbatim
//! - A run-level model of the body, table cells, headers and footers
//! - Serialization that rewrites only the text nodes that changed
//!
//! # Example
//!
//! ```ignore
//! let mut document = Document::parse(bytes)?;
//! for paragraph in document.paragraphs_mut() {
//!     for run in paragraph.runs_mut() {
//!         run.replace_all("{{SellerName}}", "Jane Doe");
//!     }
//! }
//! let output = document.to_bytes()?;
//! ```

mod model;
mod package;
mod sections;
mod xml;

#[cfg(test)]
pub(crate) mod fixtures;

use std::collections::HashMap;
use std::fmt::Display;
use std::io::{Cursor, Seek, Write};

use thiserror::Error;

pub use model::{Cell, Paragraph, Row, Run, Story, Table};

use package::{rels_path, resolve_target, Package};
use sections::{parse_relationships, section_refs, Relationship};
use xml::{PartXml, W_BODY, W_FTR, W_HDR};

/// MIME type of a WordprocessingML document
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const PACKAGE_RELS: &str = "_rels/.rels";
const DEFAULT_MAIN_PART: &str = "word/document.xml";

/// Document-specific error type
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid document package: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Malformed XML in {part}: {reason}")]
    Xml { part: String, reason: String },

    #[error("Document package is missing part: {0}")]
    MissingPart(String),

    #[error("Part {part} exceeds {max} bytes when decompressed")]
    PartTooLarge { part: String, max: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DocumentError {
    pub(crate) fn xml(part: &str, reason: impl Display) -> Self {
        DocumentError::Xml {
            part: part.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// A section's default header and footer, as indices into the document's
/// header and footer stories
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Section {
    pub header: Option<usize>,
    pub footer: Option<usize>,
}

/// Parsed .docx document
#[derive(Debug, Clone)]
pub struct Document {
    package: Package,
    body: Story,
    headers: Vec<Story>,
    footers: Vec<Story>,
    sections: Vec<Section>,
}

impl Document {
    /// Parse a .docx package.
    pub fn parse(bytes: Vec<u8>) -> Result<Self, DocumentError> {
        let package = Package::open(bytes)?;
        let main_part = main_part_name(&package)?;

        let body_xml = PartXml::parse(&main_part, &package.read_required(&main_part)?)?;
        let refs = section_refs(&body_xml);
        let body = Story::parse(body_xml, W_BODY)?;

        let relationships = match package.read(&rels_path(&main_part))? {
            Some(bytes) => parse_relationships(&rels_path(&main_part), &bytes)?,
            None => Vec::new(),
        };

        let mut headers = Vec::new();
        let mut footers = Vec::new();
        let mut header_ids: HashMap<String, usize> = HashMap::new();
        let mut footer_ids: HashMap<String, usize> = HashMap::new();

        for rel in &relationships {
            let (stories, ids, root) = if rel.is_header() {
                (&mut headers, &mut header_ids, W_HDR)
            } else if rel.is_footer() {
                (&mut footers, &mut footer_ids, W_FTR)
            } else {
                continue;
            };
            let story = load_story(&package, &main_part, rel, root)?;
            ids.insert(rel.id.clone(), stories.len());
            stories.push(story);
        }

        let sections = refs
            .into_iter()
            .map(|r| Section {
                header: r.header.and_then(|id| header_ids.get(&id).copied()),
                footer: r.footer.and_then(|id| footer_ids.get(&id).copied()),
            })
            .collect();

        Ok(Self {
            package,
            body,
            headers,
            footers,
            sections,
        })
    }

    /// Body paragraphs (direct children of `w:body`)
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.paragraphs()
    }

    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.body.paragraphs_mut()
    }

    /// Body tables (direct children of `w:body`)
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.body.tables()
    }

    pub fn tables_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.body.tables_mut()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Default header of section `index`, if the section has one
    pub fn section_header(&self, index: usize) -> Option<&Story> {
        let header = self.sections.get(index)?.header?;
        self.headers.get(header)
    }

    pub fn section_header_mut(&mut self, index: usize) -> Option<&mut Story> {
        let header = self.sections.get(index)?.header?;
        self.headers.get_mut(header)
    }

    /// Default footer of section `index`, if the section has one
    pub fn section_footer(&self, index: usize) -> Option<&Story> {
        let footer = self.sections.get(index)?.footer?;
        self.footers.get(footer)
    }

    pub fn section_footer_mut(&mut self, index: usize) -> Option<&mut Story> {
        let footer = self.sections.get(index)?.footer?;
        self.footers.get_mut(footer)
    }

    /// Text of the body, followed by every header and footer part
    pub fn text(&self) -> String {
        std::iter::once(&self.body)
            .chain(self.headers.iter())
            .chain(self.footers.iter())
            .map(Story::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Serialize the document into `out`
    pub fn write_to<W: Write + Seek>(&self, out: W) -> Result<W, DocumentError> {
        let mut overrides = HashMap::new();
        for story in std::iter::once(&self.body)
            .chain(self.headers.iter())
            .chain(self.footers.iter())
            .filter(|s| s.is_dirty())
        {
            overrides.insert(story.part_name().to_string(), story.render()?);
        }
        self.package.write_to(out, &overrides)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        Ok(self.write_to(Cursor::new(Vec::new()))?.into_inner())
    }
}

/// Main document part named by the package relationships
fn main_part_name(package: &Package) -> Result<String, DocumentError> {
    let Some(bytes) = package.read(PACKAGE_RELS)? else {
        return Ok(DEFAULT_MAIN_PART.to_string());
    };
    let main = parse_relationships(PACKAGE_RELS, &bytes)?
        .iter()
        .find(|r| r.is_office_document())
        .map(|r| resolve_target("", &r.target))
        .unwrap_or_else(|| DEFAULT_MAIN_PART.to_string());
    Ok(main)
}

fn load_story(
    package: &Package,
    source: &str,
    rel: &Relationship,
    root: &[u8],
) -> Result<Story, DocumentError> {
    let name = resolve_target(source, &rel.target);
    let xml = PartXml::parse(&name, &package.read_required(&name)?)?;
    Story::parse(xml, root)
}
