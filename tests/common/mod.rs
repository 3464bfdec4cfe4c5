//! Shared helpers for integration tests

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use affidavit_document_service::config::Settings;
use affidavit_document_service::server::{create_app, AppState};
use affidavit_document_service::template_source::{TemplateSource, TemplateSourceError};

pub const SIGNATURE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nsignature";

const NAMESPACES: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main""#;

const RELS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Affidavit template with a signature image, a table, a header and a footer
pub fn affidavit_template() -> Vec<u8> {
    let body = format!(
        r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">I, {{{{SellerName}}}}, being duly sworn</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>Property:</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>{{{{PropertyAddress}}}}</w:t></w:r></w:p></w:tc></w:tr><w:tr><w:tc><w:p><w:r><w:t>Contract date:</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>{{{{ContractDate}}}}</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:p><w:r><w:t xml:space="preserve">Signature: </w:t></w:r><w:r><w:drawing><wp:inline><wp:docPr id="1" name="Signature"/><a:graphic><a:graphicData><a:blip r:embed="rId9"/></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p><w:sectPr><w:headerReference w:type="default" r:id="rId7"/><w:footerReference w:type="default" r:id="rId8"/></w:sectPr>"#
    );

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let mut add = |name: &str, contents: &[u8]| {
        writer.start_file(name, SimpleFileOptions::default()).unwrap();
        writer.write_all(contents).unwrap();
    };

    add(
        "[Content_Types].xml",
        br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#,
    );
    add(
        "_rels/.rels",
        format!(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{RELS}/officeDocument" Target="word/document.xml"/></Relationships>"#
        )
        .as_bytes(),
    );
    add(
        "word/document.xml",
        format!(r#"<w:document {NAMESPACES}><w:body>{body}</w:body></w:document>"#).as_bytes(),
    );
    add(
        "word/_rels/document.xml.rels",
        format!(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId7" Type="{RELS}/header" Target="header1.xml"/><Relationship Id="rId8" Type="{RELS}/footer" Target="footer1.xml"/><Relationship Id="rId9" Type="{RELS}/image" Target="media/image1.png"/></Relationships>"#
        )
        .as_bytes(),
    );
    add(
        "word/header1.xml",
        format!(r#"<w:hdr {NAMESPACES}><w:p><w:r><w:t>Affidavit of {{{{SellerName}}}}</w:t></w:r></w:p></w:hdr>"#).as_bytes(),
    );
    add(
        "word/footer1.xml",
        format!(r#"<w:ftr {NAMESPACES}><w:p><w:r><w:t>Sworn on {{{{NotaryDate}}}}</w:t></w:r></w:p></w:ftr>"#).as_bytes(),
    );
    add("word/media/image1.png", SIGNATURE_PNG);

    writer.finish().unwrap().into_inner()
}

/// Template source that serves fixed bytes or fails with a status
pub struct StubSource {
    result: Result<Vec<u8>, u16>,
    calls: AtomicUsize,
}

impl StubSource {
    pub fn serving(bytes: Vec<u8>) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(bytes),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            result: Err(status),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TemplateSource for StubSource {
    fn template_id(&self) -> &str {
        "stub-template"
    }

    async fn fetch(&self) -> Result<Vec<u8>, TemplateSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.result {
            Ok(bytes) => Ok(bytes.clone()),
            Err(status) => Err(TemplateSourceError::Status { status: *status }),
        }
    }
}

pub fn test_app(source: Arc<StubSource>) -> axum::Router {
    create_app(AppState::with_source(Settings::default(), source))
}

/// Read an entry of a zip package as UTF-8
pub fn read_entry(package: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(package)).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut text = String::new();
    std::io::Read::read_to_string(&mut entry, &mut text).unwrap();
    text
}

pub fn read_entry_bytes(package: &[u8], name: &str) -> Vec<u8> {
    let mut archive = zip::ZipArchive::new(Cursor::new(package)).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut bytes = Vec::new();
    std::io::Read::read_to_end(&mut entry, &mut bytes).unwrap();
    bytes
}
