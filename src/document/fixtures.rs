//! In-memory .docx packages for tests.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub(crate) const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nsignature-image";

/// A run carrying an inline picture that references `word/media/image1.png`
pub(crate) const IMAGE_RUN: &str = r#"<w:r><w:rPr><w:noProof/></w:rPr><w:drawing><wp:inline distT="0" distB="0"><wp:extent cx="1905000" cy="476250"/><wp:docPr id="1" name="Signature"/><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:pic><pic:blipFill><a:blip r:embed="rId20"/></pic:blipFill></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r>"#;

const NAMESPACES: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture""#;

const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

#[derive(Default)]
pub(crate) struct DocxBuilder {
    body: String,
    header: Option<String>,
    footer: Option<String>,
    skip_main_part: bool,
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append block content (paragraphs, tables) to the body
    pub fn body(mut self, xml: impl AsRef<str>) -> Self {
        self.body.push_str(xml.as_ref());
        self
    }

    pub fn header(mut self, xml: impl AsRef<str>) -> Self {
        self.header = Some(xml.as_ref().to_string());
        self
    }

    pub fn footer(mut self, xml: impl AsRef<str>) -> Self {
        self.footer = Some(xml.as_ref().to_string());
        self
    }

    pub fn without_main_part(mut self) -> Self {
        self.skip_main_part = true;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let mut add = |name: &str, contents: &[u8]| {
            writer
                .start_file(name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(contents).unwrap();
        };

        add("[Content_Types].xml", content_types().as_bytes());
        add(
            "_rels/.rels",
            relationships(&[("rId1", "officeDocument", "word/document.xml")]).as_bytes(),
        );

        let mut rels = vec![("rId20", "image", "media/image1.png")];
        let mut sect_pr = String::from("<w:sectPr>");
        if self.header.is_some() {
            rels.push(("rId7", "header", "header1.xml"));
            sect_pr.push_str(r#"<w:headerReference w:type="default" r:id="rId7"/>"#);
        }
        if self.footer.is_some() {
            rels.push(("rId8", "footer", "footer1.xml"));
            sect_pr.push_str(r#"<w:footerReference w:type="default" r:id="rId8"/>"#);
        }
        sect_pr.push_str(r#"<w:pgSz w:w="12240" w:h="15840"/></w:sectPr>"#);

        if !self.skip_main_part {
            let document = format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document {}><w:body>{}{}</w:body></w:document>"#,
                NAMESPACES, self.body, sect_pr
            );
            add("word/document.xml", document.as_bytes());
        }
        add("word/_rels/document.xml.rels", relationships(&rels).as_bytes());

        if let Some(header) = &self.header {
            let xml = format!(r#"<w:hdr {}>{}</w:hdr>"#, NAMESPACES, header);
            add("word/header1.xml", xml.as_bytes());
        }
        if let Some(footer) = &self.footer {
            let xml = format!(r#"<w:ftr {}>{}</w:ftr>"#, NAMESPACES, footer);
            add("word/footer1.xml", xml.as_bytes());
        }
        add("word/media/image1.png", PNG_BYTES);

        writer.finish().unwrap().into_inner()
    }
}

fn content_types() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#
        .to_string()
}

fn relationships(entries: &[(&str, &str, &str)]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (id, kind, target) in entries {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}/{}" Target="{}"/>"#,
            id, REL_BASE, kind, target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}
