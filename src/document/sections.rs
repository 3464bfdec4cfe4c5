//! Relationship parsing and section header/footer resolution.

use quick_xml::events::Event;
use quick_xml::Reader;

use super::xml::{attribute, PartXml, W_FOOTER_REF, W_HEADER_REF, W_SECT_PR};
use super::DocumentError;

const REL_OFFICE_DOCUMENT: &str = "/officeDocument";
const REL_HEADER: &str = "/header";
const REL_FOOTER: &str = "/footer";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

impl Relationship {
    pub fn is_office_document(&self) -> bool {
        !self.external && self.rel_type.ends_with(REL_OFFICE_DOCUMENT)
    }

    pub fn is_header(&self) -> bool {
        !self.external && self.rel_type.ends_with(REL_HEADER)
    }

    pub fn is_footer(&self) -> bool {
        !self.external && self.rel_type.ends_with(REL_FOOTER)
    }
}

/// Parse a `.rels` part
pub(crate) fn parse_relationships(
    part: &str,
    bytes: &[u8],
) -> Result<Vec<Relationship>, DocumentError> {
    let mut reader = Reader::from_reader(bytes);
    let mut relationships = Vec::new();

    loop {
        match reader.read_event().map_err(|e| DocumentError::xml(part, e))? {
            Event::Eof => break,
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let (Some(id), Some(rel_type), Some(target)) = (
                    attribute(&e, b"Id"),
                    attribute(&e, b"Type"),
                    attribute(&e, b"Target"),
                ) else {
                    continue;
                };
                let external = attribute(&e, b"TargetMode")
                    .map(|mode| mode.eq_ignore_ascii_case("External"))
                    .unwrap_or(false);
                relationships.push(Relationship {
                    id,
                    rel_type,
                    target,
                    external,
                });
            }
            _ => {}
        }
    }

    Ok(relationships)
}

/// Header and footer relationship ids referenced by one `w:sectPr`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SectionRefs {
    pub header: Option<String>,
    pub footer: Option<String>,
}

/// Collect the default header/footer references of every section in body
/// order. A section without its own reference keeps the previous section's
/// ("linked to previous").
pub(crate) fn section_refs(body: &PartXml) -> Vec<SectionRefs> {
    let mut sections = Vec::new();
    let mut current: Option<SectionRefs> = None;
    let mut inherited = SectionRefs::default();

    for event in body.events() {
        match event {
            Event::Start(e) if e.name().as_ref() == W_SECT_PR => {
                current = Some(SectionRefs::default());
            }
            Event::Empty(e) if e.name().as_ref() == W_SECT_PR => {
                sections.push(inherited.clone());
            }
            Event::End(e) if e.name().as_ref() == W_SECT_PR => {
                if let Some(own) = current.take() {
                    inherited = SectionRefs {
                        header: own.header.or(inherited.header.take()),
                        footer: own.footer.or(inherited.footer.take()),
                    };
                    sections.push(inherited.clone());
                }
            }
            Event::Start(e) | Event::Empty(e) => {
                let Some(refs) = current.as_mut() else {
                    continue;
                };
                let name = e.name();
                let is_default = attribute(e, b"w:type")
                    .map(|t| t == "default")
                    .unwrap_or(true);
                if !is_default {
                    continue;
                }
                if name.as_ref() == W_HEADER_REF {
                    refs.header = attribute(e, b"r:id");
                } else if name.as_ref() == W_FOOTER_REF {
                    refs.footer = attribute(e, b"r:id");
                }
            }
            _ => {}
        }
    }

    sections
}
