//! Owned XML event stream for a single package part.
//!
//! Parts are kept as the exact event sequence produced by the reader so that
//! everything the model does not understand is written back unchanged. The
//! only edits ever applied are replacements of `w:t` text nodes.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::DocumentError;

pub(crate) const W_BODY: &[u8] = b"w:body";
pub(crate) const W_HDR: &[u8] = b"w:hdr";
pub(crate) const W_FTR: &[u8] = b"w:ftr";
pub(crate) const W_P: &[u8] = b"w:p";
pub(crate) const W_R: &[u8] = b"w:r";
pub(crate) const W_T: &[u8] = b"w:t";
pub(crate) const W_TBL: &[u8] = b"w:tbl";
pub(crate) const W_TR: &[u8] = b"w:tr";
pub(crate) const W_TC: &[u8] = b"w:tc";
pub(crate) const W_SECT_PR: &[u8] = b"w:sectPr";
pub(crate) const W_HEADER_REF: &[u8] = b"w:headerReference";
pub(crate) const W_FOOTER_REF: &[u8] = b"w:footerReference";
pub(crate) const W_DRAWING: &[u8] = b"w:drawing";
pub(crate) const W_PICT: &[u8] = b"w:pict";
pub(crate) const W_OBJECT: &[u8] = b"w:object";
pub(crate) const W_TAB: &[u8] = b"w:tab";
pub(crate) const W_BR: &[u8] = b"w:br";
pub(crate) const W_CR: &[u8] = b"w:cr";

/// Replacement text for one `w:t` element, keyed by its text event index.
pub(crate) struct TextEdit<'a> {
    /// Index of the `<w:t>` start event
    pub start: usize,
    pub text: &'a str,
}

#[derive(Debug, Clone)]
pub(crate) struct PartXml {
    name: String,
    events: Vec<Event<'static>>,
}

impl PartXml {
    /// Read a part into an owned event list.
    ///
    /// Empty `w:t` elements are normalized so every text element owns exactly
    /// one text event that can later be rewritten in place.
    pub fn parse(name: &str, bytes: &[u8]) -> Result<Self, DocumentError> {
        let mut reader = Reader::from_reader(bytes);
        reader.config_mut().trim_text(false);

        let mut events: Vec<Event<'static>> = Vec::new();
        loop {
            let event = reader
                .read_event()
                .map_err(|e| DocumentError::xml(name, e))?;

            match event {
                Event::Eof => break,
                Event::Empty(e) if e.name().as_ref() == W_T => {
                    let start = e.into_owned();
                    let end = start.to_end().into_owned();
                    events.push(Event::Start(start));
                    events.push(Event::Text(BytesText::new("")));
                    events.push(Event::End(end));
                }
                Event::End(e) => {
                    let opens_text = matches!(
                        events.last(),
                        Some(Event::Start(s)) if s.name().as_ref() == W_T
                    );
                    if e.name().as_ref() == W_T && opens_text {
                        events.push(Event::Text(BytesText::new("")));
                    }
                    events.push(Event::End(e.into_owned()));
                }
                other => events.push(other.into_owned()),
            }
        }

        Ok(Self {
            name: name.to_string(),
            events,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn events(&self) -> &[Event<'static>] {
        &self.events
    }

    /// Unescaped content of the text event at `index`
    pub fn text_at(&self, index: usize) -> Result<String, DocumentError> {
        match self.events.get(index) {
            Some(Event::Text(text)) => text
                .unescape()
                .map(|t| t.into_owned())
                .map_err(|e| DocumentError::xml(&self.name, e)),
            _ => Err(DocumentError::Xml {
                part: self.name.clone(),
                reason: format!("expected text node at event {}", index),
            }),
        }
    }

    /// Serialize the part, substituting edited text nodes.
    pub fn render(&self, edits: &HashMap<usize, TextEdit<'_>>) -> Result<Vec<u8>, DocumentError> {
        let preserve: HashMap<usize, ()> = edits.values().map(|edit| (edit.start, ())).collect();
        let mut writer = Writer::new(Vec::with_capacity(self.events.len() * 16));

        for (index, event) in self.events.iter().enumerate() {
            let result = if let Some(edit) = edits.get(&index) {
                writer.write_event(Event::Text(BytesText::new(edit.text)))
            } else if preserve.contains_key(&index) {
                match event {
                    Event::Start(start) => writer.write_event(Event::Start(preserve_space(start))),
                    other => writer.write_event(other.borrow()),
                }
            } else {
                writer.write_event(event.borrow())
            };
            result.map_err(|e| DocumentError::xml(&self.name, e))?;
        }

        Ok(writer.into_inner())
    }
}

/// `w:t` start tag carrying `xml:space="preserve"` so replaced text keeps
/// leading and trailing whitespace.
fn preserve_space(start: &BytesStart<'static>) -> BytesStart<'static> {
    let has_space = start
        .attributes()
        .flatten()
        .any(|attr| attr.key.as_ref() == b"xml:space");
    if has_space {
        return start.clone();
    }
    let mut patched = start.clone();
    patched.push_attribute(("xml:space", "preserve"));
    patched
}

/// Value of attribute `key` on an element, if present
pub(crate) fn attribute(start: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    start
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_str(part: &PartXml, edits: &HashMap<usize, TextEdit<'_>>) -> String {
        String::from_utf8(part.render(edits).unwrap()).unwrap()
    }

    #[test]
    fn test_untouched_part_renders_identically() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="urn:w"><w:body><w:p><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">Hello &amp; bye </w:t></w:r></w:p></w:body></w:document>"#;
        let part = PartXml::parse("word/document.xml", xml.as_bytes()).unwrap();
        assert_eq!(render_str(&part, &HashMap::new()), xml);
    }

    #[test]
    fn test_empty_text_elements_get_text_node() {
        let xml = r#"<w:r><w:t/><w:t></w:t></w:r>"#;
        let part = PartXml::parse("p", xml.as_bytes()).unwrap();
        let texts = part
            .events()
            .iter()
            .filter(|e| matches!(e, Event::Text(_)))
            .count();
        assert_eq!(texts, 2);
    }

    #[test]
    fn test_edit_escapes_and_preserves_space() {
        let xml = r#"<w:r><w:t>{{Name}}</w:t></w:r>"#;
        let part = PartXml::parse("p", xml.as_bytes()).unwrap();
        // events: Start(w:r), Start(w:t), Text, End(w:t), End(w:r)
        assert_eq!(part.text_at(2).unwrap(), "{{Name}}");

        let mut edits = HashMap::new();
        edits.insert(
            2,
            TextEdit {
                start: 1,
                text: " Smith & Co ",
            },
        );
        assert_eq!(
            render_str(&part, &edits),
            r#"<w:r><w:t xml:space="preserve"> Smith &amp; Co </w:t></w:r>"#
        );
    }

    #[test]
    fn test_malformed_xml_is_rejected() {
        let err = PartXml::parse("word/document.xml", b"<w:p><w:r></w:p>").unwrap_err();
        assert!(matches!(err, DocumentError::Xml { .. }));
    }
}
