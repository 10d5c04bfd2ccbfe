//! XML event source and escaping
//!
//! Parts are consumed as a flat stream of start/text/end events without
//! building a tree. Element names are reported without their namespace
//! prefix; attribute keys keep the prefix as written ("r:id").

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

/// A parse failure, with the byte offset where it was detected
#[derive(Debug, Error)]
#[error("{message} at byte {position}")]
pub struct XmlError {
    pub message: String,
    pub position: u64,
}

/// One event from an XML part
#[derive(Debug, Clone, PartialEq)]
pub enum XmlEvent {
    /// Opening tag. Self-closing elements produce `Start` then `End`.
    Start {
        name: String,
        attributes: Vec<(String, String)>,
    },
    /// Character data, unescaped (text and CDATA)
    Text(String),
    End { name: String },
}

impl XmlEvent {
    /// Attribute value by qualified key, falling back to the local part.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        let XmlEvent::Start { attributes, .. } = self else {
            return None;
        };
        attributes
            .iter()
            .find(|(k, _)| k == key)
            .or_else(|| {
                attributes
                    .iter()
                    .find(|(k, _)| k.rsplit(':').next() == Some(key))
            })
            .map(|(_, v)| v.as_str())
    }

    pub fn is_start(&self, local: &str) -> bool {
        matches!(self, XmlEvent::Start { name, .. } if name == local)
    }

    pub fn is_end(&self, local: &str) -> bool {
        matches!(self, XmlEvent::End { name } if name == local)
    }
}

/// Iterator of [`XmlEvent`]s over an in-memory document
pub struct XmlEvents<'a> {
    reader: Reader<&'a [u8]>,
    buf: Vec<u8>,
    /// End event owed for a self-closing element
    pending_end: Option<String>,
    depth: usize,
    finished: bool,
}

impl<'a> XmlEvents<'a> {
    pub fn new(xml: &'a [u8]) -> Self {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(false);
        Self {
            reader,
            buf: Vec::new(),
            pending_end: None,
            depth: 0,
            finished: false,
        }
    }

    fn error(&self, message: impl ToString) -> XmlError {
        XmlError {
            message: message.to_string(),
            position: self.reader.buffer_position() as u64,
        }
    }

    fn start_event(&self, e: &BytesStart<'_>) -> Result<XmlEvent, XmlError> {
        let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| self.error(err))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(|err| self.error(err))?;
            attributes.push((key, value.into_owned()));
        }
        Ok(XmlEvent::Start { name, attributes })
    }

    fn next_event(&mut self) -> Result<Option<XmlEvent>, XmlError> {
        if let Some(name) = self.pending_end.take() {
            return Ok(Some(XmlEvent::End { name }));
        }
        if self.finished {
            return Ok(None);
        }

        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event.into_owned(),
                Err(err) => return Err(self.error(err)),
            };
            match event {
                Event::Start(e) => {
                    self.depth += 1;
                    return self.start_event(&e).map(Some);
                }
                Event::Empty(e) => {
                    let start = self.start_event(&e)?;
                    if let XmlEvent::Start { name, .. } = &start {
                        self.pending_end = Some(name.clone());
                    }
                    return Ok(Some(start));
                }
                Event::End(e) => {
                    self.depth = self.depth.saturating_sub(1);
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    return Ok(Some(XmlEvent::End { name }));
                }
                Event::Text(e) => {
                    let text = e.unescape().map_err(|err| self.error(err))?;
                    if self.depth == 0 {
                        // Whitespace between the prolog and the root element
                        continue;
                    }
                    return Ok(Some(XmlEvent::Text(text.into_owned())));
                }
                Event::CData(e) => {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    return Ok(Some(XmlEvent::Text(text)));
                }
                Event::Eof => {
                    self.finished = true;
                    if self.depth > 0 {
                        return Err(self.error("unexpected end of document"));
                    }
                    return Ok(None);
                }
                _ => {}
            }
        }
    }
}

impl Iterator for XmlEvents<'_> {
    type Item = Result<XmlEvent, XmlError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_event() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => None,
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

/// Escape `& < > " '` for element text and attribute values.
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(xml: &str) -> Vec<XmlEvent> {
        XmlEvents::new(xml.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_events_with_namespaces_and_attributes() {
        let events = collect(
            r#"<?xml version="1.0"?>
<x:workbook xmlns:x="urn:x" xmlns:r="urn:r"><x:sheet name="A &amp; B" r:id="rId1"/></x:workbook>"#,
        );
        assert!(events[0].is_start("workbook"));
        assert!(events[1].is_start("sheet"));
        assert_eq!(events[1].attribute("name"), Some("A & B"));
        assert_eq!(events[1].attribute("r:id"), Some("rId1"));
        assert_eq!(events[1].attribute("id"), Some("rId1"));
        assert!(events[2].is_end("sheet"));
        assert!(events[3].is_end("workbook"));
        assert_eq!(events.len(), 4);
    }

    #[test]
    fn test_text_is_unescaped_and_whitespace_kept() {
        let events = collect("<t> a &lt;b&gt; </t>");
        assert_eq!(events[1], XmlEvent::Text(" a <b> ".to_string()));
    }

    #[test]
    fn test_cdata_is_text() {
        let events = collect("<t><![CDATA[<raw>]]></t>");
        assert_eq!(events[1], XmlEvent::Text("<raw>".to_string()));
    }

    #[test]
    fn test_mismatched_end_is_error() {
        let result: Result<Vec<_>, _> = XmlEvents::new(b"<a><b></a>").collect();
        assert!(result.is_err());
    }

    #[test]
    fn test_truncated_document_is_error() {
        let result: Result<Vec<_>, _> = XmlEvents::new(b"<a><b>text").collect();
        assert!(result.is_err());
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("plain"), "plain");
        assert_eq!(
            escape_xml(r#"a & b < c > d " e ' f"#),
            "a &amp; b &lt; c &gt; d &quot; e &apos; f"
        );
    }

    #[test]
    fn test_escape_roundtrips_through_reader() {
        let text = r#"Tom & "Jerry" <'cartoon'>"#;
        let xml = format!("<t>{}</t>", escape_xml(text));
        let events = collect(&xml);
        assert_eq!(events[1], XmlEvent::Text(text.to_string()));
    }
}
