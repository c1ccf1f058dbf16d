//! Structured text extraction from slide XML.
//!
//! Text lives in `p:sp/p:txBody/a:p/a:r/a:t`; list formatting in the
//! paragraph's `a:pPr` (`lvl` attribute plus `a:buChar`, `a:buAutoNum` or
//! `a:buNone` children). Shapes, pictures, tables and run formatting are not
//! interpreted; only their text runs survive.

use crate::error::{Error, Result};
use crate::model::{ListInfo, ListType, ParagraphRecord, DEFAULT_BULLET};
use crate::render::markdown::render_paragraphs;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};

/// Turns one slide's XML into markdown text.
///
/// `Ok(None)` means the markup holds no paragraph elements at all.
pub trait SlideExtractor: Send + Sync {
    fn extract(&self, xml: &str) -> Result<Option<String>>;
}

/// Default [`SlideExtractor`]: paragraph records rendered as markdown lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredExtractor;

impl SlideExtractor for StructuredExtractor {
    fn extract(&self, xml: &str) -> Result<Option<String>> {
        let paragraphs = parse_paragraphs(xml)?;
        if paragraphs.is_empty() {
            return Ok(None);
        }
        Ok(Some(render_paragraphs(&paragraphs)))
    }
}

/// List markers collected while inside one `a:p`.
#[derive(Debug, Default)]
struct ParagraphState {
    text: String,
    run_text: String,
    in_text: bool,
    in_properties: bool,
    seen_properties: bool,
    level: Option<u8>,
    bullet_char: Option<String>,
    has_bullet: bool,
    has_auto_number: bool,
    has_no_bullet: bool,
}

impl ParagraphState {
    fn read_properties(&mut self, e: &BytesStart<'_>) {
        self.seen_properties = true;
        for attr in e.attributes().flatten() {
            if attr.key.local_name().as_ref() == b"lvl" {
                // Unparsable levels count as top level.
                self.level = Some(attribute_text(&attr).trim().parse().unwrap_or(0));
            }
        }
    }

    fn read_marker(&mut self, e: &BytesStart<'_>) {
        match e.name().local_name().as_ref() {
            b"buChar" => {
                self.has_bullet = true;
                self.bullet_char = e
                    .attributes()
                    .flatten()
                    .find(|a| a.key.local_name().as_ref() == b"char")
                    .map(|a| attribute_text(&a));
            }
            b"buAutoNum" => self.has_auto_number = true,
            b"buNone" => self.has_no_bullet = true,
            _ => {}
        }
    }

    fn close_run(&mut self) {
        self.in_text = false;
        if !self.run_text.trim().is_empty() {
            self.text.push_str(&self.run_text);
            self.text.push(' ');
        }
        self.run_text.clear();
    }

    fn finish(self) -> ParagraphRecord {
        let list_type = if self.has_no_bullet {
            ListType::None
        } else if self.has_auto_number {
            ListType::Numbered
        } else if self.has_bullet {
            ListType::Bullet
        } else {
            ListType::None
        };

        // `lvl` only means something alongside a bullet or numbering marker.
        let level = if self.has_bullet || self.has_auto_number {
            self.level.unwrap_or(0)
        } else {
            0
        };

        let bullet_char = self
            .has_bullet
            .then(|| self.bullet_char.unwrap_or_else(|| DEFAULT_BULLET.to_string()));

        ParagraphRecord {
            text: self.text.trim().to_string(),
            list: ListInfo {
                list_type,
                level,
                bullet_char,
            },
        }
    }
}

fn attribute_text(attr: &Attribute<'_>) -> String {
    match attr.unescape_value() {
        Ok(value) => value.into_owned(),
        Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
    }
}

/// Parse every `a:p` element of a slide, in document order.
///
/// Paragraphs without text are kept (with empty `text`) so callers can tell
/// a slide with blank paragraphs from one with none.
pub fn parse_paragraphs(xml: &str) -> Result<Vec<ParagraphRecord>> {
    let mut reader = quick_xml::Reader::from_str(xml);
    // xml:space="preserve" runs keep their spacing
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current: Option<ParagraphState> = None;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| Error::XmlParse(e.to_string()))?;
        match event {
            Event::Start(ref e) => {
                let name = e.name();
                match (name.local_name().as_ref(), current.as_mut()) {
                    (b"p", None) => current = Some(ParagraphState::default()),
                    (b"pPr", Some(state)) if !state.seen_properties => {
                        state.read_properties(e);
                        state.in_properties = true;
                    }
                    (b"buChar" | b"buAutoNum" | b"buNone", Some(state)) if state.in_properties => {
                        state.read_marker(e);
                    }
                    (b"t", Some(state)) => {
                        state.in_text = true;
                        state.run_text.clear();
                    }
                    _ => {}
                }
            }
            Event::Empty(ref e) => {
                let name = e.name();
                match (name.local_name().as_ref(), current.as_mut()) {
                    (b"p", None) => paragraphs.push(ParagraphState::default().finish()),
                    (b"pPr", Some(state)) if !state.seen_properties => state.read_properties(e),
                    (b"buChar" | b"buAutoNum" | b"buNone", Some(state)) if state.in_properties => {
                        state.read_marker(e);
                    }
                    _ => {}
                }
            }
            Event::Text(ref e) => {
                if let Some(state) = current.as_mut().filter(|s| s.in_text) {
                    let text = e.unescape().map_err(|e| Error::XmlParse(e.to_string()))?;
                    state.run_text.push_str(&text);
                }
            }
            Event::CData(ref e) => {
                if let Some(state) = current.as_mut().filter(|s| s.in_text) {
                    state.run_text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::End(ref e) => {
                let name = e.name();
                match name.local_name().as_ref() {
                    b"p" => {
                        if let Some(state) = current.take() {
                            paragraphs.push(state.finish());
                        }
                    }
                    b"pPr" => {
                        if let Some(state) = current.as_mut() {
                            state.in_properties = false;
                        }
                    }
                    b"t" => {
                        if let Some(state) = current.as_mut().filter(|s| s.in_text) {
                            state.close_run();
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}
