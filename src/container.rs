//! ZIP archive reader for reassembled presentation packages.
//!
//! The reader is reached through two small traits so the assembler never
//! names the ZIP implementation directly: [`ArchiveDecoder`] turns bytes
//! into a [`PartSource`], and a [`PartSource`] answers entry lookups.

use crate::error::{Error, Result};
use quick_xml::events::Event;
use std::cell::RefCell;
use std::fmt;
use std::io::{Cursor, Read};

/// Archive path of the core document properties part.
pub const CORE_PROPERTIES_PATH: &str = "docProps/core.xml";

/// Directory holding the slide bodies.
pub const SLIDES_PREFIX: &str = "ppt/slides/";

/// Read-only view over the entries of an opened package.
pub trait PartSource {
    /// All entry paths, in archive order.
    fn entry_names(&self) -> Vec<String>;

    /// Raw bytes of an entry.
    fn read_binary(&self, path: &str) -> Result<Vec<u8>>;

    /// Whether an entry with this exact path exists.
    fn contains(&self, path: &str) -> bool {
        self.entry_names().iter().any(|name| name == path)
    }

    /// Decoded text of an entry.
    fn read_text(&self, path: &str) -> Result<String> {
        let bytes = self.read_binary(path)?;
        decode_xml_bytes(&bytes)
    }

    /// Entry paths that start with `prefix` and end with `suffix`.
    fn list_matching(&self, prefix: &str, suffix: &str) -> Vec<String> {
        self.entry_names()
            .into_iter()
            .filter(|name| name.starts_with(prefix) && name.ends_with(suffix))
            .collect()
    }

    /// Slide body entries (`ppt/slides/*.xml`), skipping relationship parts.
    fn slide_entries(&self) -> Vec<String> {
        self.list_matching(SLIDES_PREFIX, ".xml")
            .into_iter()
            .filter(|name| !name.contains("_rels"))
            .collect()
    }

    /// Presentation title recorded in `docProps/core.xml`, if any.
    fn core_title(&self) -> Option<String> {
        if !self.contains(CORE_PROPERTIES_PATH) {
            return None;
        }
        let parsed = self
            .read_text(CORE_PROPERTIES_PATH)
            .and_then(|xml| parse_core_title(&xml));
        match parsed {
            Ok(title) => title,
            Err(e) => {
                log::warn!("Could not read presentation properties: {}", e);
                None
            }
        }
    }
}

/// Opens reassembled package bytes.
pub trait ArchiveDecoder: Send + Sync {
    /// Decode `data` into a part source, or fail with [`Error::ArchiveFormat`].
    fn open(&self, data: Vec<u8>) -> Result<Box<dyn PartSource>>;
}

/// [`ArchiveDecoder`] backed by the `zip` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipDecoder;

impl ArchiveDecoder for ZipDecoder {
    fn open(&self, data: Vec<u8>) -> Result<Box<dyn PartSource>> {
        Ok(Box::new(OoxmlArchive::from_bytes(data)?))
    }
}

/// An in-memory OOXML package.
pub struct OoxmlArchive {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl OoxmlArchive {
    /// Open a package from its complete byte content.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Number of entries in the package.
    pub fn len(&self) -> usize {
        self.archive.borrow().len()
    }

    /// Whether the package has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PartSource for OoxmlArchive {
    fn entry_names(&self) -> Vec<String> {
        let archive = self.archive.borrow();
        archive.file_names().map(String::from).collect()
    }

    fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    fn contains(&self, path: &str) -> bool {
        let archive = self.archive.borrow();
        let found = archive.file_names().any(|n| n == path);
        found
    }
}

impl fmt::Debug for OoxmlArchive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OoxmlArchive")
            .field("entries", &self.len())
            .finish()
    }
}

/// Extract the title from core properties XML.
///
/// The first `dc:title` element wins; packages written without the Dublin
/// Core prefix are matched on a bare `title` element instead. Empty titles
/// count as absent.
pub fn parse_core_title(xml: &str) -> Result<Option<String>> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    // Some(true) while inside `dc:title`, Some(false) inside a bare `title`.
    let mut inside: Option<bool> = None;
    let mut prefixed: Option<String> = None;
    let mut bare: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                inside = match e.name().as_ref() {
                    b"dc:title" if prefixed.is_none() => {
                        prefixed = Some(String::new());
                        Some(true)
                    }
                    b"title" if bare.is_none() => {
                        bare = Some(String::new());
                        Some(false)
                    }
                    _ => None,
                };
            }
            Event::Text(e) => {
                let slot = match inside {
                    Some(true) => prefixed.as_mut(),
                    Some(false) => bare.as_mut(),
                    None => None,
                };
                if let Some(slot) = slot {
                    slot.push_str(&e.unescape().unwrap_or_default());
                }
            }
            Event::End(_) => inside = None,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(prefixed.or(bare).filter(|t| !t.trim().is_empty()))
}

/// Decode XML bytes handling UTF-8 and UTF-16 (LE/BE) encodings.
///
/// A byte order mark decides the encoding when present. Without one, UTF-8
/// is tried first, then UTF-16 is guessed from NUL byte positions.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8(rest.to_vec()).map_err(|e| Error::Encoding(e.to_string()));
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return decode_utf16(rest, u16::from_le_bytes).map(|s| relabel_utf16_declaration(&s));
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return decode_utf16(rest, u16::from_be_bytes).map(|s| relabel_utf16_declaration(&s));
    }

    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => Ok(s),
        Err(_) if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 => {
            decode_utf16(bytes, u16::from_le_bytes)
        }
        Err(_) if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 => {
            decode_utf16(bytes, u16::from_be_bytes)
        }
        Err(_) => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::Encoding(e.to_string()))
}

/// The text is UTF-8 once decoded; the declaration must stop claiming UTF-16
/// or the XML reader will try to transcode it again.
fn relabel_utf16_declaration(content: &str) -> String {
    if !content.starts_with("<?xml") {
        return content.to_string();
    }
    let Some(end) = content.find("?>") else {
        return content.to_string();
    };
    let (decl, rest) = content.split_at(end + 2);
    let decl = ["\"UTF-16\"", "'UTF-16'", "\"utf-16\"", "'utf-16'"]
        .iter()
        .fold(decl.to_string(), |acc, quoted| {
            acc.replace(&format!("encoding={}", quoted), "encoding=\"UTF-8\"")
        });
    format!("{}{}", decl, rest)
}
