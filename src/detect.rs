//! Package kind detection for reassembled Office files.

use crate::container::{OoxmlArchive, PartSource};
use crate::error::{Error, Result};

/// ZIP local file header magic: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

const CONTENT_TYPES_PATH: &str = "[Content_Types].xml";

const PRESENTATION_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";

const WORD_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

const WORKBOOK_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";

/// Kind of OOXML package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    /// PowerPoint presentation (.pptx)
    Presentation,
    /// Word document (.docx)
    WordDocument,
    /// Excel workbook (.xlsx)
    Workbook,
}

impl PackageKind {
    /// Usual file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            PackageKind::Presentation => "pptx",
            PackageKind::WordDocument => "docx",
            PackageKind::Workbook => "xlsx",
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            PackageKind::Presentation => "PowerPoint Presentation",
            PackageKind::WordDocument => "Word Document",
            PackageKind::Workbook => "Excel Workbook",
        }
    }
}

impl std::fmt::Display for PackageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Whether the bytes start with a ZIP local file header.
pub fn is_zip_stream(data: &[u8]) -> bool {
    data.starts_with(&ZIP_MAGIC)
}

/// Detect the package kind of complete file bytes.
pub fn detect_package(data: &[u8]) -> Result<PackageKind> {
    if !is_zip_stream(data) {
        return Err(Error::UnknownFormat);
    }
    let archive = OoxmlArchive::from_bytes(data.to_vec())?;
    detect_package_in(&archive)
}

/// Detect the package kind of an already opened archive.
///
/// `[Content_Types].xml` decides when it names a main part; otherwise the
/// top-level folder layout is used.
pub fn detect_package_in(source: &dyn PartSource) -> Result<PackageKind> {
    if source.contains(CONTENT_TYPES_PATH) {
        let content_types = source.read_text(CONTENT_TYPES_PATH)?;
        if content_types.contains(PRESENTATION_CONTENT_TYPE) {
            return Ok(PackageKind::Presentation);
        }
        if content_types.contains(WORD_CONTENT_TYPE) {
            return Ok(PackageKind::WordDocument);
        }
        if content_types.contains(WORKBOOK_CONTENT_TYPE) {
            return Ok(PackageKind::Workbook);
        }
    }

    let names = source.entry_names();
    let has = |prefix: &str| names.iter().any(|n| n.starts_with(prefix));
    match (has("ppt/"), has("word/"), has("xl/")) {
        (true, false, false) => Ok(PackageKind::Presentation),
        (false, true, false) => Ok(PackageKind::WordDocument),
        (false, false, true) => Ok(PackageKind::Workbook),
        _ => Err(Error::UnknownFormat),
    }
}
