//! Error types for the unslide library.

use std::io;
use thiserror::Error;

/// Result type alias for unslide operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fetching and decoding slide content.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The bytes are not a recognizable Office package.
    #[error("Unknown file format")]
    UnknownFormat,

    /// The package is recognized but is not what the caller asked for.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The reassembled bytes are not a readable ZIP archive.
    #[error("Archive format error: {0}")]
    ArchiveFormat(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// A required archive entry is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// Error during text encoding conversion.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The host refused to open the file or deliver a slice.
    #[error("Host transport error: {0}")]
    HostTransport(String),

    /// The host reported a slice index outside the announced slice count.
    #[error("Slice index {index} out of range (slice count {count})")]
    SliceOutOfRange { index: u32, count: u32 },

    /// A slice position was never filled after all requests completed.
    #[error("Slice {0} was never delivered")]
    MissingSlice(u32),

    /// The host did not answer a slice request in time.
    #[error("Timed out waiting for slice {0}")]
    SliceTimeout(u32),

    /// Error during rendering.
    #[error("Render error: {0}")]
    Render(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ArchiveFormat(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(format!("JSON serialization error: {}", err))
    }
}

impl Error {
    /// Whether this error came from the host transfer rather than the package.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::HostTransport(_)
                | Error::SliceOutOfRange { .. }
                | Error::MissingSlice(_)
                | Error::SliceTimeout(_)
        )
    }
}
