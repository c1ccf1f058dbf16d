//! Host document access.
//!
//! The Office host hands out the open document as a compressed file read in
//! slices, and answers a few best-effort questions about the current view.
//! Both are modelled as traits so the pipeline can run against the real host
//! bridge, a local file ([`local::LocalDocument`]) or a test double.

pub mod fetch;
pub mod local;

use crate::error::Result;
use async_trait::async_trait;

pub use fetch::ChunkedFetcher;
pub use local::{LocalDocument, SlicedFile};

/// One chunk of the compressed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice {
    /// Position of this chunk within the file
    pub index: u32,
    /// Raw bytes
    pub data: Vec<u8>,
}

impl Slice {
    /// Create a slice.
    pub fn new(index: u32, data: Vec<u8>) -> Self {
        Self { index, data }
    }
}

/// An open host file handle delivering the document in slices.
///
/// The handle holds a native host resource and must be closed once the
/// caller is done with it, whether or not every slice was read.
#[async_trait]
pub trait HostFile: Send {
    /// Number of slices the file was split into.
    fn slice_count(&self) -> u32;

    /// Fetch the slice at `index`.
    async fn slice(&mut self, index: u32) -> Result<Slice>;

    /// Release the handle.
    async fn close(&mut self);
}

/// The document currently open in the host application.
///
/// Everything except [`HostDocument::open_file`] is best effort: an answer
/// the host cannot give is `None`, never an error.
#[async_trait]
pub trait HostDocument: Send + Sync {
    /// Open the document as a compressed file split into `slice_size` chunks.
    async fn open_file(&self, slice_size: u32) -> Result<Box<dyn HostFile>>;

    /// Index of the slide in the current selection.
    async fn active_slide_index(&self) -> Option<u32> {
        None
    }

    /// Index of the slide shown in the active view.
    async fn active_view_index(&self) -> Option<u32> {
        None
    }

    /// Title from the host's document properties.
    async fn document_title(&self) -> Option<String> {
        None
    }

    /// Text currently selected by the user.
    async fn selected_text(&self) -> Option<String> {
        None
    }

    /// Slide text obtained through the host's own object model.
    async fn fallback_slide_text(&self) -> Option<String> {
        None
    }
}
