//! A [`HostDocument`] backed by bytes on this machine.
//!
//! Used by the command-line tool to drive the same sliced download path the
//! Office host uses, and handy as a fixture.

use super::{HostDocument, HostFile, Slice};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// A local document with optional host-style view information.
#[derive(Debug, Clone, Default)]
pub struct LocalDocument {
    data: Arc<Vec<u8>>,
    slide_index: Option<u32>,
    title: Option<String>,
    selected_text: Option<String>,
    fallback_text: Option<String>,
}

impl LocalDocument {
    /// Wrap complete file bytes.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            data: Arc::new(data),
            ..Default::default()
        }
    }

    /// Read a file from disk.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = tokio::fs::read(path.as_ref()).await?;
        Ok(Self::from_bytes(data))
    }

    /// Report `index` as the active slide.
    pub fn with_slide_index(mut self, index: u32) -> Self {
        self.slide_index = Some(index);
        self
    }

    /// Report `title` as the document property title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Report `text` as the current selection.
    pub fn with_selected_text(mut self, text: impl Into<String>) -> Self {
        self.selected_text = Some(text.into());
        self
    }

    /// Answer fallback slide-text requests with `text`.
    pub fn with_fallback_text(mut self, text: impl Into<String>) -> Self {
        self.fallback_text = Some(text.into());
        self
    }

    /// Size of the document in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the document is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[async_trait]
impl HostDocument for LocalDocument {
    async fn open_file(&self, slice_size: u32) -> Result<Box<dyn HostFile>> {
        Ok(Box::new(SlicedFile::new(Arc::clone(&self.data), slice_size)))
    }

    async fn active_slide_index(&self) -> Option<u32> {
        self.slide_index
    }

    async fn document_title(&self) -> Option<String> {
        self.title.clone()
    }

    async fn selected_text(&self) -> Option<String> {
        self.selected_text.clone()
    }

    async fn fallback_slide_text(&self) -> Option<String> {
        self.fallback_text.clone()
    }
}

/// In-memory bytes served as fixed-size slices.
#[derive(Debug)]
pub struct SlicedFile {
    data: Arc<Vec<u8>>,
    slice_size: usize,
    closed: bool,
}

impl SlicedFile {
    /// Split `data` into `slice_size` chunks (the last one may be shorter).
    pub fn new(data: Arc<Vec<u8>>, slice_size: u32) -> Self {
        Self {
            data,
            slice_size: slice_size.max(1) as usize,
            closed: false,
        }
    }

    /// Whether [`HostFile::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[async_trait]
impl HostFile for SlicedFile {
    fn slice_count(&self) -> u32 {
        self.data.len().div_ceil(self.slice_size) as u32
    }

    async fn slice(&mut self, index: u32) -> Result<Slice> {
        if self.closed {
            return Err(Error::HostTransport("file handle already closed".to_string()));
        }
        let start = index as usize * self.slice_size;
        if start >= self.data.len() {
            return Err(Error::HostTransport(format!("no slice at index {}", index)));
        }
        let end = (start + self.slice_size).min(self.data.len());
        Ok(Slice::new(index, self.data[start..end].to_vec()))
    }

    async fn close(&mut self) {
        self.closed = true;
    }
}
