//! Shared fixtures: in-memory PPTX packages and a scriptable host.

#![allow(dead_code)]

use async_trait::async_trait;
use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use unslide::{Error, HostDocument, HostFile, Result, Slice};
use zip::write::SimpleFileOptions;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
</Types>"#;

/// Builds a minimal presentation package.
#[derive(Default)]
pub struct PptxBuilder {
    entries: Vec<(String, String)>,
}

impl PptxBuilder {
    pub fn new() -> Self {
        Self::default().entry("[Content_Types].xml", CONTENT_TYPES)
    }

    pub fn entry(mut self, path: &str, body: &str) -> Self {
        self.entries.push((path.to_string(), body.to_string()));
        self
    }

    pub fn title(self, title: &str) -> Self {
        let core = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties"
                   xmlns:dc="http://purl.org/dc/elements/1.1/">
  <dc:title>{}</dc:title>
  <dc:creator>Fixture</dc:creator>
</cp:coreProperties>"#,
            title
        );
        self.entry("docProps/core.xml", &core)
    }

    /// Add `ppt/slides/slide{n}.xml` holding the given `a:p` elements.
    pub fn slide(self, n: u32, paragraphs: &[String]) -> Self {
        self.entry(&format!("ppt/slides/slide{}.xml", n), &slide_xml(paragraphs))
    }

    pub fn build(self) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (path, body) in &self.entries {
            zip.start_file(path.as_str(), SimpleFileOptions::default())
                .unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }
}

pub fn slide_xml(paragraphs: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
       xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld><p:spTree><p:sp><p:txBody><a:bodyPr/>{}</p:txBody></p:sp></p:spTree></p:cSld>
</p:sld>"#,
        paragraphs.concat()
    )
}

/// A plain paragraph.
pub fn para(text: &str) -> String {
    format!("<a:p><a:r><a:t>{}</a:t></a:r></a:p>", text)
}

/// A bulleted paragraph at `level`.
pub fn bullet(text: &str, level: u8) -> String {
    format!(
        r#"<a:p><a:pPr lvl="{}"><a:buChar char="•"/></a:pPr><a:r><a:t>{}</a:t></a:r></a:p>"#,
        level, text
    )
}

/// An auto-numbered paragraph at `level`.
pub fn numbered(text: &str, level: u8) -> String {
    format!(
        r#"<a:p><a:pPr lvl="{}"><a:buAutoNum type="arabicPeriod"/></a:pPr><a:r><a:t>{}</a:t></a:r></a:p>"#,
        level, text
    )
}

/// Call counters shared between a [`MockHost`] and the files it opens.
#[derive(Debug, Default)]
pub struct Stats {
    pub opens: AtomicUsize,
    pub slice_calls: AtomicUsize,
    pub closes: AtomicUsize,
    pub active: AtomicUsize,
    pub max_active: AtomicUsize,
}

impl Stats {
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn slice_calls(&self) -> usize {
        self.slice_calls.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

/// A host whose file transfer can be delayed, reordered or broken.
#[derive(Clone, Default)]
pub struct MockHost {
    data: Arc<Vec<u8>>,
    slice_count: Option<u32>,
    fail_at: Option<u32>,
    fail_open: bool,
    reverse: bool,
    delay: Option<Duration>,
    slide_index: Option<u32>,
    view_index: Option<u32>,
    title: Option<String>,
    selected: Option<String>,
    fallback: Option<String>,
    pub stats: Arc<Stats>,
}

impl MockHost {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data: Arc::new(data),
            ..Default::default()
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Report this many slices regardless of the data length.
    pub fn with_slice_count(mut self, count: u32) -> Self {
        self.slice_count = Some(count);
        self
    }

    /// Fail the request for slice `index`.
    pub fn failing_at(mut self, index: u32) -> Self {
        self.fail_at = Some(index);
        self
    }

    /// Refuse to open the file at all.
    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Answer request `i` with slice `count - 1 - i`.
    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Delay each answer; earlier requests wait longer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_slide_index(mut self, index: u32) -> Self {
        self.slide_index = Some(index);
        self
    }

    pub fn with_view_index(mut self, index: u32) -> Self {
        self.view_index = Some(index);
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_selected_text(mut self, text: &str) -> Self {
        self.selected = Some(text.to_string());
        self
    }

    pub fn with_fallback_text(mut self, text: &str) -> Self {
        self.fallback = Some(text.to_string());
        self
    }
}

#[async_trait]
impl HostDocument for MockHost {
    async fn open_file(&self, slice_size: u32) -> Result<Box<dyn HostFile>> {
        if self.fail_open {
            return Err(Error::HostTransport("document is busy".to_string()));
        }
        self.stats.opens.fetch_add(1, Ordering::SeqCst);
        let active = self.stats.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.max_active.fetch_max(active, Ordering::SeqCst);

        let slice_size = slice_size.max(1) as usize;
        let count = self
            .slice_count
            .unwrap_or_else(|| self.data.len().div_ceil(slice_size) as u32);
        Ok(Box::new(MockFile {
            data: Arc::clone(&self.data),
            slice_size,
            count,
            fail_at: self.fail_at,
            reverse: self.reverse,
            delay: self.delay,
            stats: Arc::clone(&self.stats),
        }))
    }

    async fn active_slide_index(&self) -> Option<u32> {
        self.slide_index
    }

    async fn active_view_index(&self) -> Option<u32> {
        self.view_index
    }

    async fn document_title(&self) -> Option<String> {
        self.title.clone()
    }

    async fn selected_text(&self) -> Option<String> {
        self.selected.clone()
    }

    async fn fallback_slide_text(&self) -> Option<String> {
        self.fallback.clone()
    }
}

struct MockFile {
    data: Arc<Vec<u8>>,
    slice_size: usize,
    count: u32,
    fail_at: Option<u32>,
    reverse: bool,
    delay: Option<Duration>,
    stats: Arc<Stats>,
}

#[async_trait]
impl HostFile for MockFile {
    fn slice_count(&self) -> u32 {
        self.count
    }

    async fn slice(&mut self, index: u32) -> Result<Slice> {
        self.stats.slice_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay * (self.count - index)).await;
        }
        if self.fail_at == Some(index) {
            return Err(Error::HostTransport(format!("slice {} unavailable", index)));
        }

        let actual = if self.reverse {
            self.count - 1 - index
        } else {
            index
        };
        let start = (actual as usize * self.slice_size).min(self.data.len());
        let end = (start + self.slice_size).min(self.data.len());
        Ok(Slice::new(actual, self.data[start..end].to_vec()))
    }

    async fn close(&mut self) {
        self.stats.closes.fetch_add(1, Ordering::SeqCst);
        self.stats.active.fetch_sub(1, Ordering::SeqCst);
    }
}
