//! Slide context assembly.
//!
//! One call gathers what the host knows (slide index, selection, title),
//! downloads the package, locates and extracts the slide, and falls back to
//! the host's own slide text when the package path produced nothing.
//! Failures along the way are logged and absorbed; the caller always gets a
//! [`SlideContext`], possibly empty.

use crate::container::{ArchiveDecoder, PartSource, ZipDecoder};
use crate::error::Result;
use crate::host::{ChunkedFetcher, HostDocument};
use crate::model::SlideContext;
use crate::options::ExtractOptions;
use crate::pptx::{Located, SlideExtractor, SlideLocator, StructuredExtractor};
use crate::render::{filter_repeated_headers, to_markdown};

/// What the package itself contributed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageContent {
    /// Title from `docProps/core.xml`
    pub title: Option<String>,
    /// Extracted slide lines and the entry they came from
    pub located: Option<Located<String>>,
}

/// Builds [`SlideContext`]s from a host document.
///
/// The ZIP decoder and slide extractor are fixed when the assembler is
/// built; [`SlideContextAssembler::new`] picks the defaults.
#[derive(Debug, Clone, Default)]
pub struct SlideContextAssembler<D = ZipDecoder, X = StructuredExtractor> {
    decoder: D,
    extractor: X,
    options: ExtractOptions,
}

impl SlideContextAssembler {
    /// Assembler using the `zip` decoder and the structured extractor.
    pub fn new(options: ExtractOptions) -> Self {
        Self::with_components(ZipDecoder, StructuredExtractor, options)
    }
}

impl<D: ArchiveDecoder, X: SlideExtractor> SlideContextAssembler<D, X> {
    /// Assembler with caller-supplied decoder and extractor.
    pub fn with_components(decoder: D, extractor: X, options: ExtractOptions) -> Self {
        Self {
            decoder,
            extractor,
            options,
        }
    }

    /// Options in effect.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Open package bytes, read the title, and extract the best slide.
    pub fn read_package(&self, data: Vec<u8>, target: Option<u32>) -> Result<PackageContent> {
        let source = self.decoder.open(data)?;
        log::debug!("Available slide files: {:?}", source.slide_entries());
        Ok(self.read_source(source.as_ref(), target))
    }

    /// Title and best slide of an already opened archive.
    pub fn read_source(&self, source: &dyn PartSource, target: Option<u32>) -> PackageContent {
        let title = source.core_title();
        let located = SlideLocator::new(source, &self.options).locate_with(target, |xml| {
            let content = self.extractor.extract(xml)?;
            Ok(content.filter(|c| !c.trim().is_empty()))
        });
        PackageContent { title, located }
    }

    /// Build a context from package bytes alone, with no host to ask.
    pub fn assemble_bytes(&self, data: Vec<u8>, target: Option<u32>) -> SlideContext {
        let target = non_zero(target);
        let mut ctx = SlideContext {
            slide_index: target,
            ..Default::default()
        };
        self.apply_package(&mut ctx, data, target);
        ctx
    }

    /// Build a context for the host's current slide.
    pub async fn assemble(&self, host: &dyn HostDocument) -> SlideContext {
        let mut ctx = SlideContext::new();

        ctx.selected_text = non_blank(host.selected_text().await);
        let host_title = non_blank(host.document_title().await);
        // The header follows the active view; the lookup follows the
        // selection. Each falls back to the other, and 0 means unknown.
        let selection_index = non_zero(host.active_slide_index().await);
        let view_index = non_zero(host.active_view_index().await);
        ctx.slide_index = view_index.or(selection_index);
        let target = selection_index.or(view_index);
        log::debug!("Host reports slide {:?} (selection {:?})", view_index, selection_index);

        let fetcher = ChunkedFetcher::new(&self.options);
        if let Some(data) = fetcher.fetch_document(host).await {
            self.apply_package(&mut ctx, data, target);
        }

        if ctx.title.is_none() {
            ctx.title = host_title;
        }

        if !ctx.has_slide_content() && self.options.host_fallback {
            log::debug!("Package gave no slide content, asking the host");
            if let Some(text) = host.fallback_slide_text().await {
                let merged = filter_repeated_headers(&text, &ctx);
                if !merged.trim().is_empty() {
                    ctx.fallback = Some(merged);
                }
            }
        }

        ctx
    }

    /// Build and render a context for the host's current slide.
    pub async fn assemble_text(&self, host: &dyn HostDocument) -> String {
        to_markdown(&self.assemble(host).await)
    }

    fn apply_package(&self, ctx: &mut SlideContext, data: Vec<u8>, target: Option<u32>) {
        match self.read_package(data, target) {
            Ok(package) => {
                ctx.package_read = true;
                ctx.title = package.title;
                if let Some(found) = package.located {
                    if !found.slide.is_confident() {
                        log::info!(
                            "Slide {:?} resolved to {} ({:?})",
                            target,
                            found.slide.path,
                            found.slide.kind
                        );
                    }
                    ctx.slide = Some(found.slide);
                    ctx.content = Some(found.value);
                }
            }
            Err(e) => log::warn!("Error processing OOXML: {}", e),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn non_zero(index: Option<u32>) -> Option<u32> {
    index.filter(|&i| i != 0)
}
