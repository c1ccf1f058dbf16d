//! # unslide
//!
//! Current-slide context extraction from PowerPoint packages to Markdown.
//!
//! An Office host hands out the open presentation as a compressed file read
//! in slices. This library downloads those slices, opens the reassembled
//! package, finds the slide the user is looking at, and renders its text
//! (with list structure) together with the presentation title as a small
//! Markdown document meant to be attached to a chat prompt.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unslide::{slide_markdown, LocalDocument, SlideContextAssembler, ExtractOptions};
//!
//! // Straight from a file on disk
//! let md = slide_markdown("deck.pptx", Some(3))?;
//! println!("{}", md);
//!
//! // Through the sliced host path
//! # async fn run() -> unslide::Result<()> {
//! let host = LocalDocument::open("deck.pptx").await?.with_slide_index(3);
//! let assembler = SlideContextAssembler::new(ExtractOptions::default());
//! let ctx = assembler.assemble(&host).await;
//! println!("{}", unslide::render::to_markdown(&ctx));
//! # Ok(())
//! # }
//! # Ok::<(), unslide::Error>(())
//! ```
//!
//! Host failures never surface as errors from the assembly path: a slice
//! that cannot be read, an archive that cannot be opened or a slide that
//! cannot be parsed is logged and leaves its part of the output empty.

pub mod assemble;
pub mod container;
pub mod detect;
pub mod error;
pub mod host;
pub mod model;
pub mod options;
pub mod pptx;
pub mod render;
pub mod session;

// Re-exports
pub use assemble::{PackageContent, SlideContextAssembler};
pub use container::{ArchiveDecoder, OoxmlArchive, PartSource, ZipDecoder};
pub use detect::{detect_package, PackageKind};
pub use error::{Error, Result};
pub use host::{ChunkedFetcher, HostDocument, HostFile, LocalDocument, Slice};
pub use model::{ListInfo, ListType, MatchKind, ParagraphRecord, SlideContext, SlideMatch};
pub use options::ExtractOptions;
pub use pptx::{SlideExtractor, StructuredExtractor};
pub use session::{ChatSession, HostApp, SessionConfig};

use std::path::Path;

/// Build a slide context from complete package bytes.
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("deck.pptx")?;
/// let ctx = unslide::extract_slide(data, Some(2));
/// assert_eq!(ctx.slide_index, Some(2));
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn extract_slide(data: Vec<u8>, slide: Option<u32>) -> SlideContext {
    SlideContextAssembler::new(ExtractOptions::default()).assemble_bytes(data, slide)
}

/// Render one slide of a presentation file as Markdown.
///
/// Unlike the host path, this fails loudly: the file must exist and be a
/// PowerPoint package.
pub fn slide_markdown(path: impl AsRef<Path>, slide: Option<u32>) -> Result<String> {
    let data = std::fs::read(path.as_ref())?;
    let kind = detect_package(&data)?;
    if kind != PackageKind::Presentation {
        return Err(Error::UnsupportedFormat(kind.name().to_string()));
    }
    Ok(render::to_markdown(&extract_slide(data, slide)))
}

/// Assemble and render the host's current slide with default options.
pub async fn slide_context(host: &dyn HostDocument) -> String {
    SlideContextAssembler::new(ExtractOptions::default())
        .assemble_text(host)
        .await
}
