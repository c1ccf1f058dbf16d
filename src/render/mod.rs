//! Output rendering for extracted slide content.
//!
//! # Example
//!
//! ```
//! use unslide::render::{to_json, to_markdown, JsonFormat};
//! use unslide::SlideContext;
//!
//! let mut ctx = SlideContext::new();
//! ctx.title = Some("Roadmap".to_string());
//! ctx.slide_index = Some(2);
//!
//! let md = to_markdown(&ctx);
//! assert!(md.starts_with("## Presentation Title: Roadmap\n"));
//!
//! let json = to_json(&ctx, JsonFormat::Compact)?;
//! assert!(json.contains("\"slide_index\":2"));
//! # Ok::<(), unslide::Error>(())
//! ```

mod json;
pub mod markdown;

pub use json::{to_json, JsonFormat};
pub use markdown::{
    filter_repeated_headers, render_paragraph, render_paragraphs, to_markdown, CURRENT_SLIDE_HEADER,
    PRESENTATION_TITLE_HEADER, SELECTED_TEXT_HEADER, SLIDE_CONTENT_HEADER, SLIDE_NOT_FOUND_NOTICE,
};
