//! Data model for extracted slide content.

mod context;
mod paragraph;

pub use context::{MatchKind, SlideContext, SlideMatch};
pub use paragraph::{ListInfo, ListType, ParagraphRecord, DEFAULT_BULLET};
