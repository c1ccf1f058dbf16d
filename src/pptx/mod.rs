//! PowerPoint slide handling.
//!
//! [`locator`] decides which `ppt/slides/slideN.xml` entry answers a
//! host-reported slide index, and [`extract`] turns that entry's markup into
//! paragraph records and markdown lines.

pub mod extract;
pub mod locator;

pub use extract::{parse_paragraphs, SlideExtractor, StructuredExtractor};
pub use locator::{candidate_paths, slide_path, Located, SlideLocator};
