//! The assembled, request-scoped result of one slide extraction.

use serde::{Deserialize, Serialize};

/// How a slide entry was chosen by the locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// `slide{n}.xml` for the host-reported index `n`
    Exact,
    /// `slide{n-1}.xml` or `slide{n+1}.xml`
    Adjacent,
    /// `slide1.xml`, tried when nothing closer was usable
    Default,
    /// The first slide entry in archive order
    FirstAvailable,
}

impl MatchKind {
    /// Only an exact index hit is trusted.
    pub fn is_confident(&self) -> bool {
        matches!(self, MatchKind::Exact)
    }
}

/// The archive entry a slide's content was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideMatch {
    /// Archive path, e.g. `ppt/slides/slide3.xml`
    pub path: String,
    /// Which rule produced the match
    pub kind: MatchKind,
}

impl SlideMatch {
    /// Create a match record.
    pub fn new(path: impl Into<String>, kind: MatchKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Whether the match is trusted to be the requested slide.
    pub fn is_confident(&self) -> bool {
        self.kind.is_confident()
    }
}

/// Everything gathered for one document-content request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideContext {
    /// Presentation title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Host-reported slide index
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slide_index: Option<u32>,

    /// Text currently selected in the host
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_text: Option<String>,

    /// Entry the slide content came from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slide: Option<SlideMatch>,

    /// Structured slide text, one line per paragraph
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// The package bytes were fetched and opened as an archive
    #[serde(default)]
    pub package_read: bool,

    /// Host-provided text used when the package path produced nothing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

impl SlideContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether structured slide content was extracted from the package.
    pub fn has_slide_content(&self) -> bool {
        self.content.as_deref().is_some_and(|c| !c.trim().is_empty())
    }

    /// Whether the "could not find slide" notice applies.
    pub fn slide_missing(&self) -> bool {
        self.package_read && !self.has_slide_content()
    }

    /// Whether the context carries nothing worth attaching.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.slide_index.is_none()
            && self.selected_text.is_none()
            && !self.has_slide_content()
            && !self.package_read
            && self.fallback.is_none()
    }
}
