//! Paragraph records derived from slide markup.

use serde::{Deserialize, Serialize};

/// Default glyph recorded for bullets that do not name their own character.
pub const DEFAULT_BULLET: &str = "•";

/// List type for paragraphs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    #[default]
    None,
    /// Unordered (bulleted) list
    Bullet,
    /// Ordered (auto-numbered) list
    Numbered,
}

/// List information for a paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListInfo {
    /// Type of list
    pub list_type: ListType,
    /// Nesting level (0 = top level)
    pub level: u8,
    /// Bullet glyph declared by the markup, if it declared one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bullet_char: Option<String>,
}

impl ListInfo {
    /// Whether the paragraph renders as a list item.
    pub fn is_list(&self) -> bool {
        self.list_type != ListType::None
    }

    /// Whether the paragraph renders as a numbered list item.
    pub fn is_numbered(&self) -> bool {
        self.list_type == ListType::Numbered
    }

    /// Leading whitespace for this level, two spaces per level.
    pub fn indent(&self) -> String {
        "  ".repeat(usize::from(self.level))
    }
}

/// One `a:p` element reduced to its bare text and list formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphRecord {
    /// Space-joined text runs, trimmed
    pub text: String,
    /// List formatting
    #[serde(default)]
    pub list: ListInfo,
}

impl ParagraphRecord {
    /// A plain paragraph with no list formatting.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            list: ListInfo::default(),
        }
    }

    /// A list paragraph.
    pub fn list_item(text: impl Into<String>, list_type: ListType, level: u8) -> Self {
        Self {
            text: text.into(),
            list: ListInfo {
                list_type,
                level,
                bullet_char: None,
            },
        }
    }

    /// Whether the paragraph has any text to render.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
