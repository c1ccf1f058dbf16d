//! Markdown rendering of slide paragraphs and assembled contexts.

use crate::model::{ParagraphRecord, SlideContext};
use regex::Regex;
use std::sync::LazyLock;

/// Header carrying the presentation title.
pub const PRESENTATION_TITLE_HEADER: &str = "## Presentation Title:";
/// Header carrying the host-reported slide index.
pub const CURRENT_SLIDE_HEADER: &str = "## Current Slide:";
/// Header carrying the host selection.
pub const SELECTED_TEXT_HEADER: &str = "## Selected Text:";
/// Header introducing the extracted slide lines.
pub const SLIDE_CONTENT_HEADER: &str = "## Slide Content:";
/// Inline notice for a package without a usable slide entry.
pub const SLIDE_NOT_FOUND_NOTICE: &str = "Could not find slide XML data.";

/// Text that already starts with a bullet glyph and a space.
static BULLET_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-•·○◦*]\s").unwrap());

/// Text that already starts with a list number, e.g. `3. ` or `12) `.
static NUMBER_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+[.)]\s").unwrap());

/// Render one paragraph as a markdown line, or `None` when it has no text.
///
/// Markers already typed into the text are respected: a leading bullet glyph
/// is normalized to `-`, a leading number is kept as written. Numbered items
/// are always emitted as `1.`; markdown renumbers them.
pub fn render_paragraph(para: &ParagraphRecord) -> Option<String> {
    if para.is_empty() {
        return None;
    }
    let text = para.text.as_str();
    let indent = para.list.indent();

    let line = if BULLET_PREFIX.is_match(text) {
        format!("{}- {}", indent, BULLET_PREFIX.replace(text, ""))
    } else if NUMBER_PREFIX.is_match(text) {
        format!("{}{}", indent, text)
    } else if para.list.is_numbered() {
        format!("{}1. {}", indent, text)
    } else if para.list.is_list() {
        format!("{}- {}", indent, text)
    } else {
        text.to_string()
    };
    Some(line)
}

/// Render paragraphs as newline-joined markdown lines, skipping empty ones.
pub fn render_paragraphs(paragraphs: &[ParagraphRecord]) -> String {
    paragraphs
        .iter()
        .filter_map(render_paragraph)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render an assembled context. Absent pieces leave out their header.
pub fn to_markdown(ctx: &SlideContext) -> String {
    let mut output = String::new();

    if let Some(ref title) = ctx.title {
        output.push_str(&format!("{} {}\n", PRESENTATION_TITLE_HEADER, title));
    }
    if let Some(index) = ctx.slide_index {
        output.push_str(&format!("{} {}\n\n", CURRENT_SLIDE_HEADER, index));
    }
    if let Some(ref selected) = ctx.selected_text {
        output.push_str(&format!("{} {}\n", SELECTED_TEXT_HEADER, selected));
    }

    match ctx.content.as_deref() {
        Some(content) if ctx.has_slide_content() => {
            output.push_str(SLIDE_CONTENT_HEADER);
            output.push('\n');
            output.push_str(content);
            output.push('\n');
        }
        _ if ctx.slide_missing() => {
            output.push_str(SLIDE_NOT_FOUND_NOTICE);
            output.push('\n');
        }
        _ => {}
    }

    if let Some(ref fallback) = ctx.fallback {
        output.push_str(fallback);
        if !fallback.ends_with('\n') {
            output.push('\n');
        }
    }

    output
}

/// Drop lines of host-provided text that would repeat headers already in `ctx`.
///
/// Lines are matched with or without the leading `## `.
pub fn filter_repeated_headers(text: &str, ctx: &SlideContext) -> String {
    let mut repeated: Vec<&str> = Vec::new();
    if ctx.title.is_some() {
        repeated.push(PRESENTATION_TITLE_HEADER);
    }
    if ctx.slide_index.is_some() {
        repeated.push(CURRENT_SLIDE_HEADER);
    }
    if ctx.selected_text.is_some() {
        repeated.push(SELECTED_TEXT_HEADER);
    }

    text.lines()
        .filter(|line| {
            let line = line.trim_start();
            !repeated.iter().any(|header| {
                line.starts_with(header) || line.starts_with(header.trim_start_matches("## "))
            })
        })
        .collect::<Vec<_>>()
        .join("\n")
}
