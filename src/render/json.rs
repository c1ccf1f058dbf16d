//! JSON renderer implementation.

use crate::error::Result;
use crate::model::SlideContext;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Convert a slide context to JSON.
pub fn to_json(ctx: &SlideContext, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(ctx)?,
        JsonFormat::Pretty => serde_json::to_string_pretty(ctx)?,
    };
    Ok(json)
}
