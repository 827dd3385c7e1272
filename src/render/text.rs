//! Plain text rendering for layout documents.

use crate::error::Result;
use crate::model::{Block, LayoutDocument};

/// Form feed, emitted for page breaks.
const PAGE_BREAK: &str = "\u{000C}";

/// Convert a document to plain text.
///
/// Paragraphs are separated by blank lines, tables are tab-separated and
/// page breaks become form feeds. Images are omitted.
pub fn to_text(doc: &LayoutDocument) -> Result<String> {
    let mut parts: Vec<String> = Vec::new();

    for block in &doc.blocks {
        match block {
            Block::Paragraph(p) if !p.is_empty() => parts.push(p.text.trim().to_string()),
            Block::Table(t) if !t.is_empty() => parts.push(t.plain_text()),
            Block::PageBreak => parts.push(PAGE_BREAK.to_string()),
            _ => {}
        }
    }

    Ok(parts.join("\n\n").trim_matches('\n').to_string())
}
