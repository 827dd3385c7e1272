//! JSON rendering for layout documents.

use crate::error::{Error, Result};
use crate::model::LayoutDocument;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document to JSON. Image bytes are not included.
pub fn to_json(doc: &LayoutDocument, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, ParagraphBlock};

    #[test]
    fn test_to_json_pretty() {
        let mut doc = LayoutDocument::new();
        doc.metadata.title = Some("Test".to_string());
        doc.blocks.push(Block::Paragraph(ParagraphBlock::new("Hello", 12.0)));

        let json = to_json(&doc, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\""));
        assert!(json.contains("\"type\": \"paragraph\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let mut doc = LayoutDocument::new();
        doc.blocks.push(Block::PageBreak);

        let json = to_json(&doc, JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains(r#"{"type":"page_break"}"#));
    }
}
