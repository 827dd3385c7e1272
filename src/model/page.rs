//! Output blocks and per-page layouts.

use super::{ExtractedImage, ParagraphBlock, Table};
use serde::{Deserialize, Serialize};

/// A content block in the reconstructed stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A paragraph or heading
    Paragraph(ParagraphBlock),

    /// A detected table
    Table(Table),

    /// An image cropped from the page raster
    Image(ExtractedImage),

    /// Explicit break between two pages
    PageBreak,
}

impl Block {
    /// Check if this block is a paragraph (headings included).
    pub fn is_paragraph(&self) -> bool {
        matches!(self, Block::Paragraph(_))
    }

    /// Check if this block is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, Block::Table(_))
    }

    /// Check if this block is an image.
    pub fn is_image(&self) -> bool {
        matches!(self, Block::Image(_))
    }

    /// Check if this block is a page break.
    pub fn is_page_break(&self) -> bool {
        matches!(self, Block::PageBreak)
    }

    /// Get the paragraph if this block is one.
    pub fn as_paragraph(&self) -> Option<&ParagraphBlock> {
        match self {
            Block::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    /// Get the table if this block is one.
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Block::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Get the image if this block is one.
    pub fn as_image(&self) -> Option<&ExtractedImage> {
        match self {
            Block::Image(i) => Some(i),
            _ => None,
        }
    }
}

/// The reconstructed content of a single page, before page breaks are
/// inserted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    /// Paragraphs in reading order
    pub paragraphs: Vec<ParagraphBlock>,

    /// Detected tables
    pub tables: Vec<Table>,

    /// Images in discovery order
    pub images: Vec<ExtractedImage>,
}

impl PageLayout {
    /// Check if the page produced no content.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty() && self.tables.is_empty() && self.images.is_empty()
    }

    /// Flatten into blocks: paragraphs, then tables, then images.
    pub fn into_blocks(self) -> Vec<Block> {
        let mut blocks =
            Vec::with_capacity(self.paragraphs.len() + self.tables.len() + self.images.len());
        blocks.extend(self.paragraphs.into_iter().map(Block::Paragraph));
        blocks.extend(self.tables.into_iter().map(Block::Table));
        blocks.extend(self.images.into_iter().map(Block::Image));
        blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_variants() {
        let para = Block::Paragraph(ParagraphBlock::new("text", 12.0));
        assert!(para.is_paragraph());
        assert!(!para.is_table());
        assert_eq!(para.as_paragraph().map(|p| p.text.as_str()), Some("text"));
        assert!(Block::PageBreak.is_page_break());
        assert!(Block::PageBreak.as_image().is_none());
    }

    #[test]
    fn test_page_layout_order() {
        let layout = PageLayout {
            paragraphs: vec![ParagraphBlock::new("a", 12.0)],
            tables: vec![Table::from_grid(vec![vec!["x".to_string()]], vec![0.0])],
            images: Vec::new(),
        };
        assert!(!layout.is_empty());

        let blocks = layout.into_blocks();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].is_paragraph());
        assert!(blocks[1].is_table());
    }

    #[test]
    fn test_page_break_serializes_with_tag() {
        let json = serde_json::to_string(&Block::PageBreak).unwrap();
        assert_eq!(json, r#"{"type":"page_break"}"#);
    }
}
