//! Rendering result with metadata and statistics.

use crate::model::{Block, LayoutDocument, Metadata};
use serde::{Deserialize, Serialize};

/// Result of rendering a document, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered content (Markdown, text, etc.)
    pub content: String,

    /// Document metadata (copied from source document)
    pub metadata: Metadata,

    /// Layout statistics
    pub stats: LayoutStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, metadata: Metadata, stats: LayoutStats) -> Self {
        Self {
            content,
            metadata,
            stats,
        }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Counts summarising a reconstructed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutStats {
    /// Number of pages processed
    pub page_count: u32,

    /// Number of body paragraphs
    pub paragraph_count: u32,

    /// Number of headings
    pub heading_count: u32,

    /// Number of tables
    pub table_count: u32,

    /// Number of images
    pub image_count: u32,

    /// Number of page breaks
    pub page_break_count: u32,

    /// Approximate word count of paragraph and table text
    pub word_count: u32,
}

impl LayoutStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics from a document.
    pub fn from_document(doc: &LayoutDocument) -> Self {
        let mut stats = Self {
            page_count: doc.page_count,
            ..Default::default()
        };
        for block in &doc.blocks {
            stats.add_block(block);
        }
        stats
    }

    /// Count one block.
    pub fn add_block(&mut self, block: &Block) {
        match block {
            Block::Paragraph(p) if p.is_heading() => {
                self.heading_count += 1;
                self.word_count += p.word_count() as u32;
            }
            Block::Paragraph(p) => {
                self.paragraph_count += 1;
                self.word_count += p.word_count() as u32;
            }
            Block::Table(t) => {
                self.table_count += 1;
                self.word_count += t
                    .cells()
                    .map(|c| c.text.split_whitespace().count() as u32)
                    .sum::<u32>();
            }
            Block::Image(_) => self.image_count += 1,
            Block::PageBreak => self.page_break_count += 1,
        }
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &LayoutStats) {
        self.page_count += other.page_count;
        self.paragraph_count += other.paragraph_count;
        self.heading_count += other.heading_count;
        self.table_count += other.table_count;
        self.image_count += other.image_count;
        self.page_break_count += other.page_break_count;
        self.word_count += other.word_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, ParagraphBlock, Table};

    #[test]
    fn test_stats_from_document() {
        let mut heading = ParagraphBlock::new("Big title", 20.0);
        heading.heading_level = Some(HeadingLevel::H1);

        let doc = LayoutDocument {
            page_count: 2,
            blocks: vec![
                Block::Paragraph(heading),
                Block::Paragraph(ParagraphBlock::new("one two three", 12.0)),
                Block::Table(Table::from_grid(
                    vec![vec!["a b".to_string(), "c".to_string()]],
                    vec![0.0, 96.0],
                )),
                Block::PageBreak,
            ],
            ..Default::default()
        };

        let stats = LayoutStats::from_document(&doc);
        assert_eq!(stats.page_count, 2);
        assert_eq!(stats.heading_count, 1);
        assert_eq!(stats.paragraph_count, 1);
        assert_eq!(stats.table_count, 1);
        assert_eq!(stats.page_break_count, 1);
        assert_eq!(stats.word_count, 2 + 3 + 3);
    }

    #[test]
    fn test_stats_merge() {
        let mut stats1 = LayoutStats::new();
        stats1.paragraph_count = 5;
        stats1.table_count = 2;

        let stats2 = LayoutStats {
            paragraph_count: 3,
            table_count: 1,
            image_count: 4,
            ..Default::default()
        };

        stats1.merge(&stats2);

        assert_eq!(stats1.paragraph_count, 8);
        assert_eq!(stats1.table_count, 3);
        assert_eq!(stats1.image_count, 4);
    }
}
