//! Document-level types.

use super::{Block, ExtractedImage, ParagraphBlock, Table};
use serde::{Deserialize, Serialize};

/// The ordered block stream produced by one conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    /// Source document metadata
    pub metadata: Metadata,

    /// Number of pages that were processed
    pub page_count: u32,

    /// Blocks in output order, pages separated by `Block::PageBreak`
    pub blocks: Vec<Block>,
}

impl LayoutDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the document has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterate over all paragraphs (headings included).
    pub fn paragraphs(&self) -> impl Iterator<Item = &ParagraphBlock> {
        self.blocks.iter().filter_map(Block::as_paragraph)
    }

    /// Iterate over all tables.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(Block::as_table)
    }

    /// Iterate over all images.
    pub fn images(&self) -> impl Iterator<Item = &ExtractedImage> {
        self.blocks.iter().filter_map(Block::as_image)
    }

    /// Plain text of every paragraph, separated by blank lines.
    pub fn plain_text(&self) -> String {
        self.paragraphs()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Document metadata read from the source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// PDF producer
    pub producer: Option<String>,

    /// PDF version (e.g., "1.7")
    pub pdf_version: Option<String>,
}

impl Metadata {
    /// Check if no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.producer.is_none()
            && self.pdf_version.is_none()
    }

    /// Convert metadata to YAML frontmatter format.
    pub fn to_yaml_frontmatter(&self, page_count: u32) -> String {
        let mut lines = vec!["---".to_string()];

        if let Some(ref title) = self.title {
            lines.push(format!("title: \"{}\"", escape_yaml(title)));
        }
        if let Some(ref author) = self.author {
            lines.push(format!("author: \"{}\"", escape_yaml(author)));
        }
        if let Some(ref producer) = self.producer {
            lines.push(format!("producer: \"{}\"", escape_yaml(producer)));
        }
        if let Some(ref version) = self.pdf_version {
            lines.push(format!("pdf_version: \"{}\"", escape_yaml(version)));
        }
        lines.push(format!("pages: {}", page_count));
        lines.push("---".to_string());

        lines.join("\n") + "\n\n"
    }
}

fn escape_yaml(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
