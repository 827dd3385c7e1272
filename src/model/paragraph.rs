//! Paragraph and heading blocks.

use serde::{Deserialize, Serialize};

/// Heading level inferred from the average font size of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    /// Top-level heading
    H1,
    /// Second-level heading
    H2,
    /// Third-level heading
    H3,
}

impl HeadingLevel {
    /// Numeric level (1-3).
    pub fn level(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

/// A reconstructed paragraph with inferred style.
///
/// Style flags are paragraph-wide: a single bold fragment marks the whole
/// paragraph bold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphBlock {
    /// Paragraph text with inferred word spacing
    pub text: String,

    /// Mean font size of the constituent fragments
    pub average_font_size: f32,

    /// True if any fragment used a bold face
    pub is_bold: bool,

    /// True if any fragment used an italic or oblique face
    pub is_italic: bool,

    /// Heading level, or `None` for body text
    pub heading_level: Option<HeadingLevel>,
}

impl ParagraphBlock {
    /// Create a body-text paragraph.
    pub fn new(text: impl Into<String>, average_font_size: f32) -> Self {
        Self {
            text: text.into(),
            average_font_size,
            is_bold: false,
            is_italic: false,
            heading_level: None,
        }
    }

    /// Check if this is a heading.
    pub fn is_heading(&self) -> bool {
        self.heading_level.is_some()
    }

    /// Check if the paragraph carries no visible text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_numbers() {
        assert_eq!(HeadingLevel::H1.level(), 1);
        assert_eq!(HeadingLevel::H2.level(), 2);
        assert_eq!(HeadingLevel::H3.level(), 3);
        assert!(HeadingLevel::H1 < HeadingLevel::H3);
    }

    #[test]
    fn test_paragraph_block() {
        let p = ParagraphBlock::new("Hello world", 12.0);
        assert!(!p.is_heading());
        assert!(!p.is_empty());
        assert_eq!(p.word_count(), 2);

        let heading = ParagraphBlock {
            heading_level: Some(HeadingLevel::H2),
            ..ParagraphBlock::new("Intro", 17.0)
        };
        assert!(heading.is_heading());
    }

    #[test]
    fn test_heading_level_serde() {
        let json = serde_json::to_string(&HeadingLevel::H2).unwrap();
        assert_eq!(json, "\"h2\"");
    }
}
