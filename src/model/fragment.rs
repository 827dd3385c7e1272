//! Positioned text fragments.

use serde::{Deserialize, Serialize};

/// One positioned run of text extracted from a page.
///
/// Coordinates are page-local with `y` measured from the top of the page.
/// Sources that report bottom-up coordinates are flipped when the fragment
/// is built (see [`TextFragment::from_item`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// Raw glyph content (a word, several words, or part of a word)
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position, measured from the top of the page
    pub y: f32,
    /// Width of the bounding box
    pub width: f32,
    /// Height of the bounding box
    pub height: f32,
    /// Nominal font size in points
    pub font_size: f32,
    /// Raw font identifier (e.g., "ABCDEF+Helvetica-Bold")
    pub font_name: String,
}

impl TextFragment {
    /// Create a fragment at the given position with a 12pt regular font.
    pub fn new(text: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width: 0.0,
            height: 12.0,
            font_size: 12.0,
            font_name: String::new(),
        }
    }

    /// Set the bounding box size.
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the font name and size.
    pub fn with_font(mut self, name: impl Into<String>, size: f32) -> Self {
        self.font_name = name.into();
        self.font_size = size;
        self
    }

    /// Set the font size only.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Build a fragment from a raw source item, flipping its bottom-up
    /// baseline into top-down page space.
    pub fn from_item(item: &crate::source::TextItem, viewport_height: f32) -> Self {
        let [a, b, _, _, e, f] = item.transform;
        let scale = (a * a + b * b).sqrt();
        let font_size = if scale > 0.0 { scale } else { item.height };

        Self {
            text: item.text.clone(),
            x: e,
            y: viewport_height - f,
            width: item.width,
            height: item.height,
            font_size,
            font_name: item.font_name.clone(),
        }
    }

    /// Right edge of the bounding box.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Whether the text is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Whether the font name marks a bold face.
    pub fn is_bold(&self) -> bool {
        self.font_name.to_lowercase().contains("bold")
    }

    /// Whether the font name marks an italic or oblique face.
    pub fn is_italic(&self) -> bool {
        let name = self.font_name.to_lowercase();
        name.contains("italic") || name.contains("oblique")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::TextItem;

    #[test]
    fn test_style_detection() {
        let bold = TextFragment::new("Test", 0.0, 0.0).with_font("Helvetica-Bold", 12.0);
        assert!(bold.is_bold());
        assert!(!bold.is_italic());

        let oblique = TextFragment::new("Test", 0.0, 0.0).with_font("Helvetica-Oblique", 12.0);
        assert!(!oblique.is_bold());
        assert!(oblique.is_italic());

        let mixed = TextFragment::new("Test", 0.0, 0.0).with_font("TIMES-BOLDITALIC", 12.0);
        assert!(mixed.is_bold());
        assert!(mixed.is_italic());
    }

    #[test]
    fn test_blank() {
        assert!(TextFragment::new("", 0.0, 0.0).is_blank());
        assert!(TextFragment::new(" \t\u{00A0}", 0.0, 0.0).is_blank());
        assert!(!TextFragment::new(" a ", 0.0, 0.0).is_blank());
    }

    #[test]
    fn test_from_item_flips_y() {
        let item = TextItem {
            text: "Title".to_string(),
            transform: [24.0, 0.0, 0.0, 24.0, 72.0, 700.0],
            width: 60.0,
            height: 24.0,
            font_name: "Arial-Bold".to_string(),
        };
        let fragment = TextFragment::from_item(&item, 792.0);
        assert_eq!(fragment.x, 72.0);
        assert_eq!(fragment.y, 92.0);
        assert_eq!(fragment.font_size, 24.0);
        assert_eq!(fragment.right(), 132.0);
        assert!(fragment.is_bold());
    }

    #[test]
    fn test_from_item_falls_back_to_height() {
        let item = TextItem {
            text: "x".to_string(),
            transform: [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            width: 5.0,
            height: 9.0,
            font_name: String::new(),
        };
        assert_eq!(TextFragment::from_item(&item, 100.0).font_size, 9.0);
    }
}
