//! Paragraph segmentation.
//!
//! Fragments are read top to bottom, left to right. Vertical distance to the
//! previous fragment decides between joining the same line, wrapping onto a
//! new line of the same paragraph, or starting a new paragraph.

use std::cmp::Ordering;

use super::LayoutConfig;
use crate::model::{ParagraphBlock, TextFragment};

/// Sort fragments into reading order: top to bottom, then left to right
/// within a line.
///
/// Fragments whose `y` lies within `line_tolerance` of the first fragment
/// of a line belong to that line, so small baseline differences do not
/// reorder words. The sort is stable, so fragments at identical positions
/// keep their input order.
pub fn reading_order(fragments: &mut [&TextFragment], line_tolerance: f32) {
    fragments.sort_by(|a, b| match a.y.total_cmp(&b.y) {
        Ordering::Equal => a.x.total_cmp(&b.x),
        other => other,
    });

    let mut start = 0;
    while start < fragments.len() {
        let line_y = fragments[start].y;
        let end = fragments[start..]
            .iter()
            .position(|f| (f.y - line_y).abs() > line_tolerance)
            .map_or(fragments.len(), |len| start + len);
        fragments[start..end].sort_by(|a, b| a.x.total_cmp(&b.x));
        start = end;
    }
}

/// Groups fragments of one page into paragraphs.
pub struct ParagraphSegmenter<'c> {
    config: &'c LayoutConfig,
}

impl<'c> ParagraphSegmenter<'c> {
    /// Create a segmenter using the given thresholds.
    pub fn new(config: &'c LayoutConfig) -> Self {
        Self { config }
    }

    /// Segment a page's fragments into paragraphs in reading order.
    ///
    /// Blank fragments are ignored.
    pub fn segment(&self, fragments: &[&TextFragment]) -> Vec<ParagraphBlock> {
        let mut ordered: Vec<&TextFragment> =
            fragments.iter().copied().filter(|f| !f.is_blank()).collect();
        reading_order(&mut ordered, self.config.same_line_tolerance);

        let mut paragraphs = Vec::new();
        let mut open = OpenParagraph::default();
        let mut last: Option<&TextFragment> = None;

        for fragment in ordered {
            match last {
                None => open.push(fragment, false),
                Some(prev) => {
                    let dy = (fragment.y - prev.y).abs();
                    if dy < self.config.line_threshold {
                        let gap = fragment.x - prev.right();
                        let separate =
                            gap > self.config.word_gap || dy > self.config.same_line_tolerance;
                        open.push(fragment, separate);
                    } else if dy > self.config.paragraph_threshold {
                        if let Some(paragraph) = open.close(self.config) {
                            paragraphs.push(paragraph);
                        }
                        open.push(fragment, false);
                    } else {
                        open.push(fragment, true);
                    }
                }
            }
            last = Some(fragment);
        }

        if let Some(paragraph) = open.close(self.config) {
            paragraphs.push(paragraph);
        }

        log::debug!("Segmented {} paragraphs", paragraphs.len());
        paragraphs
    }
}

/// Paragraph under construction.
#[derive(Default)]
struct OpenParagraph<'f> {
    text: String,
    fragments: Vec<&'f TextFragment>,
}

impl<'f> OpenParagraph<'f> {
    fn push(&mut self, fragment: &'f TextFragment, separate: bool) {
        if separate
            && !self.text.is_empty()
            && !self.text.ends_with(char::is_whitespace)
            && !fragment.text.starts_with(char::is_whitespace)
        {
            self.text.push(' ');
        }
        self.text.push_str(&fragment.text);
        self.fragments.push(fragment);
    }

    /// Finish the paragraph, leaving the buffer empty.
    fn close(&mut self, config: &LayoutConfig) -> Option<ParagraphBlock> {
        let fragments = std::mem::take(&mut self.fragments);
        let text = std::mem::take(&mut self.text);
        if fragments.is_empty() {
            return None;
        }

        let average_font_size =
            fragments.iter().map(|f| f.font_size).sum::<f32>() / fragments.len() as f32;

        Some(ParagraphBlock {
            text: text.trim().to_string(),
            average_font_size,
            is_bold: fragments.iter().any(|f| f.is_bold()),
            is_italic: fragments.iter().any(|f| f.is_italic()),
            heading_level: config.heading_level(average_font_size),
        })
    }
}
