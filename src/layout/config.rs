//! Heuristic thresholds for layout reconstruction.

use serde::{Deserialize, Serialize};

use crate::model::HeadingLevel;

/// Tunable thresholds used by the reconstructor. All distances are in page
/// units (points).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Fragments closer than this vertically are on the same line
    pub line_threshold: f32,

    /// Vertical distance above which a new paragraph starts
    pub paragraph_threshold: f32,

    /// Same-line fragments further apart vertically than this are
    /// separated by a space even when they touch horizontally
    pub same_line_tolerance: f32,

    /// Horizontal gap above which same-line fragments are separated by a space
    pub word_gap: f32,

    /// Vertical bucket size for grouping table rows
    pub row_bucket: f32,

    /// Horizontal bucket size for grouping table columns
    pub column_bucket: f32,

    /// Minimum fragments in a row for it to count as a table row
    pub min_row_cells: usize,

    /// Minimum number of table rows
    pub min_table_rows: usize,

    /// Minimum number of rows a column bucket must appear in to be stable
    pub min_column_rows: usize,

    /// Minimum number of stable columns
    pub min_columns: usize,

    /// Maximum number of stable columns
    pub max_columns: usize,

    /// Average font size above which a paragraph is an H1
    pub h1_font_size: f32,

    /// Average font size above which a paragraph is an H2
    pub h2_font_size: f32,

    /// Average font size above which a paragraph is an H3
    pub h3_font_size: f32,

    /// Minimum image width and height
    pub min_image_size: f32,

    /// Whether table fragments also feed the paragraph pass
    pub table_fragments: TableFragments,
}

impl LayoutConfig {
    /// Create a configuration with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the same-line threshold.
    pub fn with_line_threshold(mut self, threshold: f32) -> Self {
        self.line_threshold = threshold;
        self
    }

    /// Set the paragraph break threshold.
    pub fn with_paragraph_threshold(mut self, threshold: f32) -> Self {
        self.paragraph_threshold = threshold;
        self
    }

    /// Set the horizontal word gap.
    pub fn with_word_gap(mut self, gap: f32) -> Self {
        self.word_gap = gap;
        self
    }

    /// Set row and column bucket sizes for table detection.
    pub fn with_table_buckets(mut self, row: f32, column: f32) -> Self {
        self.row_bucket = row;
        self.column_bucket = column;
        self
    }

    /// Set the accepted range of stable columns.
    pub fn with_column_range(mut self, min: usize, max: usize) -> Self {
        self.min_columns = min;
        self.max_columns = max.max(min);
        self
    }

    /// Set heading font-size cutoffs (H1, H2, H3).
    pub fn with_heading_sizes(mut self, h1: f32, h2: f32, h3: f32) -> Self {
        self.h1_font_size = h1;
        self.h2_font_size = h2;
        self.h3_font_size = h3;
        self
    }

    /// Set the minimum image size.
    pub fn with_min_image_size(mut self, size: f32) -> Self {
        self.min_image_size = size;
        self
    }

    /// Set how table fragments are treated by the paragraph pass.
    pub fn with_table_fragments(mut self, policy: TableFragments) -> Self {
        self.table_fragments = policy;
        self
    }

    /// Remove table fragments from the paragraph pass.
    pub fn exclude_table_text(self) -> Self {
        self.with_table_fragments(TableFragments::Exclude)
    }

    /// Heading level for a paragraph with the given average font size.
    pub fn heading_level(&self, average_font_size: f32) -> Option<HeadingLevel> {
        if average_font_size > self.h1_font_size {
            Some(HeadingLevel::H1)
        } else if average_font_size > self.h2_font_size {
            Some(HeadingLevel::H2)
        } else if average_font_size > self.h3_font_size {
            Some(HeadingLevel::H3)
        } else {
            None
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_threshold: 8.0,
            paragraph_threshold: 20.0,
            same_line_tolerance: 2.0,
            word_gap: 0.0,
            row_bucket: 3.0,
            column_bucket: 12.0,
            min_row_cells: 2,
            min_table_rows: 2,
            min_column_rows: 2,
            min_columns: 2,
            max_columns: 10,
            h1_font_size: 18.0,
            h2_font_size: 16.0,
            h3_font_size: 14.0,
            min_image_size: 20.0,
            table_fragments: TableFragments::Keep,
        }
    }
}

/// What happens to fragments that were recognized as table cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableFragments {
    /// Table text also appears as paragraphs
    #[default]
    Keep,
    /// Table text is removed from the paragraph pass
    Exclude,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = LayoutConfig::default();
        assert_eq!(config.line_threshold, 8.0);
        assert_eq!(config.paragraph_threshold, 20.0);
        assert_eq!(config.row_bucket, 3.0);
        assert_eq!(config.column_bucket, 12.0);
        assert_eq!((config.min_columns, config.max_columns), (2, 10));
        assert_eq!(config.table_fragments, TableFragments::Keep);
    }

    #[test]
    fn test_heading_level_boundaries() {
        let config = LayoutConfig::default();
        assert_eq!(config.heading_level(19.0), Some(HeadingLevel::H1));
        assert_eq!(config.heading_level(18.0), Some(HeadingLevel::H2));
        assert_eq!(config.heading_level(17.0), Some(HeadingLevel::H2));
        assert_eq!(config.heading_level(16.0), Some(HeadingLevel::H3));
        assert_eq!(config.heading_level(15.0), Some(HeadingLevel::H3));
        assert_eq!(config.heading_level(14.0), None);
        assert_eq!(config.heading_level(12.0), None);
    }

    #[test]
    fn test_builder() {
        let config = LayoutConfig::new()
            .with_line_threshold(5.0)
            .with_column_range(3, 1)
            .exclude_table_text();
        assert_eq!(config.line_threshold, 5.0);
        assert_eq!((config.min_columns, config.max_columns), (3, 3));
        assert_eq!(config.table_fragments, TableFragments::Exclude);
    }
}
