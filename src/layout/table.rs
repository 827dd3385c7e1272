//! Table detection from text alignment.
//!
//! Fragments are bucketed into rows by `y` and into columns by `x`. A column
//! bucket that recurs across rows is a stable column; a page whose stable
//! column count falls inside the configured range yields one table covering
//! every multi-fragment row.

use std::collections::{BTreeMap, BTreeSet};

use super::LayoutConfig;
use crate::model::{Table, TextFragment};

/// A table found on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedTable {
    /// The cell grid
    pub table: Table,
    /// Indices (into the detector input) of fragments in table cells
    pub fragment_indices: Vec<usize>,
}

/// Detects a table in the fragments of one page.
pub struct TableDetector<'c> {
    config: &'c LayoutConfig,
}

impl<'c> TableDetector<'c> {
    /// Create a detector using the given thresholds.
    pub fn new(config: &'c LayoutConfig) -> Self {
        Self { config }
    }

    /// Detect a table. Returns `None` when the page does not look tabular.
    pub fn detect(&self, fragments: &[&TextFragment]) -> Option<DetectedTable> {
        let rows = self.group_into_rows(fragments);
        log::debug!("TableDetector: {} rows with enough cells", rows.len());

        if rows.len() < self.config.min_table_rows {
            log::debug!(
                "TableDetector: not enough rows ({} < {})",
                rows.len(),
                self.config.min_table_rows
            );
            return None;
        }

        let columns = self.stable_columns(fragments, &rows);
        log::debug!(
            "TableDetector: {} stable columns at buckets {:?}",
            columns.len(),
            columns
        );

        if columns.len() < self.config.min_columns || columns.len() > self.config.max_columns {
            log::debug!(
                "TableDetector: column count {} outside {}..={}",
                columns.len(),
                self.config.min_columns,
                self.config.max_columns
            );
            return None;
        }

        let mut grid = Vec::with_capacity(rows.len());
        let mut fragment_indices = Vec::new();
        for row in &rows {
            let mut cells = Vec::with_capacity(columns.len());
            for &column in &columns {
                // Rows are sorted by x, so the first match is the left-most.
                let hit = row
                    .iter()
                    .copied()
                    .find(|&i| self.column_bucket(fragments[i]) == column);
                match hit {
                    Some(i) => {
                        cells.push(fragments[i].text.trim().to_string());
                    }
                    None => cells.push(String::new()),
                }
            }
            fragment_indices.extend(
                row.iter()
                    .copied()
                    .filter(|&i| columns.contains(&self.column_bucket(fragments[i]))),
            );
            grid.push(cells);
        }
        fragment_indices.sort_unstable();

        let positions = columns
            .iter()
            .map(|&bucket| bucket as f32 * self.config.column_bucket)
            .collect();

        Some(DetectedTable {
            table: Table::from_grid(grid, positions),
            fragment_indices,
        })
    }

    /// Group non-blank fragments into rows of fragment indices, top to
    /// bottom, each sorted left to right. Rows with too few fragments are
    /// dropped.
    fn group_into_rows(&self, fragments: &[&TextFragment]) -> Vec<Vec<usize>> {
        let mut rows: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
        for (i, fragment) in fragments.iter().enumerate() {
            if fragment.is_blank() {
                continue;
            }
            rows.entry(bucket(fragment.y, self.config.row_bucket))
                .or_default()
                .push(i);
        }

        rows.into_values()
            .filter(|row| row.len() >= self.config.min_row_cells)
            .map(|mut row| {
                row.sort_by(|&a, &b| fragments[a].x.total_cmp(&fragments[b].x));
                row
            })
            .collect()
    }

    /// Column buckets present in enough rows, in ascending order.
    fn stable_columns(&self, fragments: &[&TextFragment], rows: &[Vec<usize>]) -> Vec<i64> {
        let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
        for row in rows {
            // Each bucket counts once per row.
            let buckets: BTreeSet<i64> =
                row.iter().map(|&i| self.column_bucket(fragments[i])).collect();
            for b in buckets {
                *counts.entry(b).or_insert(0) += 1;
            }
        }

        counts
            .into_iter()
            .filter(|(_, rows)| *rows >= self.config.min_column_rows)
            .map(|(b, _)| b)
            .collect()
    }

    fn column_bucket(&self, fragment: &TextFragment) -> i64 {
        bucket(fragment.x, self.config.column_bucket)
    }
}

fn bucket(value: f32, size: f32) -> i64 {
    let size = if size > 0.0 { size } else { 1.0 };
    (value / size).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(fragments: &[TextFragment]) -> Option<DetectedTable> {
        let config = LayoutConfig::default();
        let refs: Vec<&TextFragment> = fragments.iter().collect();
        TableDetector::new(&config).detect(&refs)
    }

    #[test]
    fn test_detect_simple_table() {
        let detected = detect(&[
            TextFragment::new("Name", 50.0, 100.0),
            TextFragment::new("Age", 200.0, 100.0),
            TextFragment::new("Alice", 50.0, 115.0),
            TextFragment::new("30", 200.0, 115.0),
        ])
        .unwrap();

        let table = &detected.table;
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.cell(0, 0).unwrap().text, "Name");
        assert_eq!(table.cell(1, 1).unwrap().text, "30");
        assert_eq!(detected.fragment_indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_misaligned_row_yields_no_table() {
        let detected = detect(&[
            TextFragment::new("Name", 50.0, 100.0),
            TextFragment::new("Age", 200.0, 100.0),
            TextFragment::new("Alice", 50.0, 115.0),
            TextFragment::new("30", 260.0, 115.0),
        ]);
        assert!(detected.is_none());
    }

    #[test]
    fn test_single_row_is_not_a_table() {
        assert!(detect(&[
            TextFragment::new("a", 0.0, 10.0),
            TextFragment::new("b", 100.0, 10.0),
            TextFragment::new("c", 0.0, 40.0),
        ])
        .is_none());
    }

    #[test]
    fn test_too_many_columns_rejected() {
        let mut fragments = Vec::new();
        for row in 0..2 {
            for col in 0..11 {
                fragments.push(TextFragment::new("w", col as f32 * 30.0, row as f32 * 15.0));
            }
        }
        assert!(detect(&fragments).is_none());

        fragments.retain(|f| f.x < 300.0);
        assert_eq!(detect(&fragments).unwrap().table.column_count(), 10);
    }

    #[test]
    fn test_missing_cell_is_empty_and_first_fragment_wins() {
        let detected = detect(&[
            TextFragment::new("A", 0.0, 0.0),
            TextFragment::new("B", 100.0, 0.0),
            TextFragment::new("C", 200.0, 0.0),
            TextFragment::new("  D ", 0.0, 20.0),
            TextFragment::new("E", 100.0, 20.0),
            TextFragment::new("E2", 101.0, 20.0),
            TextFragment::new("F", 0.0, 40.0),
            TextFragment::new("G", 200.0, 40.0),
        ])
        .unwrap();

        let table = &detected.table;
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.cell(1, 0).unwrap().text, "D");
        assert_eq!(table.cell(1, 1).unwrap().text, "E");
        assert_eq!(table.cell(1, 2).unwrap().text, "");
        assert_eq!(table.cell(2, 1).unwrap().text, "");
    }

    #[test]
    fn test_row_bucketing_tolerates_small_offsets() {
        let detected = detect(&[
            TextFragment::new("a", 0.0, 30.0),
            TextFragment::new("b", 100.0, 31.0),
            TextFragment::new("c", 0.0, 60.0),
            TextFragment::new("d", 100.0, 60.4),
        ])
        .unwrap();
        assert_eq!(detected.table.row_count(), 2);
        assert_eq!(detected.table.column_positions, vec![0.0, 96.0]);
    }
}
