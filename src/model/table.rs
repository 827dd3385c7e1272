//! Table types.

use serde::{Deserialize, Serialize};

/// A table detected from aligned text fragments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Rows in the table, top to bottom
    pub rows: Vec<TableRow>,

    /// X positions of the stable columns that produced the grid
    pub column_positions: Vec<f32>,
}

impl Table {
    /// Create a table from a grid of cell texts.
    pub fn from_grid(grid: Vec<Vec<String>>, column_positions: Vec<f32>) -> Self {
        let rows = grid
            .into_iter()
            .enumerate()
            .map(|(row_index, texts)| {
                TableRow::new(
                    texts
                        .into_iter()
                        .enumerate()
                        .map(|(col_index, text)| TableCell::new(text, row_index, col_index))
                        .collect(),
                )
            })
            .collect();

        Self {
            rows,
            column_positions,
        }
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (based on first row).
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.cells.len()).unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a cell by row and column index.
    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.rows.get(row).and_then(|r| r.cells.get(col))
    }

    /// Iterate over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &TableCell> {
        self.rows.iter().flat_map(|r| r.cells.iter())
    }

    /// Get plain text representation of the table (tab-separated).
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row, left to right
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
    }

    /// Get plain text of the row (tab-separated).
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCell {
    /// Trimmed cell text (empty when no fragment occupies the cell)
    pub text: String,

    /// Zero-based row index
    pub row_index: usize,

    /// Zero-based column index
    pub col_index: usize,
}

impl TableCell {
    /// Create a new cell.
    pub fn new(text: impl Into<String>, row_index: usize, col_index: usize) -> Self {
        Self {
            text: text.into(),
            row_index,
            col_index,
        }
    }

    /// Check if the cell is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Table {
        Table::from_grid(
            vec![
                vec!["Name".to_string(), "Qty".to_string()],
                vec!["Apple".to_string(), String::new()],
            ],
            vec![0.0, 96.0],
        )
    }

    #[test]
    fn test_from_grid_indices() {
        let table = grid();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);

        let cell = table.cell(1, 0).unwrap();
        assert_eq!(cell.text, "Apple");
        assert_eq!(cell.row_index, 1);
        assert_eq!(cell.col_index, 0);
        assert!(table.cell(1, 1).unwrap().is_empty());
        assert!(table.cell(2, 0).is_none());
    }

    #[test]
    fn test_cells_row_major() {
        let table = grid();
        let positions: Vec<(usize, usize)> =
            table.cells().map(|c| (c.row_index, c.col_index)).collect();
        assert_eq!(positions, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(grid().plain_text(), "Name\tQty\nApple\t");
    }
}
