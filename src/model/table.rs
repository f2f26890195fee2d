//! Table types.

use super::StatementKind;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// A rectangular grid of cell text extracted from one table region.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawTable {
    /// Rows of cell text, top to bottom
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Create a table from rows, padding short rows with empty cells.
    pub fn new(mut rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Self { rows }
    }

    /// Create a table from string slices.
    pub fn from_strs(rows: &[&[&str]]) -> Self {
        Self::new(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    /// A table with no cells.
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0 || self.column_count() == 0
    }

    /// Cell text, if the position exists.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col)).map(String::as_str)
    }

    /// Iterate over the cells of one column.
    pub fn column(&self, col: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .filter_map(move |r| r.get(col).map(String::as_str))
    }

    /// Remove rows and columns whose cells are all blank.
    ///
    /// Rows shorter than the widest row are padded with empty cells.
    pub fn cleaned(&self) -> RawTable {
        let rows: Vec<&Vec<String>> = self
            .rows
            .iter()
            .filter(|r| r.iter().any(|c| !is_blank(c)))
            .collect();

        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let keep: Vec<usize> = (0..width)
            .filter(|&col| rows.iter().any(|r| r.get(col).is_some_and(|c| !is_blank(c))))
            .collect();

        RawTable {
            rows: rows
                .into_iter()
                .map(|r| {
                    keep.iter()
                        .map(|&col| r.get(col).cloned().unwrap_or_default())
                        .collect()
                })
                .collect(),
        }
    }

    /// Search text of the first `n` rows: cells joined with spaces, NFKC
    /// normalized.
    pub fn head_text(&self, n: usize) -> String {
        join_cells(self.rows.iter().take(n))
    }

    /// Search text of every cell, NFKC normalized.
    pub fn flattened_text(&self) -> String {
        join_cells(self.rows.iter())
    }
}

// Compatibility forms (Kangxi radicals, full-width digits) fold into the
// characters the statement keywords are written with.
fn join_cells<'a>(rows: impl Iterator<Item = &'a Vec<String>>) -> String {
    rows.flat_map(|r| r.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
        .nfkc()
        .collect()
}

fn is_blank(cell: &str) -> bool {
    cell.trim().is_empty()
}

/// A cleaned table tagged with the statement it represents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedTable {
    /// Statement category
    pub kind: StatementKind,
    /// Cleaned cell grid
    pub table: RawTable,
    /// Whether the table carries every mandatory keyword of its family
    pub complete: bool,
}
