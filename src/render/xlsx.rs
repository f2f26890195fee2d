//! Spreadsheet output.

use std::fs;
use std::path::Path;

use rust_xlsxwriter::Workbook;

use super::OutputOptions;
use crate::error::Result;
use crate::model::{FinancialTableSet, RawTable};

/// Column widths in characters.
///
/// Each width is the longest cell (or the column's index label) plus the
/// padding, capped at the configured maximum.
pub fn column_widths(table: &RawTable, options: &OutputOptions) -> Vec<usize> {
    (0..table.column_count())
        .map(|col| {
            let label = col.to_string().chars().count();
            let longest = table
                .column(col)
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0);
            (longest.max(label) + options.column_padding).min(options.max_column_width)
        })
        .collect()
}

/// Serialize every occupied slot as one sheet, in statement order.
///
/// Returns `None` when no slot is occupied.
pub fn build_workbook(tables: &FinancialTableSet, options: &OutputOptions) -> Result<Option<Vec<u8>>> {
    if tables.is_empty() {
        return Ok(None);
    }

    let mut workbook = Workbook::new();
    for classified in tables.iter() {
        let sheet = workbook.add_worksheet();
        sheet.set_name(classified.kind.label())?;

        for (r, row) in classified.table.rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                sheet.write_string(r as u32, c as u16, cell.as_str())?;
            }
        }
        for (c, width) in column_widths(&classified.table, options).into_iter().enumerate() {
            sheet.set_column_width(c as u16, width as f64)?;
        }
    }

    Ok(Some(workbook.save_to_buffer()?))
}

/// Write the workbook to `path`. Returns whether a file was written.
pub fn save_workbook(tables: &FinancialTableSet, path: &Path, options: &OutputOptions) -> Result<bool> {
    match build_workbook(tables, options)? {
        Some(bytes) => {
            fs::write(path, bytes)?;
            log::info!("wrote {} sheet(s) to {}", tables.len(), path.display());
            Ok(true)
        }
        None => Ok(false),
    }
}
