//! Per-page table and narrative extraction.

use crate::error::Result;
use crate::model::{RawTable, Rect};
use crate::parser::{PdfDocument, TableSettings};

/// What one page contributes to a report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageScan {
    /// Tables with at least one detected cell, top to bottom
    pub tables: Vec<ScannedTable>,
    /// Text blocks outside every table region, in reading order
    pub narrative: Vec<String>,
}

/// A table region and its cell text.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedTable {
    pub bbox: Rect,
    pub table: RawTable,
}

/// Splits a page into tables and narrative text.
#[derive(Debug, Clone, Default)]
pub struct PageScanner {
    settings: TableSettings,
}

impl PageScanner {
    pub fn new(settings: TableSettings) -> Self {
        Self { settings }
    }

    /// Scan one page (0-based).
    pub fn scan(&self, doc: &dyn PdfDocument, page: usize) -> Result<PageScan> {
        let regions = doc.find_tables(page, &self.settings)?;
        let bboxes: Vec<Rect> = regions.iter().map(|r| r.bbox).collect();

        let tables: Vec<ScannedTable> = regions
            .into_iter()
            .filter(|r| r.cell_count > 0)
            .map(|r| ScannedTable {
                bbox: r.bbox,
                table: RawTable::new(r.rows),
            })
            .collect();

        let blocks = doc.text_blocks(page, &bboxes)?;
        let total = blocks.len();
        let narrative: Vec<String> = blocks
            .into_iter()
            .filter(|b| !in_any_region(&b.bbox, &bboxes))
            .map(|b| b.text)
            .collect();

        log::debug!(
            "page {}: {} table(s), {} of {} block(s) outside tables",
            page + 1,
            tables.len(),
            narrative.len(),
            total
        );

        Ok(PageScan { tables, narrative })
    }
}

fn in_any_region(block: &Rect, regions: &[Rect]) -> bool {
    regions.iter().any(|r| block.intersects(r))
}
