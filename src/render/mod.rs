//! Output artifacts: the statement workbook and the narrative document.

mod docx;
mod options;
mod xlsx;

pub use self::docx::{build_document, save_document};
pub use options::{display_path, report_title, OutputOptions};
pub use xlsx::{build_workbook, column_widths, save_workbook};
