//! # finreport
//!
//! Financial statement extraction from PDF reports.
//!
//! Every page of a report is searched for ruled tables. Each table is
//! classified as one of six statements (balance sheet, income statement and
//! cash flow statement, each consolidated or parent-company), the most
//! complete table per statement is kept, and the prose outside the tables is
//! collected. Two artifacts are written beside the source file:
//!
//! - `<title>_数据.xlsx` with one sheet per recognized statement
//! - `<title>_文本.docx` with the narrative text
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> finreport::Result<()> {
//!     let outcome = finreport::analyze_reports(&["downloads/600000/2023年年度报告.pdf"])?;
//!     for result in &outcome.results {
//!         println!("{}: {:?} {:?}", result.title, result.excel_path, result.word_path);
//!     }
//!     for error in &outcome.errors {
//!         eprintln!("{}", error);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`parser`]: PDF backend, ruled-table finder and text blocks
//! - [`analyze`]: classification, validation and aggregation
//! - [`render`]: workbook and document writers
//! - [`convert`]: processing modes, processors and batches

pub mod analyze;
pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use analyze::{classify, validate, PageScanner, ReportAggregator};
pub use convert::{
    create_processor, create_processor_with, process_report, AnalyzeOptions, BatchAnalyzer,
    ProcessMode, ReportOutcome, ReportProcessor,
};
pub use detect::{detect_format_from_bytes, detect_format_from_path, PdfFormat};
pub use error::{Error, Result};
pub use model::{
    AnalysisResult, BatchOutcome, ClassifiedTable, FinancialTableSet, NarrativeText, RawTable,
    Rect, StatementFamily, StatementKind,
};
pub use parser::{LopdfBackend, PdfBackend, PdfDocument, TableSettings};
pub use render::OutputOptions;

use std::path::Path;

/// Analyze a batch of reports with default options.
///
/// Relative paths are resolved against the working directory.
///
/// # Example
///
/// ```no_run
/// let outcome = finreport::analyze_reports(&["a.pdf", "b.pdf"]).unwrap();
/// println!("{}", serde_json::to_string(&outcome).unwrap());
/// ```
pub fn analyze_reports<P: AsRef<Path>>(paths: &[P]) -> Result<BatchOutcome> {
    analyze_reports_with_options(paths, AnalyzeOptions::default())
}

/// Analyze a batch of reports in the named mode (`doc2x` or `ragflow`).
pub fn analyze_reports_with_mode<P: AsRef<Path>>(paths: &[P], mode: &str) -> Result<BatchOutcome> {
    let mode: ProcessMode = mode.parse()?;
    analyze_reports_with_options(paths, AnalyzeOptions::new().with_mode(mode))
}

/// Analyze a batch of reports with custom options.
pub fn analyze_reports_with_options<P: AsRef<Path>>(
    paths: &[P],
    options: AnalyzeOptions,
) -> Result<BatchOutcome> {
    BatchAnalyzer::new(options).run(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_request() {
        let paths: Vec<String> = vec![];
        let err = analyze_reports(&paths).unwrap_err();
        assert_eq!(err.to_string(), "未选择任何报表进行解析");
    }

    #[test]
    fn test_unknown_mode_rejected_before_processing() {
        let err = analyze_reports_with_mode(&["a.pdf"], "mineru").unwrap_err();
        assert!(matches!(err, Error::UnsupportedMode(_)));
    }

    #[test]
    fn test_missing_file_is_total_failure() {
        let dir = tempfile::tempdir().unwrap();
        let options = AnalyzeOptions::new().with_base_dir(dir.path());
        let err = analyze_reports_with_options(&["600000/2023.pdf"], options).unwrap_err();
        assert_eq!(err.to_string(), "文件不存在：600000/2023.pdf");
    }
}
