//! Error types for finreport library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for finreport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while analyzing financial reports.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file content is not recognized as PDF.
    #[error("无法识别的文件格式：不是有效的PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("不支持的PDF版本：{0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF解析错误：{0}")]
    PdfParse(String),

    /// Page index is out of range.
    #[error("第 {0} 页超出范围（文档共 {1} 页）")]
    PageOutOfRange(usize, usize),

    /// The requested report does not exist.
    #[error("文件不存在：{}", .0.display())]
    FileNotFound(PathBuf),

    /// The requested report is not a PDF file.
    #[error("不支持的文件格式：{}，仅支持PDF文件", .0.display())]
    UnsupportedFileType(PathBuf),

    /// The batch request named no reports.
    #[error("未选择任何报表进行解析")]
    EmptyBatch,

    /// Unknown processing mode name.
    #[error("不支持的处理模式：{0}")]
    UnsupportedMode(String),

    /// A single page could not be scanned.
    #[error("处理文件 {title} 第 {page} 页时出错：{source}")]
    Page {
        /// Document title
        title: String,
        /// 1-based page number
        page: usize,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// Spreadsheet serialization failure.
    #[error("Excel写入错误：{0}")]
    Spreadsheet(String),

    /// Word document serialization failure.
    #[error("Word写入错误：{0}")]
    Document(String),

    /// Saving the spreadsheet of a report failed.
    #[error("保存Excel文件时出错 {title}：{source}")]
    SaveSpreadsheet {
        /// Document title
        title: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// Saving the word document of a report failed.
    #[error("保存Word文件时出错 {title}：{source}")]
    SaveDocument {
        /// Document title
        title: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// A report failed as a whole.
    #[error("处理文件 {} 时出错：{source}", .path.display())]
    Report {
        /// Report path as requested
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// Every report in a batch failed.
    #[error("{}", .0.join("\n"))]
    BatchFailed(Vec<String>),
}

impl Error {
    /// Wrap a failure with the page it occurred on.
    pub fn on_page(self, title: impl Into<String>, page: usize) -> Self {
        Error::Page {
            title: title.into(),
            page,
            source: Box::new(self),
        }
    }

    /// Wrap a failure with the report it occurred in.
    pub fn in_report(self, path: impl Into<PathBuf>) -> Self {
        Error::Report {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Error::Spreadsheet(err.to_string())
    }
}
