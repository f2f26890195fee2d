//! Report processing: modes, options, processors and batches.
//!
//! # Example
//!
//! ```no_run
//! use finreport::convert::{create_processor, ProcessMode, ReportProcessor};
//! use std::path::Path;
//!
//! fn main() -> finreport::Result<()> {
//!     let processor = create_processor("doc2x")?;
//!     let outcome = processor.process(Path::new("downloads/600000/2023.pdf"))?;
//!     println!("{:?}", outcome.result.excel_path);
//!     assert_eq!(processor.mode(), ProcessMode::Doc2x);
//!     Ok(())
//! }
//! ```

mod batch;
mod processor;

pub use batch::BatchAnalyzer;
pub use processor::{Doc2xProcessor, RagFlowProcessor, ReportPipeline};

use crate::error::{Error, Result};
use crate::model::AnalysisResult;
use crate::parser::{LopdfBackend, PdfBackend, TableSettings};
use crate::render::OutputOptions;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Processing strategy requested by the caller.
///
/// Both modes currently run the same pipeline; the distinction is kept so
/// callers can select a strategy by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProcessMode {
    #[default]
    Doc2x,
    RagFlow,
}

impl ProcessMode {
    /// Name used on the command line and in requests.
    pub fn name(&self) -> &'static str {
        match self {
            ProcessMode::Doc2x => "doc2x",
            ProcessMode::RagFlow => "ragflow",
        }
    }
}

impl fmt::Display for ProcessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProcessMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "doc2x" => Ok(ProcessMode::Doc2x),
            "ragflow" => Ok(ProcessMode::RagFlow),
            _ => Err(Error::UnsupportedMode(s.to_string())),
        }
    }
}

/// Options for analyzing reports.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// Directory relative report paths are resolved against
    /// (the working directory when unset)
    pub base_dir: Option<PathBuf>,

    /// Processing strategy
    pub mode: ProcessMode,

    /// Table detection settings
    pub tables: TableSettings,

    /// Output artifact settings
    pub output: OutputOptions,
}

impl AnalyzeOptions {
    /// Create new analyze options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Set the processing mode.
    pub fn with_mode(mut self, mode: ProcessMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set table detection settings.
    pub fn with_table_settings(mut self, settings: TableSettings) -> Self {
        self.tables = settings;
        self
    }

    /// Set output options.
    pub fn with_output(mut self, output: OutputOptions) -> Self {
        self.output = output;
        self
    }

    /// Location of a requested report on disk.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) => base.join(path),
            None => std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf()),
        }
    }
}

/// A processed report and the failures recovered along the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportOutcome {
    pub result: AnalysisResult,
    /// Page and output failures, in the order they occurred
    pub errors: Vec<String>,
}

/// Trait for report processors.
pub trait ReportProcessor: Send + Sync {
    /// Mode this processor implements.
    fn mode(&self) -> ProcessMode;

    /// Process one report.
    fn process(&self, path: &Path) -> Result<ReportOutcome>;
}

/// Create a processor for a mode name with the default backend and options.
pub fn create_processor(mode: &str) -> Result<Box<dyn ReportProcessor>> {
    let mode: ProcessMode = mode.parse()?;
    Ok(create_processor_with(
        Arc::new(LopdfBackend::new()),
        AnalyzeOptions::new().with_mode(mode),
    ))
}

/// Create the processor for `options.mode`.
pub fn create_processor_with(
    backend: Arc<dyn PdfBackend>,
    options: AnalyzeOptions,
) -> Box<dyn ReportProcessor> {
    match options.mode {
        ProcessMode::Doc2x => Box::new(Doc2xProcessor::new(backend, options)),
        ProcessMode::RagFlow => Box::new(RagFlowProcessor::new(backend, options)),
    }
}

/// Process a single report in the named mode.
pub fn process_report(path: impl AsRef<Path>, mode: &str) -> Result<AnalysisResult> {
    let processor = create_processor(mode)?;
    let outcome = processor.process(path.as_ref())?;
    for error in &outcome.errors {
        log::warn!("{}", error);
    }
    Ok(outcome.result)
}
