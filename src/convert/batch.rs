//! Batch processing of several reports.

use std::path::Path;
use std::sync::Arc;

use super::{create_processor_with, AnalyzeOptions, ReportProcessor};
use crate::error::{Error, Result};
use crate::model::BatchOutcome;
use crate::parser::{LopdfBackend, PdfBackend};

/// Runs a processor over a list of reports, one at a time.
///
/// A failing report never stops the batch; its message is collected and the
/// next report is processed.
pub struct BatchAnalyzer {
    processor: Box<dyn ReportProcessor>,
}

impl BatchAnalyzer {
    /// Create a batch analyzer with the lopdf backend.
    pub fn new(options: AnalyzeOptions) -> Self {
        Self::with_backend(Arc::new(LopdfBackend::new()), options)
    }

    /// Create a batch analyzer with a custom backend.
    pub fn with_backend(backend: Arc<dyn PdfBackend>, options: AnalyzeOptions) -> Self {
        Self {
            processor: create_processor_with(backend, options),
        }
    }

    /// Create a batch analyzer around an existing processor.
    pub fn with_processor(processor: Box<dyn ReportProcessor>) -> Self {
        Self { processor }
    }

    /// Process every path in order.
    ///
    /// Fails with [`Error::EmptyBatch`] for an empty list and with
    /// [`Error::BatchFailed`] when no report succeeded.
    pub fn run<P: AsRef<Path>>(&self, paths: &[P]) -> Result<BatchOutcome> {
        log::info!(
            "analyzing {} report(s) in {} mode",
            paths.len(),
            self.processor.mode()
        );
        if paths.is_empty() {
            return Err(Error::EmptyBatch);
        }

        let mut outcome = BatchOutcome::default();
        for path in paths {
            let path = path.as_ref();
            log::info!("processing {}", path.display());
            match self.processor.process(path) {
                Ok(report) => {
                    outcome.results.push(report.result);
                    outcome.errors.extend(report.errors);
                }
                Err(e) => {
                    log::error!("{}", e);
                    outcome.errors.push(e.to_string());
                }
            }
        }

        if outcome.is_total_failure() {
            return Err(Error::BatchFailed(outcome.errors));
        }
        log::info!(
            "batch done: {} succeeded, {} error(s)",
            outcome.results.len(),
            outcome.errors.len()
        );
        Ok(outcome)
    }
}
