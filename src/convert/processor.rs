//! Per-report processing pipeline.

use std::path::Path;
use std::sync::Arc;

use super::{AnalyzeOptions, ProcessMode, ReportOutcome, ReportProcessor};
use crate::analyze::{PageScanner, ReportAggregator};
use crate::detect::validate_report_path;
use crate::error::{Error, Result};
use crate::model::{AnalysisResult, FinancialTableSet, NarrativeText};
use crate::parser::PdfBackend;
use crate::render::{display_path, report_title, save_document, save_workbook};

/// Scan, aggregate and write one report.
///
/// Both processing modes share this pipeline.
pub struct ReportPipeline {
    backend: Arc<dyn PdfBackend>,
    options: AnalyzeOptions,
    scanner: PageScanner,
}

impl ReportPipeline {
    pub fn new(backend: Arc<dyn PdfBackend>, options: AnalyzeOptions) -> Self {
        let scanner = PageScanner::new(options.tables.clone());
        Self {
            backend,
            options,
            scanner,
        }
    }

    /// Process the report named by `requested`.
    ///
    /// Page failures and output failures are recovered and returned in the
    /// outcome; validation and open failures fail the whole report.
    pub fn run(&self, requested: &Path) -> Result<ReportOutcome> {
        let resolved = self.options.resolve(requested);
        validate_report_path(requested, &resolved)?;

        let title = report_title(&resolved);
        let mut errors = Vec::new();
        let (tables, narrative) = self.scan(requested, &resolved, &title, &mut errors)?;

        let mut result = AnalysisResult::new(title.clone());
        self.write_spreadsheet(&resolved, &title, &tables, &mut result, &mut errors);
        self.write_document(&resolved, &title, &narrative, &mut result, &mut errors);

        Ok(ReportOutcome { result, errors })
    }

    /// Read every page. The document is closed before this returns.
    fn scan(
        &self,
        requested: &Path,
        resolved: &Path,
        title: &str,
        errors: &mut Vec<String>,
    ) -> Result<(FinancialTableSet, NarrativeText)> {
        let doc = self
            .backend
            .open(resolved)
            .map_err(|e| e.in_report(requested))?;

        let mut aggregator = ReportAggregator::new();
        for page in 0..doc.page_count() {
            match self.scanner.scan(doc.as_ref(), page) {
                Ok(scan) => aggregator.add_page(scan),
                Err(e) => {
                    let err = e.on_page(title, page + 1);
                    log::warn!("{}", err);
                    errors.push(err.to_string());
                }
            }
        }

        log::info!(
            "{}: {} page(s), statements found: {:?}",
            title,
            doc.page_count(),
            aggregator
                .tables()
                .kinds()
                .iter()
                .map(|k| k.label())
                .collect::<Vec<_>>()
        );
        Ok(aggregator.finish())
    }

    fn write_spreadsheet(
        &self,
        source: &Path,
        title: &str,
        tables: &FinancialTableSet,
        result: &mut AnalysisResult,
        errors: &mut Vec<String>,
    ) {
        let output = &self.options.output;
        let path = output.spreadsheet_path(source, title);
        match save_workbook(tables, &path, output) {
            Ok(true) => {
                result.excel_path = Some(display_path(source, &output.spreadsheet_name(title)));
                result.files.excel = Some(path);
            }
            Ok(false) => log::debug!("{}: no statements, spreadsheet skipped", title),
            Err(e) => {
                let err = Error::SaveSpreadsheet {
                    title: title.to_string(),
                    source: Box::new(e),
                };
                log::warn!("{}", err);
                errors.push(err.to_string());
            }
        }
    }

    fn write_document(
        &self,
        source: &Path,
        title: &str,
        narrative: &NarrativeText,
        result: &mut AnalysisResult,
        errors: &mut Vec<String>,
    ) {
        let output = &self.options.output;
        let path = output.document_path(source, title);
        match save_document(title, narrative, &path, output) {
            Ok(true) => {
                result.word_path = Some(display_path(source, &output.document_name(title)));
                result.files.word = Some(path);
            }
            Ok(false) => log::debug!("{}: no narrative text, document skipped", title),
            Err(e) => {
                let err = Error::SaveDocument {
                    title: title.to_string(),
                    source: Box::new(e),
                };
                log::warn!("{}", err);
                errors.push(err.to_string());
            }
        }
    }
}

/// Processor for reports converted in `doc2x` mode.
pub struct Doc2xProcessor {
    pipeline: ReportPipeline,
}

impl Doc2xProcessor {
    pub fn new(backend: Arc<dyn PdfBackend>, options: AnalyzeOptions) -> Self {
        Self {
            pipeline: ReportPipeline::new(backend, options),
        }
    }
}

impl ReportProcessor for Doc2xProcessor {
    fn mode(&self) -> ProcessMode {
        ProcessMode::Doc2x
    }

    fn process(&self, path: &Path) -> Result<ReportOutcome> {
        self.pipeline.run(path)
    }
}

/// Processor for reports converted in `ragflow` mode.
pub struct RagFlowProcessor {
    pipeline: ReportPipeline,
}

impl RagFlowProcessor {
    pub fn new(backend: Arc<dyn PdfBackend>, options: AnalyzeOptions) -> Self {
        Self {
            pipeline: ReportPipeline::new(backend, options),
        }
    }
}

impl ReportProcessor for RagFlowProcessor {
    fn mode(&self) -> ProcessMode {
        ProcessMode::RagFlow
    }

    fn process(&self, path: &Path) -> Result<ReportOutcome> {
        self.pipeline.run(path)
    }
}
