//! Integration tests for report processing with a scripted backend.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use finreport::convert::{create_processor_with, ReportProcessor};
use finreport::error::{Error, Result};
use finreport::model::Rect;
use finreport::parser::{PageTable, PdfBackend, PdfDocument, TableSettings, TextBlock};
use finreport::{AnalyzeOptions, BatchAnalyzer, ProcessMode};

/// What each page of a mock document yields.
#[derive(Clone)]
enum MockPage {
    Statement(Vec<Vec<String>>),
    Prose(String),
    Broken,
}

struct MockBackend {
    pages: Vec<MockPage>,
    open: Arc<AtomicUsize>,
    opened: Arc<AtomicUsize>,
}

impl MockBackend {
    fn new(pages: Vec<MockPage>) -> Self {
        Self {
            pages,
            open: Arc::new(AtomicUsize::new(0)),
            opened: Arc::new(AtomicUsize::new(0)),
        }
    }
}

struct MockDocument {
    pages: Vec<MockPage>,
    open: Arc<AtomicUsize>,
}

impl Drop for MockDocument {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

impl PdfBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn open(&self, _path: &Path) -> Result<Box<dyn PdfDocument>> {
        self.open.fetch_add(1, Ordering::SeqCst);
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockDocument {
            pages: self.pages.clone(),
            open: Arc::clone(&self.open),
        }))
    }
}

impl PdfDocument for MockDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn find_tables(&self, page: usize, _settings: &TableSettings) -> Result<Vec<PageTable>> {
        match &self.pages[page] {
            MockPage::Statement(rows) => Ok(vec![PageTable {
                bbox: Rect::new(50.0, 100.0, 500.0, 400.0),
                cell_count: rows.len() * 2,
                rows: rows.clone(),
            }]),
            MockPage::Prose(_) => Ok(vec![]),
            MockPage::Broken => Err(Error::PdfParse("corrupt content stream".into())),
        }
    }

    fn text_blocks(&self, page: usize, _regions: &[Rect]) -> Result<Vec<TextBlock>> {
        match &self.pages[page] {
            MockPage::Statement(_) => Ok(vec![TextBlock {
                bbox: Rect::new(60.0, 120.0, 200.0, 130.0),
                text: "资产总计".to_string(),
            }]),
            MockPage::Prose(text) => Ok(vec![TextBlock {
                bbox: Rect::new(50.0, 50.0, 500.0, 80.0),
                text: text.clone(),
            }]),
            MockPage::Broken => Ok(vec![]),
        }
    }
}

fn rows(cells: &[[&str; 2]]) -> Vec<Vec<String>> {
    cells
        .iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

fn balance_sheet() -> MockPage {
    MockPage::Statement(rows(&[
        ["合并资产负债表", "2023年12月31日"],
        ["资产总计", "1,000"],
        ["负债总计", "400"],
        ["所有者权益合计", "600"],
    ]))
}

fn write_report(dir: &Path, relative: &str) {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"%PDF-1.7\n").unwrap();
}

#[test]
fn test_batch_partial_failure() {
    let dir = tempfile::tempdir().unwrap();
    write_report(dir.path(), "600000/a.pdf");
    write_report(dir.path(), "600000/c.pdf");

    let backend = MockBackend::new(vec![balance_sheet(), MockPage::Prose("经营情况讨论".into())]);
    let options = AnalyzeOptions::new().with_base_dir(dir.path());
    let batch = BatchAnalyzer::with_backend(Arc::new(backend), options);

    let outcome = batch
        .run(&["600000/a.pdf", "600000/b.pdf", "600000/c.pdf"])
        .unwrap();

    assert_eq!(outcome.results.len(), 2);
    assert_eq!(outcome.results[0].title, "a");
    assert_eq!(outcome.results[1].title, "c");
    assert_eq!(outcome.errors, vec!["文件不存在：600000/b.pdf".to_string()]);

    let first = &outcome.results[0];
    assert!(first.excel_path.as_deref().unwrap().ends_with("600000/a_数据.xlsx"));
    assert!(first.word_path.as_deref().unwrap().ends_with("600000/a_文本.docx"));
    assert!(dir.path().join("600000/a_数据.xlsx").exists());
    assert!(dir.path().join("600000/c_文本.docx").exists());
}

#[test]
fn test_batch_total_failure() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), b"plain text").unwrap();

    let options = AnalyzeOptions::new().with_base_dir(dir.path());
    let batch = BatchAnalyzer::with_backend(Arc::new(MockBackend::new(vec![])), options);

    let err = batch.run(&["missing.pdf", "notes.txt"]).unwrap_err();
    match err {
        Error::BatchFailed(errors) => assert_eq!(
            errors,
            vec![
                "文件不存在：missing.pdf".to_string(),
                "不支持的文件格式：notes.txt，仅支持PDF文件".to_string(),
            ]
        ),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_page_errors_are_reported_and_document_released() {
    let dir = tempfile::tempdir().unwrap();
    write_report(dir.path(), "r.pdf");

    let backend = Arc::new(MockBackend::new(vec![
        MockPage::Prose("董事会报告".into()),
        MockPage::Broken,
        balance_sheet(),
    ]));
    let open = Arc::clone(&backend.open);
    let opened = Arc::clone(&backend.opened);

    let options = AnalyzeOptions::new().with_base_dir(dir.path());
    let processor = create_processor_with(backend, options);
    let outcome = processor.process(Path::new("r.pdf")).unwrap();

    assert_eq!(opened.load(Ordering::SeqCst), 1);
    assert_eq!(open.load(Ordering::SeqCst), 0);
    assert_eq!(
        outcome.errors,
        vec!["处理文件 r 第 2 页时出错：PDF解析错误：corrupt content stream".to_string()]
    );
    assert!(outcome.result.excel_path.is_some());
    assert!(outcome.result.word_path.is_some());
}

#[test]
fn test_no_statements_no_spreadsheet() {
    let dir = tempfile::tempdir().unwrap();
    write_report(dir.path(), "r.pdf");

    let backend = MockBackend::new(vec![MockPage::Prose("公司简介".into())]);
    let options = AnalyzeOptions::new()
        .with_base_dir(dir.path())
        .with_mode(ProcessMode::RagFlow);
    let processor = create_processor_with(Arc::new(backend), options);
    assert_eq!(processor.mode(), ProcessMode::RagFlow);

    let outcome = processor.process(Path::new("r.pdf")).unwrap();
    assert!(outcome.errors.is_empty());
    assert!(outcome.result.excel_path.is_none());
    assert!(outcome.result.word_path.is_some());
    assert!(!dir.path().join("r_数据.xlsx").exists());
}

#[test]
fn test_table_text_is_not_narrative() {
    let dir = tempfile::tempdir().unwrap();
    write_report(dir.path(), "r.pdf");

    let backend = MockBackend::new(vec![balance_sheet()]);
    let options = AnalyzeOptions::new().with_base_dir(dir.path());
    let processor = create_processor_with(Arc::new(backend), options);

    let outcome = processor.process(Path::new("r.pdf")).unwrap();
    assert!(outcome.result.excel_path.is_some());
    assert!(outcome.result.word_path.is_none());
}
