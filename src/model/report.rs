//! Per-document and per-batch report types.

use std::path::PathBuf;

use super::{ClassifiedTable, StatementKind};
use serde::{Deserialize, Serialize};

/// The six statement slots of one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinancialTableSet {
    slots: [Option<ClassifiedTable>; 6],
}

impl FinancialTableSet {
    /// Create a set with every slot empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table held for a statement kind.
    pub fn get(&self, kind: StatementKind) -> Option<&ClassifiedTable> {
        self.slots[kind.index()].as_ref()
    }

    /// Replace the table held for its kind, returning the previous one.
    pub fn insert(&mut self, table: ClassifiedTable) -> Option<ClassifiedTable> {
        let index = table.kind.index();
        self.slots[index].replace(table)
    }

    /// Whether a slot is occupied.
    pub fn contains(&self, kind: StatementKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    /// Occupied slots in statement order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassifiedTable> {
        self.slots.iter().flatten()
    }

    /// Kinds with an occupied slot, in statement order.
    pub fn kinds(&self) -> Vec<StatementKind> {
        self.iter().map(|t| t.kind).collect()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether every slot is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

/// Prose text blocks outside any table, in reading order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NarrativeText {
    blocks: Vec<String>,
}

impl NarrativeText {
    /// Create empty narrative text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append blocks in order. Blank blocks are kept.
    pub fn extend<I: IntoIterator<Item = String>>(&mut self, blocks: I) {
        self.blocks.extend(blocks);
    }

    /// All blocks as accumulated.
    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    /// Trimmed blocks that contain more than whitespace.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.blocks
            .iter()
            .map(|b| b.trim())
            .filter(|b| !b.is_empty())
    }

    /// Whether any block has visible text.
    pub fn has_content(&self) -> bool {
        self.paragraphs().next().is_some()
    }
}

/// Filesystem locations of the artifacts written for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputFiles {
    /// Absolute location of the spreadsheet
    pub excel: Option<PathBuf>,
    /// Absolute location of the word document
    pub word: Option<PathBuf>,
}

/// Outcome of one successfully processed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Document title (file stem)
    pub title: String,
    /// Relative display path of the spreadsheet
    pub excel_path: Option<String>,
    /// Relative display path of the word document
    pub word_path: Option<String>,
    /// Where the artifacts were written
    #[serde(skip)]
    pub files: OutputFiles,
}

impl AnalysisResult {
    /// Create a result with no artifacts.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Accumulated results and error messages of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Successfully processed documents, in input order
    pub results: Vec<AnalysisResult>,
    /// Human-readable error messages, in the order they occurred
    pub errors: Vec<String>,
}

impl BatchOutcome {
    /// Whether every processed file failed.
    pub fn is_total_failure(&self) -> bool {
        self.results.is_empty() && !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawTable;

    fn classified(kind: StatementKind, cell: &str) -> ClassifiedTable {
        ClassifiedTable {
            kind,
            table: RawTable::from_strs(&[&[cell, "1"]]),
            complete: false,
        }
    }

    #[test]
    fn test_table_set_slots() {
        let mut set = FinancialTableSet::new();
        assert!(set.is_empty());

        set.insert(classified(StatementKind::CashFlowParent, "x"));
        set.insert(classified(StatementKind::BalanceSheetConsolidated, "y"));
        let previous = set.insert(classified(StatementKind::CashFlowParent, "z"));

        assert_eq!(previous.unwrap().table.cell(0, 0), Some("x"));
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.kinds(),
            vec![
                StatementKind::BalanceSheetConsolidated,
                StatementKind::CashFlowParent
            ]
        );
    }

    #[test]
    fn test_narrative_paragraphs_skip_blank() {
        let mut text = NarrativeText::new();
        text.extend(vec!["  第一节 \n".to_string(), "   ".to_string(), "正文".to_string()]);
        assert_eq!(text.blocks().len(), 3);
        assert_eq!(text.paragraphs().collect::<Vec<_>>(), vec!["第一节", "正文"]);
        assert!(text.has_content());

        let mut blank = NarrativeText::new();
        blank.extend(vec!["\n".to_string()]);
        assert!(!blank.has_content());
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let mut result = AnalysisResult::new("年报");
        result.excel_path = Some("a/b/c/年报_数据.xlsx".into());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["title"], "年报");
        assert_eq!(json["excelPath"], "a/b/c/年报_数据.xlsx");
        assert!(json["wordPath"].is_null());
        assert!(json.get("files").is_none());
    }
}
