//! Per-document accumulation of statements and narrative.

use super::classifier::classify;
use super::scanner::PageScan;
use super::validator::validate;
use crate::model::{ClassifiedTable, FinancialTableSet, NarrativeText, RawTable, StatementKind};

/// Collects the best table per statement and the narrative of one document.
#[derive(Debug, Clone, Default)]
pub struct ReportAggregator {
    tables: FinancialTableSet,
    narrative: NarrativeText,
}

impl ReportAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clean, classify and merge one raw table.
    ///
    /// Returns the kind the table was classified as, whether or not it was
    /// kept.
    pub fn add_table(&mut self, raw: &RawTable) -> Option<StatementKind> {
        let table = raw.cleaned();
        let kind = classify(&table)?;
        let complete = validate(&table, kind);
        self.merge(ClassifiedTable {
            kind,
            table,
            complete,
        });
        Some(kind)
    }

    /// Merge a classified table into its slot.
    ///
    /// A complete table always replaces the slot (the last complete one wins);
    /// an incomplete one only fills an empty slot. Returns whether the table
    /// was stored.
    pub fn merge(&mut self, table: ClassifiedTable) -> bool {
        let kind = table.kind;
        if table.complete || !self.tables.contains(kind) {
            log::debug!("storing {} (complete: {})", kind, table.complete);
            self.tables.insert(table);
            true
        } else {
            log::debug!("discarding incomplete {}, slot already filled", kind);
            false
        }
    }

    /// Add everything one page contributed.
    pub fn add_page(&mut self, scan: PageScan) {
        for scanned in &scan.tables {
            self.add_table(&scanned.table);
        }
        self.narrative.extend(scan.narrative);
    }

    pub fn tables(&self) -> &FinancialTableSet {
        &self.tables
    }

    pub fn narrative(&self) -> &NarrativeText {
        &self.narrative
    }

    /// Consume the aggregator.
    pub fn finish(self) -> (FinancialTableSet, NarrativeText) {
        (self.tables, self.narrative)
    }
}

/// Merge a sequence of classified tables with the slot rules of
/// [`ReportAggregator::merge`].
pub fn aggregate<I>(tables: I) -> FinancialTableSet
where
    I: IntoIterator<Item = ClassifiedTable>,
{
    let mut aggregator = ReportAggregator::new();
    for table in tables {
        aggregator.merge(table);
    }
    aggregator.tables
}
