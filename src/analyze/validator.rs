//! Completeness check for classified tables.

use crate::model::{RawTable, StatementFamily, StatementKind};

/// Keywords every complete statement of a family carries.
pub fn required_keywords(family: StatementFamily) -> &'static [&'static str; 3] {
    match family {
        StatementFamily::BalanceSheet => &["资产总计", "负债总计", "所有者权益"],
        StatementFamily::IncomeStatement => &["营业收入", "营业利润", "净利润"],
        StatementFamily::CashFlow => &["经营活动", "投资活动", "筹资活动"],
    }
}

/// Whether `table` contains every required keyword of `kind`'s family.
pub fn validate(table: &RawTable, kind: StatementKind) -> bool {
    if table.is_empty() {
        return false;
    }
    let text = table.flattened_text();
    required_keywords(kind.family())
        .iter()
        .all(|keyword| text.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(keywords: &[&str]) -> RawTable {
        let rows: Vec<Vec<String>> = keywords
            .iter()
            .map(|k| vec![k.to_string(), "100".to_string()])
            .collect();
        RawTable::new(rows)
    }

    #[test]
    fn test_complete_tables_validate() {
        for kind in StatementKind::ALL {
            let table = table_with(required_keywords(kind.family()));
            assert!(validate(&table, kind), "{kind}");
        }
    }

    #[test]
    fn test_missing_any_keyword_fails() {
        for kind in StatementKind::ALL {
            let keywords = required_keywords(kind.family());
            for skip in 0..keywords.len() {
                let partial: Vec<&str> = keywords
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != skip)
                    .map(|(_, k)| *k)
                    .collect();
                assert!(!validate(&table_with(&partial), kind), "{kind} without {}", keywords[skip]);
            }
        }
    }

    #[test]
    fn test_empty_table_invalid() {
        assert!(!validate(&RawTable::default(), StatementKind::CashFlowParent));
    }

    #[test]
    fn test_keyword_inside_longer_cell() {
        let table = RawTable::from_strs(&[
            &["负债和所有者权益（或股东权益）总计", ""],
            &["资产总计", "1"],
            &["负债总计", "2"],
        ]);
        assert!(validate(&table, StatementKind::BalanceSheetParent));
    }
}
