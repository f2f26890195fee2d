//! Statement classification by header keywords.

use crate::model::{RawTable, StatementFamily, StatementKind};

/// Number of leading rows searched for statement titles.
pub const HEADER_ROWS: usize = 5;

/// Marker that distinguishes parent-company statements.
const PARENT_MARKER: &str = "母公司";

/// Title patterns of one statement family.
struct FamilyPatterns {
    family: StatementFamily,
    parent: &'static [&'static str],
    generic: &'static [&'static str],
    /// Both words must appear for the fallback match.
    fallback: (&'static str, &'static str),
}

const PATTERNS: [FamilyPatterns; 3] = [
    FamilyPatterns {
        family: StatementFamily::BalanceSheet,
        parent: &["母公司资产负债表", "母公司资产负债"],
        generic: &["合并资产负债表", "合并资产负债", "资产负债表"],
        fallback: ("资产", "负债"),
    },
    FamilyPatterns {
        family: StatementFamily::IncomeStatement,
        parent: &["母公司利润表", "母公司损益表"],
        generic: &["合并利润表", "合并损益表", "利润表"],
        fallback: ("收入", "利润"),
    },
    FamilyPatterns {
        family: StatementFamily::CashFlow,
        parent: &["母公司现金流量表", "母公司现金流"],
        generic: &["合并现金流量表", "合并现金流", "现金流量表"],
        fallback: ("现金", "流量"),
    },
];

/// Decide which statement a table represents.
///
/// The first [`HEADER_ROWS`] rows are searched. Families are tried in order
/// (balance sheet, income statement, cash flow); within a family the
/// parent-company titles win over the generic ones. When no title matches,
/// a pair of characteristic words selects the family and the presence of
/// `母公司` selects the variant.
///
/// Tables with fewer than two columns are never statements.
pub fn classify(table: &RawTable) -> Option<StatementKind> {
    if table.is_empty() || table.column_count() < 2 {
        return None;
    }

    let header = table.head_text(HEADER_ROWS);
    let is_parent = header.contains(PARENT_MARKER);

    for patterns in &PATTERNS {
        if contains_any(&header, patterns.parent) {
            return Some(patterns.family.kind(true));
        }
        if contains_any(&header, patterns.generic) {
            return Some(patterns.family.kind(false));
        }
    }

    PATTERNS
        .iter()
        .find(|p| header.contains(p.fallback.0) && header.contains(p.fallback.1))
        .map(|p| p.family.kind(is_parent))
}

fn contains_any(text: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| text.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_narrow_tables() {
        assert_eq!(classify(&RawTable::default()), None);
        assert_eq!(classify(&RawTable::from_strs(&[&["合并资产负债表"], &["资产总计"]])), None);
    }

    #[test]
    fn test_title_patterns() {
        let cases = [
            ("合并资产负债表", StatementKind::BalanceSheetConsolidated),
            ("母公司资产负债表", StatementKind::BalanceSheetParent),
            ("合并利润表", StatementKind::IncomeStatementConsolidated),
            ("母公司损益表", StatementKind::IncomeStatementParent),
            ("合并现金流量表", StatementKind::CashFlowConsolidated),
            ("母公司现金流量表", StatementKind::CashFlowParent),
            ("利润表", StatementKind::IncomeStatementConsolidated),
        ];
        for (title, expected) in cases {
            let table = RawTable::from_strs(&[&[title, ""], &["项目", "期末余额"]]);
            assert_eq!(classify(&table), Some(expected), "title {title}");
        }
    }

    #[test]
    fn test_parent_beats_generic() {
        // "母公司资产负债表" also contains the generic "资产负债表".
        let table = RawTable::from_strs(&[&["母公司资产负债表", "单位：元"]]);
        assert_eq!(classify(&table), Some(StatementKind::BalanceSheetParent));
    }

    #[test]
    fn test_family_order() {
        let table = RawTable::from_strs(&[&["现金流量表", "利润表"]]);
        assert_eq!(classify(&table), Some(StatementKind::IncomeStatementConsolidated));
    }

    #[test]
    fn test_fallback_inference() {
        let table = RawTable::from_strs(&[&["流动资产", "流动负债"]]);
        assert_eq!(classify(&table), Some(StatementKind::BalanceSheetConsolidated));

        let table = RawTable::from_strs(&[&["母公司", "营业收入"], &["营业利润", "1"]]);
        assert_eq!(classify(&table), Some(StatementKind::IncomeStatementParent));

        let table = RawTable::from_strs(&[&["现金及现金等价物", "净流量"]]);
        assert_eq!(classify(&table), Some(StatementKind::CashFlowConsolidated));
    }

    #[test]
    fn test_only_header_rows_searched() {
        let mut rows: Vec<&[&str]> = vec![&["项目", "金额"]; 5];
        rows.push(&["合并资产负债表", ""]);
        assert_eq!(classify(&RawTable::from_strs(&rows)), None);
    }

    #[test]
    fn test_unrelated_table() {
        let table = RawTable::from_strs(&[&["股东名称", "持股比例"], &["某某", "5%"]]);
        assert_eq!(classify(&table), None);
    }

    #[test]
    fn test_idempotent() {
        let table = RawTable::from_strs(&[&["母公司利润表", ""], &["营业收入", "100"]]);
        assert_eq!(classify(&table), classify(&table));
    }
}
