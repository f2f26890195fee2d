//! Financial statement categories.

use serde::{Deserialize, Serialize};

/// Statement family, independent of consolidation scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementFamily {
    /// 资产负债表
    BalanceSheet,
    /// 利润表
    IncomeStatement,
    /// 现金流量表
    CashFlow,
}

impl StatementFamily {
    /// Chinese name of the family.
    pub fn label(&self) -> &'static str {
        match self {
            StatementFamily::BalanceSheet => "资产负债表",
            StatementFamily::IncomeStatement => "利润表",
            StatementFamily::CashFlow => "现金流量表",
        }
    }

    /// Statement kind of this family for the given scope.
    pub fn kind(&self, parent: bool) -> StatementKind {
        match (self, parent) {
            (StatementFamily::BalanceSheet, false) => StatementKind::BalanceSheetConsolidated,
            (StatementFamily::BalanceSheet, true) => StatementKind::BalanceSheetParent,
            (StatementFamily::IncomeStatement, false) => {
                StatementKind::IncomeStatementConsolidated
            }
            (StatementFamily::IncomeStatement, true) => StatementKind::IncomeStatementParent,
            (StatementFamily::CashFlow, false) => StatementKind::CashFlowConsolidated,
            (StatementFamily::CashFlow, true) => StatementKind::CashFlowParent,
        }
    }
}

/// One of the six recognized financial statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatementKind {
    BalanceSheetConsolidated,
    BalanceSheetParent,
    IncomeStatementConsolidated,
    IncomeStatementParent,
    CashFlowConsolidated,
    CashFlowParent,
}

impl StatementKind {
    /// All kinds, in slot order.
    pub const ALL: [StatementKind; 6] = [
        StatementKind::BalanceSheetConsolidated,
        StatementKind::BalanceSheetParent,
        StatementKind::IncomeStatementConsolidated,
        StatementKind::IncomeStatementParent,
        StatementKind::CashFlowConsolidated,
        StatementKind::CashFlowParent,
    ];

    /// Display label, also used as the spreadsheet sheet name.
    pub fn label(&self) -> &'static str {
        match self {
            StatementKind::BalanceSheetConsolidated => "资产负债表(合并)",
            StatementKind::BalanceSheetParent => "资产负债表(母公司)",
            StatementKind::IncomeStatementConsolidated => "利润表(合并)",
            StatementKind::IncomeStatementParent => "利润表(母公司)",
            StatementKind::CashFlowConsolidated => "现金流量表(合并)",
            StatementKind::CashFlowParent => "现金流量表(母公司)",
        }
    }

    /// Family this statement belongs to.
    pub fn family(&self) -> StatementFamily {
        match self {
            StatementKind::BalanceSheetConsolidated | StatementKind::BalanceSheetParent => {
                StatementFamily::BalanceSheet
            }
            StatementKind::IncomeStatementConsolidated | StatementKind::IncomeStatementParent => {
                StatementFamily::IncomeStatement
            }
            StatementKind::CashFlowConsolidated | StatementKind::CashFlowParent => {
                StatementFamily::CashFlow
            }
        }
    }

    /// Whether this is the parent-company variant.
    pub fn is_parent(&self) -> bool {
        matches!(
            self,
            StatementKind::BalanceSheetParent
                | StatementKind::IncomeStatementParent
                | StatementKind::CashFlowParent
        )
    }

    /// Position in [`StatementKind::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
