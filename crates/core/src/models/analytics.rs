use serde::{Deserialize, Serialize};

/// Income divided by expense, or a sentinel when there is no expense.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum IncomeExpenseRatio {
    Finite(f64),
    /// Expense is zero
    Infinite,
}

impl IncomeExpenseRatio {
    /// Two decimal places, or `"∞"` for the sentinel.
    pub fn formatted(&self) -> String {
        self.to_string()
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, IncomeExpenseRatio::Infinite)
    }
}

impl std::fmt::Display for IncomeExpenseRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncomeExpenseRatio::Finite(ratio) => write!(f, "{ratio:.2}"),
            IncomeExpenseRatio::Infinite => write!(f, "∞"),
        }
    }
}

/// Summary cards for a set of transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSummary {
    /// Sum of income amounts
    pub total_income: f64,

    /// Sum of expense amounts
    pub total_expense: f64,

    /// total_income - total_expense
    pub net: f64,

    pub income_count: usize,
    pub expense_count: usize,
    pub transaction_count: usize,

    /// Percentage: (income - expense) / income * 100, or 0 when there is no income
    pub savings_rate: f64,

    pub income_expense_ratio: IncomeExpenseRatio,
}

impl Default for AggregateSummary {
    fn default() -> Self {
        Self {
            total_income: 0.0,
            total_expense: 0.0,
            net: 0.0,
            income_count: 0,
            expense_count: 0,
            transaction_count: 0,
            savings_rate: 0.0,
            income_expense_ratio: IncomeExpenseRatio::Infinite,
        }
    }
}

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBreakdown {
    pub year: i32,

    /// 1-based month number
    pub month: u32,

    /// `YYYY-MM`
    pub label: String,

    pub income: f64,
    pub expense: f64,

    /// income - expense
    pub net: f64,

    pub transaction_count: usize,
}
