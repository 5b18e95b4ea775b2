use chrono::Datelike;
use std::collections::BTreeMap;

use crate::models::analytics::{AggregateSummary, IncomeExpenseRatio, MonthlyBreakdown};
use crate::models::transaction::{Transaction, TransactionType};

/// Computes the summary cards and the month-by-month breakdown.
///
/// Pure functions over the fetched transaction list: no I/O, no failure modes.
/// Results are recomputed from scratch whenever the list changes.
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Totals, counts, savings rate and income/expense ratio.
    ///
    /// - `net = total_income - total_expense`
    /// - `savings_rate = net / total_income * 100`, or 0 without income
    /// - ratio is `Infinite` without expense
    pub fn compute_summary(&self, transactions: &[Transaction]) -> AggregateSummary {
        let mut summary = AggregateSummary::default();

        for transaction in transactions {
            let amount = transaction.effective_amount();
            match transaction.transaction_type {
                TransactionType::Income => {
                    summary.total_income += amount;
                    summary.income_count += 1;
                }
                TransactionType::Expense => {
                    summary.total_expense += amount;
                    summary.expense_count += 1;
                }
            }
        }

        summary.transaction_count = transactions.len();
        summary.net = summary.total_income - summary.total_expense;
        summary.savings_rate = if summary.total_income > 0.0 {
            (summary.net / summary.total_income) * 100.0
        } else {
            0.0
        };
        summary.income_expense_ratio = if summary.total_expense > 0.0 {
            IncomeExpenseRatio::Finite(summary.total_income / summary.total_expense)
        } else {
            IncomeExpenseRatio::Infinite
        };

        summary
    }

    /// One entry per calendar month that has transactions, oldest month first.
    pub fn monthly_breakdown(&self, transactions: &[Transaction]) -> Vec<MonthlyBreakdown> {
        let mut months: BTreeMap<(i32, u32), MonthlyBreakdown> = BTreeMap::new();

        for transaction in transactions {
            let (year, month) = (transaction.date.year(), transaction.date.month());
            let entry = months.entry((year, month)).or_insert_with(|| MonthlyBreakdown {
                year,
                month,
                label: format!("{year:04}-{month:02}"),
                income: 0.0,
                expense: 0.0,
                net: 0.0,
                transaction_count: 0,
            });

            let amount = transaction.effective_amount();
            match transaction.transaction_type {
                TransactionType::Income => entry.income += amount,
                TransactionType::Expense => entry.expense += amount,
            }
            entry.net = entry.income - entry.expense;
            entry.transaction_count += 1;
        }

        months.into_values().collect()
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}
