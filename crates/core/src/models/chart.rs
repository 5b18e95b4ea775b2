use serde::{Deserialize, Serialize};

use super::transaction::TransactionType;

/// Name of the synthetic bucket that absorbs the long tail in single-type charts.
pub const OTHER_BUCKET: &str = "Other";

/// Which transactions feed a category chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    /// Income and expense side by side
    #[default]
    Combined,
    Income,
    Expense,
}

impl ChartMode {
    /// The single transaction type this mode is restricted to, if any.
    pub fn transaction_type(&self) -> Option<TransactionType> {
        match self {
            ChartMode::Combined => None,
            ChartMode::Income => Some(TransactionType::Income),
            ChartMode::Expense => Some(TransactionType::Expense),
        }
    }
}

/// Screen class the charts are rendered for. Controls how many slices fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    Compact,
    #[default]
    Regular,
}

impl Viewport {
    /// Bucket count above which the tail is merged into "Other".
    pub fn max_buckets(&self) -> usize {
        match self {
            Viewport::Compact => 5,
            Viewport::Regular => 8,
        }
    }

    /// Buckets kept before "Other" once merging kicks in.
    pub fn keep_buckets(&self) -> usize {
        match self {
            Viewport::Compact => 4,
            Viewport::Regular => 7,
        }
    }
}

/// Per-category aggregate for pie/bar charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBucket {
    /// Category name, `"Uncategorized"` or `"Other"`
    pub name: String,

    /// Colour from the category record, or the palette fallback
    pub color: String,

    pub income: f64,
    pub expense: f64,

    /// income + expense
    pub total: f64,

    pub transaction_count: usize,

    /// Income when income exceeds expense, otherwise expense
    pub dominant_type: TransactionType,
}

impl CategoryBucket {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            income: 0.0,
            expense: 0.0,
            total: 0.0,
            transaction_count: 0,
            dominant_type: TransactionType::Expense,
        }
    }

    /// Add one transaction's amount to the bucket.
    pub fn record(&mut self, transaction_type: TransactionType, amount: f64) {
        match transaction_type {
            TransactionType::Income => self.income += amount,
            TransactionType::Expense => self.expense += amount,
        }
        self.total = self.income + self.expense;
        self.transaction_count += 1;
        self.dominant_type = if self.income > self.expense {
            TransactionType::Income
        } else {
            TransactionType::Expense
        };
    }
}

/// A category ranked by its net contribution (income - expense).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetCategory {
    pub name: String,

    /// Name shortened for axis labels
    pub display_name: String,

    pub income: f64,
    pub expense: f64,
    pub net: f64,
    pub color: String,
}
