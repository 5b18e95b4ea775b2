use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::chart::{CategoryBucket, ChartMode, NetCategory, Viewport, OTHER_BUCKET};
use crate::models::transaction::{Transaction, TransactionType};
use crate::services::palette::{color_for, OTHER_COLOR};

/// Maximum entries in the "top categories by net" chart.
pub const TOP_NET_LIMIT: usize = 8;

/// Names longer than this are shortened on chart axes.
const LABEL_MAX_CHARS: usize = 15;
/// Characters kept when a label is shortened.
const LABEL_KEEP_CHARS: usize = 12;

/// Shapes transactions into chart-ready category data.
///
/// The core computes all the numbers; the frontend only renders.
/// The viewport decides how many pie slices fit before the tail is folded into "Other".
pub struct ChartService {
    viewport: Viewport,
}

impl ChartService {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Per-category buckets, largest total first.
    ///
    /// 1. Group by category name in first-encounter order (single-type modes skip
    ///    transactions of the other type)
    /// 2. Drop buckets whose total is zero
    /// 3. Stable sort by descending total
    /// 4. Single-type modes only: fold the tail into an "Other" bucket when there
    ///    are more buckets than the viewport allows
    pub fn category_buckets(
        &self,
        transactions: &[Transaction],
        mode: ChartMode,
    ) -> Vec<CategoryBucket> {
        let only = mode.transaction_type();

        let mut buckets: Vec<CategoryBucket> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for transaction in transactions {
            if only.is_some_and(|t| t != transaction.transaction_type) {
                continue;
            }

            let name = transaction.category_name();
            let slot = *index.entry(name).or_insert_with(|| {
                let color = transaction
                    .category_color()
                    .unwrap_or_else(|| color_for(name));
                buckets.push(CategoryBucket::new(name, color));
                buckets.len() - 1
            });
            buckets[slot].record(transaction.transaction_type, transaction.effective_amount());
        }

        buckets.retain(|b| b.total != 0.0);
        buckets.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));

        match only {
            Some(transaction_type) if buckets.len() > self.viewport.max_buckets() => {
                let tail = buckets.split_off(self.viewport.keep_buckets());
                buckets.push(merge_into_other(&tail, transaction_type));
                buckets
            }
            _ => buckets,
        }
    }

    /// Categories ranked by absolute net (income - expense), at most eight.
    pub fn top_categories_by_net(&self, transactions: &[Transaction]) -> Vec<NetCategory> {
        let mut categories: Vec<NetCategory> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for transaction in transactions {
            let name = transaction.category_name();
            let slot = *index.entry(name).or_insert_with(|| {
                let color = transaction
                    .category_color()
                    .unwrap_or_else(|| color_for(name));
                categories.push(NetCategory {
                    name: name.to_string(),
                    display_name: shorten_label(name),
                    income: 0.0,
                    expense: 0.0,
                    net: 0.0,
                    color: color.to_string(),
                });
                categories.len() - 1
            });

            let entry = &mut categories[slot];
            let amount = transaction.effective_amount();
            match transaction.transaction_type {
                TransactionType::Income => entry.income += amount,
                TransactionType::Expense => entry.expense += amount,
            }
            entry.net = entry.income - entry.expense;
        }

        categories.sort_by(|a, b| {
            b.net
                .abs()
                .partial_cmp(&a.net.abs())
                .unwrap_or(Ordering::Equal)
        });
        categories.truncate(TOP_NET_LIMIT);
        categories
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

fn merge_into_other(tail: &[CategoryBucket], transaction_type: TransactionType) -> CategoryBucket {
    let mut other = CategoryBucket::new(OTHER_BUCKET, OTHER_COLOR);
    for bucket in tail {
        other.income += bucket.income;
        other.expense += bucket.expense;
        other.transaction_count += bucket.transaction_count;
    }
    other.total = other.income + other.expense;
    other.dominant_type = transaction_type;
    other
}

/// `"Entertainment & Leisure"` → `"Entertainmen..."`; short names pass through.
pub fn shorten_label(name: &str) -> String {
    if name.chars().count() > LABEL_MAX_CHARS {
        let kept: String = name.chars().take(LABEL_KEEP_CHARS).collect();
        format!("{kept}...")
    } else {
        name.to_string()
    }
}
