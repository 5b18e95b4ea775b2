use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::models::date_range::DateRange;
use crate::models::transaction::Transaction;

/// Parameters of a single read against the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionQuery {
    /// Only rows belonging to this user are returned.
    pub owner_id: String,

    /// Inclusive date filter.
    pub range: DateRange,

    /// Row cap.
    pub limit: usize,
}

impl TransactionQuery {
    pub fn new(owner_id: impl Into<String>, range: DateRange, limit: usize) -> Self {
        Self {
            owner_id: owner_id.into(),
            range,
            limit,
        }
    }
}

/// Read side of the remote transaction store.
///
/// The REST backend implements this in production; tests plug in in-memory mocks.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Human-readable name of this backend (for logs/errors).
    fn name(&self) -> &str;

    /// Transactions for the query's owner within its range, newest first,
    /// each joined with its category name and colour, at most `limit` rows.
    async fn fetch_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<Transaction>, CoreError>;
}
