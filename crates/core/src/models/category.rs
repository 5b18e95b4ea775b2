use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::transaction::{CategoryRef, TransactionType};

/// A named, typed grouping with a display colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Transactions referencing this category must have the same type
    #[serde(rename = "type")]
    pub category_type: TransactionType,

    /// Display colour token
    pub color: String,
}

impl Category {
    pub fn new(
        name: impl Into<String>,
        category_type: TransactionType,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category_type,
            color: color.into(),
        }
    }

    /// Whether a transaction of the given type may reference this category.
    pub fn accepts(&self, transaction_type: TransactionType) -> bool {
        self.category_type == transaction_type
    }

    /// The joined form carried on transaction rows.
    pub fn to_ref(&self) -> CategoryRef {
        CategoryRef::new(self.name.clone(), Some(self.color.clone()))
    }
}
