use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Label used for transactions that carry no category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in
    Income,
    /// Money going out
    Expense,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Expense => write!(f, "expense"),
        }
    }
}

/// The category fields joined onto a transaction row by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub name: String,

    /// Display colour token, e.g. `"#10b981"`. `None` means "use the fallback palette".
    #[serde(default)]
    pub color: Option<String>,
}

impl CategoryRef {
    pub fn new(name: impl Into<String>, color: Option<String>) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// A single dated income or expense record.
///
/// Records are owned by the remote store; this crate only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: Uuid,

    /// Date of the transaction (daily granularity)
    pub date: NaiveDate,

    /// Income or expense
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// Non-negative magnitude. Malformed or negative values deserialize as zero.
    #[serde(deserialize_with = "deserialize_amount", default)]
    pub amount: f64,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub category: Option<CategoryRef>,
}

impl Transaction {
    pub fn new(transaction_type: TransactionType, amount: f64, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            transaction_type,
            amount,
            description: None,
            category: None,
        }
    }

    pub fn income(amount: f64, date: NaiveDate) -> Self {
        Self::new(TransactionType::Income, amount, date)
    }

    pub fn expense(amount: f64, date: NaiveDate) -> Self {
        Self::new(TransactionType::Expense, amount, date)
    }

    /// Attach a category by name, without an explicit colour.
    #[must_use]
    pub fn in_category(mut self, name: impl Into<String>) -> Self {
        self.category = Some(CategoryRef::new(name, None));
        self
    }

    /// Attach a fully specified category reference.
    #[must_use]
    pub fn with_category(mut self, category: CategoryRef) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Category name used for grouping; `"Uncategorized"` when absent.
    pub fn category_name(&self) -> &str {
        self.category
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or(UNCATEGORIZED)
    }

    /// Explicit colour from the category record, if any.
    pub fn category_color(&self) -> Option<&str> {
        self.category.as_ref().and_then(|c| c.color.as_deref())
    }

    /// Amount as it contributes to aggregates. Non-finite or negative values count as zero.
    pub fn effective_amount(&self) -> f64 {
        sanitize_amount(self.amount)
    }
}

fn sanitize_amount(amount: f64) -> f64 {
    if amount.is_finite() && amount >= 0.0 {
        amount
    } else {
        0.0
    }
}

/// Accepts a JSON number, a numeric string, or anything else (coerced to `0.0`).
/// Negative magnitudes are treated as malformed.
///
/// Postgres `numeric` columns arrive as strings through PostgREST, so both
/// forms are common.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let amount = match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(sanitize_amount(amount))
}
