use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

use super::traits::{TransactionQuery, TransactionStore};
use crate::errors::{redact_query, CoreError};
use crate::models::transaction::{deserialize_amount, CategoryRef, Transaction, TransactionType};

const BACKEND: &str = "REST";
const TRANSACTIONS_PATH: &str = "/rest/v1/transactions";
const SELECT_COLUMNS: &str = "id,date,type,amount,description,categories(name,color)";

/// Reads transactions from a PostgREST-compatible backend.
///
/// - **Auth**: the project API key goes in the `apikey` header, the user's
///   session token in `Authorization: Bearer`.
/// - **Join**: each row embeds its category (`categories(name,color)`), or `null`.
/// - **Order**: newest first, capped by the query limit.
pub struct RestTransactionStore {
    client: Client,
    api_url: String,
    api_key: String,
    access_token: String,
}

impl RestTransactionStore {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            access_token: access_token.into(),
        }
    }

    /// Full request URL for a query, filters encoded as PostgREST operators.
    pub fn request_url(&self, query: &TransactionQuery) -> Result<Url, CoreError> {
        let base = format!("{}{TRANSACTIONS_PATH}", self.api_url);
        let owner = format!("eq.{}", query.owner_id);
        let from = format!("gte.{}", query.range.start().format("%Y-%m-%d"));
        let to = format!("lte.{}", query.range.end().format("%Y-%m-%d"));
        let limit = query.limit.to_string();

        Url::parse_with_params(
            &base,
            &[
                ("select", SELECT_COLUMNS),
                ("user_id", owner.as_str()),
                ("date", from.as_str()),
                ("date", to.as_str()),
                ("order", "date.desc"),
                ("limit", limit.as_str()),
            ],
        )
        .map_err(|e| CoreError::Config(format!("Invalid api_url '{}': {e}", self.api_url)))
    }
}

// ── Wire types ──────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TransactionRow {
    id: Uuid,
    date: NaiveDate,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    #[serde(deserialize_with = "deserialize_amount", default)]
    amount: f64,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    categories: Option<CategoryRef>,
}

impl From<TransactionRow> for Transaction {
    fn from(row: TransactionRow) -> Self {
        Transaction {
            id: row.id,
            date: row.date,
            transaction_type: row.transaction_type,
            amount: row.amount,
            description: row.description,
            category: row.categories,
        }
    }
}

/// Parse a PostgREST response body into transactions.
pub fn parse_transactions(body: &str) -> Result<Vec<Transaction>, CoreError> {
    let rows: Vec<TransactionRow> = serde_json::from_str(body)?;
    Ok(rows.into_iter().map(Transaction::from).collect())
}

#[async_trait]
impl TransactionStore for RestTransactionStore {
    fn name(&self) -> &str {
        BACKEND
    }

    async fn fetch_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<Transaction>, CoreError> {
        let url = self.request_url(query)?;

        let resp = self
            .client
            .get(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(CoreError::Unauthorized(format!(
                "{BACKEND} backend rejected the session (HTTP {status})"
            )));
        }
        if !status.is_success() {
            return Err(CoreError::Api {
                backend: BACKEND.into(),
                message: format!("HTTP {status}: {}", redact_query(body.trim())),
            });
        }

        parse_transactions(&body)
    }
}
