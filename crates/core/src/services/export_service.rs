use crate::models::date_range::DateRange;
use crate::models::transaction::Transaction;

const CSV_HEADER: &str = "date,type,category,amount,description";

/// Serializes the displayed transactions for download.
pub struct ExportService;

impl ExportService {
    pub fn new() -> Self {
        Self
    }

    /// CSV with columns `date,type,category,amount,description`.
    ///
    /// Only the description is quoted; embedded quotes are doubled.
    /// Rows keep the order they were given in.
    pub fn transactions_to_csv(&self, transactions: &[Transaction]) -> String {
        let mut csv = String::from(CSV_HEADER);
        csv.push('\n');
        for transaction in transactions {
            let description = transaction.description.as_deref().unwrap_or("");
            csv.push_str(&format!(
                "{},{},{},{},\"{}\"\n",
                transaction.date,
                transaction.transaction_type,
                transaction.category_name(),
                transaction.effective_amount(),
                description.replace('"', "\"\""),
            ));
        }
        csv
    }

    /// Suggested download name, e.g. `transactions_2025-01-01_2025-01-31.csv`.
    pub fn file_name(&self, range: &DateRange) -> String {
        format!("transactions_{}_{}.csv", range.start(), range.end())
    }
}

impl Default for ExportService {
    fn default() -> Self {
        Self::new()
    }
}
