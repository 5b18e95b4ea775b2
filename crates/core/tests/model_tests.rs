use chrono::NaiveDate;
use finance_tracker_core::models::analytics::{AggregateSummary, IncomeExpenseRatio};
use finance_tracker_core::models::category::Category;
use finance_tracker_core::models::chart::{CategoryBucket, ChartMode, Viewport};
use finance_tracker_core::models::date_range::DateRange;
use finance_tracker_core::models::settings::{Settings, DEFAULT_DEBOUNCE_MS, DEFAULT_ROW_CAP};
use finance_tracker_core::models::transaction::{
    CategoryRef, Transaction, TransactionType, UNCATEGORIZED,
};
use std::collections::HashMap;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
//  TransactionType
// ═══════════════════════════════════════════════════════════════════

mod transaction_type {
    use super::*;

    #[test]
    fn display_is_lowercase() {
        assert_eq!(TransactionType::Income.to_string(), "income");
        assert_eq!(TransactionType::Expense.to_string(), "expense");
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&TransactionType::Income).unwrap(), "\"income\"");
        let back: TransactionType = serde_json::from_str("\"expense\"").unwrap();
        assert_eq!(back, TransactionType::Expense);
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!(serde_json::from_str::<TransactionType>("\"transfer\"").is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Transaction
// ═══════════════════════════════════════════════════════════════════

mod transaction {
    use super::*;

    fn row(amount: &str) -> String {
        format!(
            r#"{{"id":"6f1c1f8e-4d7a-4b7e-9a55-2d3f5c1e0a11","date":"2025-01-15","type":"income","amount":{amount}}}"#
        )
    }

    #[test]
    fn builders_set_fields() {
        let t = Transaction::expense(42.0, d(2025, 1, 15))
            .in_category("Food")
            .with_description("Groceries");
        assert_eq!(t.transaction_type, TransactionType::Expense);
        assert_eq!(t.amount, 42.0);
        assert_eq!(t.category_name(), "Food");
        assert_eq!(t.category_color(), None);
        assert_eq!(t.description.as_deref(), Some("Groceries"));
    }

    #[test]
    fn ids_are_unique() {
        let a = Transaction::income(1.0, d(2025, 1, 1));
        let b = Transaction::income(1.0, d(2025, 1, 1));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn missing_category_reads_as_uncategorized() {
        let t = Transaction::income(1.0, d(2025, 1, 1));
        assert_eq!(t.category_name(), UNCATEGORIZED);
        assert_eq!(t.category_color(), None);
    }

    #[test]
    fn explicit_category_color() {
        let t = Transaction::income(1.0, d(2025, 1, 1))
            .with_category(CategoryRef::new("Salary", Some("#10b981".into())));
        assert_eq!(t.category_color(), Some("#10b981"));
    }

    #[test]
    fn numeric_amount() {
        let t: Transaction = serde_json::from_str(&row("1250.75")).unwrap();
        assert_eq!(t.amount, 1250.75);
    }

    #[test]
    fn string_amount() {
        let t: Transaction = serde_json::from_str(&row("\"300000.00\"")).unwrap();
        assert_eq!(t.amount, 300_000.0);
    }

    #[test]
    fn malformed_amount_is_zero() {
        for raw in ["\"abc\"", "null", "true", "{}", "\"\"", "\"NaN\"", "\"inf\""] {
            let t: Transaction = serde_json::from_str(&row(raw)).unwrap();
            assert_eq!(t.amount, 0.0, "amount {raw}");
        }
    }

    #[test]
    fn negative_amount_is_zero() {
        for raw in ["-50", "\"-50\"", "-0.01"] {
            let t: Transaction = serde_json::from_str(&row(raw)).unwrap();
            assert_eq!(t.amount, 0.0, "amount {raw}");
        }
    }

    #[test]
    fn negative_amount_does_not_count() {
        let t = Transaction::expense(-50.0, d(2025, 1, 15));
        assert_eq!(t.effective_amount(), 0.0);
    }

    #[test]
    fn missing_amount_is_zero() {
        let json = r#"{"id":"6f1c1f8e-4d7a-4b7e-9a55-2d3f5c1e0a11","date":"2025-01-15","type":"expense"}"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.amount, 0.0);
        assert!(t.category.is_none());
        assert!(t.description.is_none());
    }

    #[test]
    fn effective_amount_ignores_non_finite() {
        let mut t = Transaction::income(5.0, d(2025, 1, 1));
        assert_eq!(t.effective_amount(), 5.0);
        t.amount = f64::INFINITY;
        assert_eq!(t.effective_amount(), 0.0);
    }

    #[test]
    fn serializes_type_field() {
        let t = Transaction::income(5.0, d(2025, 1, 1));
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["type"], "income");
        assert_eq!(json["date"], "2025-01-01");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Category
// ═══════════════════════════════════════════════════════════════════

mod category {
    use super::*;

    #[test]
    fn accepts_only_matching_type() {
        let c = Category::new("Salary", TransactionType::Income, "#10b981");
        assert!(c.accepts(TransactionType::Income));
        assert!(!c.accepts(TransactionType::Expense));
    }

    #[test]
    fn to_ref_carries_name_and_color() {
        let c = Category::new("Food", TransactionType::Expense, "#ef4444");
        assert_eq!(c.to_ref(), CategoryRef::new("Food", Some("#ef4444".into())));
    }

    #[test]
    fn serde_uses_type_field() {
        let c = Category::new("Food", TransactionType::Expense, "#ef4444");
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["type"], "expense");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  DateRange
// ═══════════════════════════════════════════════════════════════════

mod date_range {
    use super::*;

    #[test]
    fn rejects_inverted_range() {
        assert!(DateRange::new(d(2025, 2, 1), d(2025, 1, 1)).is_err());
    }

    #[test]
    fn single_day_is_valid() {
        let r = DateRange::new(d(2025, 2, 1), d(2025, 2, 1)).unwrap();
        assert_eq!(r, DateRange::day(d(2025, 2, 1)));
        assert_eq!(r.num_days(), 1);
    }

    #[test]
    fn current_month_starts_on_first() {
        let r = DateRange::current_month(d(2025, 3, 18));
        assert_eq!(r.start(), d(2025, 3, 1));
        assert_eq!(r.end(), d(2025, 3, 18));
    }

    #[test]
    fn current_month_on_the_first() {
        let r = DateRange::current_month(d(2025, 3, 1));
        assert_eq!(r, DateRange::day(d(2025, 3, 1)));
    }

    #[test]
    fn with_start_snaps_end_forward() {
        let r = DateRange::new(d(2025, 1, 1), d(2025, 1, 31)).unwrap();
        assert_eq!(r.with_start(d(2025, 1, 10)).end(), d(2025, 1, 31));
        assert_eq!(r.with_start(d(2025, 2, 10)), DateRange::day(d(2025, 2, 10)));
    }

    #[test]
    fn with_end_snaps_start_back() {
        let r = DateRange::new(d(2025, 1, 10), d(2025, 1, 31)).unwrap();
        assert_eq!(r.with_end(d(2025, 1, 20)).start(), d(2025, 1, 10));
        assert_eq!(r.with_end(d(2025, 1, 5)), DateRange::day(d(2025, 1, 5)));
    }

    #[test]
    fn contains_is_inclusive() {
        let r = DateRange::new(d(2025, 1, 1), d(2025, 1, 31)).unwrap();
        assert!(r.contains(d(2025, 1, 1)));
        assert!(r.contains(d(2025, 1, 31)));
        assert!(!r.contains(d(2025, 2, 1)));
    }

    #[test]
    fn display_and_length() {
        let r = DateRange::new(d(2025, 1, 1), d(2025, 1, 31)).unwrap();
        assert_eq!(r.to_string(), "2025-01-01..2025-01-31");
        assert_eq!(r.num_days(), 31);
    }

    #[test]
    fn deserialize_enforces_order() {
        let ok: DateRange = serde_json::from_str(r#"{"start":"2025-01-01","end":"2025-01-31"}"#).unwrap();
        assert_eq!(ok.end(), d(2025, 1, 31));
        assert!(serde_json::from_str::<DateRange>(r#"{"start":"2025-02-01","end":"2025-01-31"}"#).is_err());
    }

    #[test]
    fn usable_as_map_key() {
        let mut map = HashMap::new();
        map.insert(DateRange::day(d(2025, 1, 1)), 1);
        assert_eq!(map.get(&DateRange::day(d(2025, 1, 1))), Some(&1));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Summary / chart types
// ═══════════════════════════════════════════════════════════════════

mod derived {
    use super::*;

    #[test]
    fn default_summary_is_zero() {
        let s = AggregateSummary::default();
        assert_eq!(s.total_income, 0.0);
        assert_eq!(s.savings_rate, 0.0);
        assert_eq!(s.income_expense_ratio, IncomeExpenseRatio::Infinite);
    }

    #[test]
    fn ratio_display() {
        assert_eq!(IncomeExpenseRatio::Finite(1.5).to_string(), "1.50");
        assert_eq!(IncomeExpenseRatio::Finite(2.0 / 3.0).formatted(), "0.67");
        assert_eq!(IncomeExpenseRatio::Infinite.formatted(), "∞");
    }

    #[test]
    fn bucket_record_tracks_dominant_type() {
        let mut b = CategoryBucket::new("Food", "#000000");
        b.record(TransactionType::Income, 10.0);
        assert_eq!(b.dominant_type, TransactionType::Income);
        b.record(TransactionType::Expense, 15.0);
        assert_eq!(b.dominant_type, TransactionType::Expense);
        assert_eq!(b.total, 25.0);
        assert_eq!(b.transaction_count, 2);
    }

    #[test]
    fn chart_mode_type_restriction() {
        assert_eq!(ChartMode::Combined.transaction_type(), None);
        assert_eq!(ChartMode::Income.transaction_type(), Some(TransactionType::Income));
        assert_eq!(ChartMode::Expense.transaction_type(), Some(TransactionType::Expense));
        assert_eq!(ChartMode::default(), ChartMode::Combined);
    }

    #[test]
    fn viewport_thresholds() {
        assert_eq!(Viewport::Compact.max_buckets(), 5);
        assert_eq!(Viewport::Compact.keep_buckets(), 4);
        assert_eq!(Viewport::Regular.max_buckets(), 8);
        assert_eq!(Viewport::Regular.keep_buckets(), 7);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Settings
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    fn valid() -> Settings {
        Settings {
            owner_id: "user-1".into(),
            ..Settings::default()
        }
    }

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.debounce_ms, DEFAULT_DEBOUNCE_MS);
        assert_eq!(s.debounce_ms, 800);
        assert_eq!(s.row_cap, DEFAULT_ROW_CAP);
        assert_eq!(s.row_cap, 100);
        assert_eq!(s.viewport, Viewport::Regular);
        assert_eq!(s.debounce(), std::time::Duration::from_millis(800));
    }

    #[test]
    fn from_json_fills_missing_fields() {
        let s = Settings::from_json(r#"{"owner_id":"abc","viewport":"compact"}"#).unwrap();
        assert_eq!(s.owner_id, "abc");
        assert_eq!(s.viewport, Viewport::Compact);
        assert_eq!(s.row_cap, 100);
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(Settings::from_json("not json").is_err());
    }

    #[test]
    fn lookup_overrides_defaults() {
        let vars: HashMap<&str, &str> = [
            ("FINANCE_TRACKER_API_URL", "https://db.example.com"),
            ("FINANCE_TRACKER_OWNER_ID", "owner-9"),
            ("FINANCE_TRACKER_DEBOUNCE_MS", "250"),
            ("FINANCE_TRACKER_ROW_CAP", " 50 "),
        ]
        .into_iter()
        .collect();
        let s = Settings::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(s.api_url, "https://db.example.com");
        assert_eq!(s.owner_id, "owner-9");
        assert_eq!(s.debounce_ms, 250);
        assert_eq!(s.row_cap, 50);
        assert_eq!(s.api_key, "");
    }

    #[test]
    fn lookup_rejects_non_numeric_debounce() {
        let err = Settings::from_lookup(|k| {
            (k == "FINANCE_TRACKER_DEBOUNCE_MS").then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("FINANCE_TRACKER_DEBOUNCE_MS"));
    }

    #[test]
    fn validate_accepts_complete_settings() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn validate_requires_owner() {
        assert!(Settings::default().validate().is_err());
    }

    #[test]
    fn validate_requires_row_cap() {
        let s = Settings { row_cap: 0, ..valid() };
        assert!(s.validate().is_err());
    }

    #[test]
    fn validate_requires_http_url() {
        let s = Settings { api_url: "ftp://db".into(), ..valid() };
        assert!(s.validate().is_err());
    }
}
