pub mod errors;
pub mod logging;
pub mod models;
pub mod notify;
pub mod services;
pub mod store;

use chrono::NaiveDate;
use models::{
    analytics::{AggregateSummary, MonthlyBreakdown},
    chart::{CategoryBucket, ChartMode, NetCategory, Viewport},
    date_range::DateRange,
    settings::Settings,
    transaction::Transaction,
};
use notify::{Notifier, TracingNotifier};
use services::{
    analytics_service::AnalyticsService,
    chart_service::ChartService,
    export_service::ExportService,
    fetch_coordinator::{FetchCoordinator, FetchState},
};
use std::sync::Arc;
use store::{rest::RestTransactionStore, traits::TransactionStore};

use errors::CoreError;

/// Main entry point for the finance tracker core library.
/// Holds the selected date range, the fetched transactions and the services
/// that turn them into summary cards and chart data.
///
/// Must be used from within a Tokio runtime: committing, applying or resetting
/// a range spawns the debounce timer.
#[must_use]
pub struct FinanceTracker {
    settings: Settings,
    coordinator: FetchCoordinator,
    analytics_service: AnalyticsService,
    chart_service: ChartService,
    export_service: ExportService,
}

impl std::fmt::Debug for FinanceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinanceTracker")
            .field("owner_id", &self.settings.owner_id)
            .field("viewport", &self.chart_service.viewport())
            .field("coordinator", &self.coordinator)
            .finish()
    }
}

impl FinanceTracker {
    /// Build a tracker over any transaction store.
    /// The initial range is the current month; call [`Self::reset_to_current_month`]
    /// or commit a range to load data.
    pub fn new(
        settings: Settings,
        store: Arc<dyn TransactionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, CoreError> {
        settings.validate()?;

        let today = chrono::Utc::now().date_naive();
        let coordinator = FetchCoordinator::new(
            store,
            notifier,
            settings.owner_id.clone(),
            DateRange::current_month(today),
        )
        .with_debounce(settings.debounce())
        .with_row_cap(settings.row_cap);
        let chart_service = ChartService::new(settings.viewport);

        Ok(Self {
            settings,
            coordinator,
            analytics_service: AnalyticsService::new(),
            chart_service,
            export_service: ExportService::new(),
        })
    }

    /// Build a tracker against the REST backend named in `settings`, using the
    /// session token obtained by the caller's sign-in flow. Notices go to the log.
    pub fn connect(settings: Settings, access_token: &str) -> Result<Self, CoreError> {
        let store = RestTransactionStore::new(
            settings.api_url.clone(),
            settings.api_key.clone(),
            access_token,
        );
        Self::new(settings, Arc::new(store), Arc::new(TracingNotifier))
    }

    // ── Date Range ──────────────────────────────────────────────────

    /// Edit the start of the tentative range (no fetch).
    pub fn set_tentative_start(&mut self, start: NaiveDate) {
        self.coordinator.set_tentative_start(start);
    }

    /// Edit the end of the tentative range (no fetch).
    pub fn set_tentative_end(&mut self, end: NaiveDate) {
        self.coordinator.set_tentative_end(end);
    }

    /// Commit the tentative range and schedule a fetch.
    pub fn apply_range(&mut self) {
        self.coordinator.apply_tentative();
    }

    /// Commit an explicit range and schedule a fetch.
    pub fn commit_range(&mut self, range: DateRange) {
        self.coordinator.commit_range(range);
    }

    /// Reset both ranges to the current month (UTC) and schedule a fetch.
    pub fn reset_to_current_month(&mut self) {
        let today = chrono::Utc::now().date_naive();
        self.coordinator.reset_to_current_month(today);
    }

    #[must_use]
    pub fn tentative_range(&self) -> DateRange {
        self.coordinator.tentative()
    }

    #[must_use]
    pub fn committed_range(&self) -> DateRange {
        self.coordinator.committed()
    }

    #[must_use]
    pub fn fetch_state(&self) -> FetchState {
        self.coordinator.state()
    }

    /// Wait until no fetch is pending or in flight.
    pub async fn wait_until_idle(&self) {
        self.coordinator.wait_until_idle().await;
    }

    // ── Derived Views ───────────────────────────────────────────────

    /// The transactions currently displayed, newest first.
    #[must_use]
    pub fn transactions(&self) -> Arc<Vec<Transaction>> {
        self.coordinator.transactions()
    }

    #[must_use]
    pub fn summary(&self) -> AggregateSummary {
        self.analytics_service
            .compute_summary(&self.coordinator.transactions())
    }

    #[must_use]
    pub fn category_buckets(&self, mode: ChartMode) -> Vec<CategoryBucket> {
        self.chart_service
            .category_buckets(&self.coordinator.transactions(), mode)
    }

    #[must_use]
    pub fn top_categories_by_net(&self) -> Vec<NetCategory> {
        self.chart_service
            .top_categories_by_net(&self.coordinator.transactions())
    }

    #[must_use]
    pub fn monthly_breakdown(&self) -> Vec<MonthlyBreakdown> {
        self.analytics_service
            .monthly_breakdown(&self.coordinator.transactions())
    }

    /// Switch between compact and regular chart layouts.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.settings.viewport = viewport;
        self.chart_service.set_viewport(viewport);
    }

    // ── Export ──────────────────────────────────────────────────────

    /// The displayed transactions as CSV.
    #[must_use]
    pub fn export_csv(&self) -> String {
        self.export_service
            .transactions_to_csv(&self.coordinator.transactions())
    }

    /// Download name for the export. Named after the displayed range, or the
    /// committed range before anything has loaded.
    #[must_use]
    pub fn export_file_name(&self) -> String {
        let range = self
            .coordinator
            .last_fetched()
            .unwrap_or_else(|| self.coordinator.committed());
        self.export_service.file_name(&range)
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
