use chrono::NaiveDate;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::CoreError;
use crate::models::date_range::DateRange;
use crate::models::settings::{DEFAULT_DEBOUNCE_MS, DEFAULT_ROW_CAP};
use crate::models::transaction::Transaction;
use crate::notify::{NoticeKind, Notifier};
use crate::store::traits::{TransactionQuery, TransactionStore};

/// Where the coordinator is in its fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    /// Nothing scheduled, nothing in flight
    Idle,
    /// A committed range is waiting for the quiet period to elapse
    PendingDebounce,
    /// The latest request is in flight
    Fetching,
}

impl std::fmt::Display for FetchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchState::Idle => write!(f, "idle"),
            FetchState::PendingDebounce => write!(f, "pending"),
            FetchState::Fetching => write!(f, "fetching"),
        }
    }
}

struct Inner {
    state: FetchState,
    tentative: DateRange,
    committed: DateRange,
    /// Range of the most recently issued request. Commits equal to it are not refetched.
    requested: Option<DateRange>,
    last_fetched: Option<DateRange>,
    timer_generation: u64,
    latest_request: u64,
    /// Whether the latest request is still running.
    in_flight: bool,
    transactions: Arc<Vec<Transaction>>,
    fetch_count: u64,
}

/// State shared between the coordinator and its timer tasks.
#[derive(Clone)]
struct Shared {
    store: Arc<dyn TransactionStore>,
    notifier: Arc<dyn Notifier>,
    owner_id: String,
    row_cap: usize,
    inner: Arc<Mutex<Inner>>,
    state_tx: Arc<watch::Sender<FetchState>>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, inner: &mut Inner, state: FetchState) {
        inner.state = state;
        self.state_tx.send_replace(state);
    }

    /// Timer expiry: issue the request for the committed range unless superseded.
    async fn fire(self, generation: u64) {
        let (request, range) = {
            let mut inner = self.lock();
            if inner.timer_generation != generation {
                return;
            }
            let range = inner.committed;
            inner.latest_request += 1;
            inner.requested = Some(range);
            inner.in_flight = true;
            self.set_state(&mut inner, FetchState::Fetching);
            (inner.latest_request, range)
        };

        info!(%range, request, backend = self.store.name(), "fetching transactions");
        let query = TransactionQuery::new(self.owner_id.clone(), range, self.row_cap);
        let result = self.store.fetch_transactions(&query).await;
        self.complete(request, range, result);
    }

    /// Apply a response. Only the latest request may change what is displayed.
    fn complete(
        &self,
        request: u64,
        range: DateRange,
        result: Result<Vec<Transaction>, CoreError>,
    ) {
        let error = {
            let mut inner = self.lock();
            if inner.latest_request != request {
                debug!(%range, request, "discarding stale response");
                return;
            }
            inner.in_flight = false;

            match result {
                Ok(transactions) => {
                    info!(%range, rows = transactions.len(), "transactions loaded");
                    inner.transactions = Arc::new(transactions);
                    inner.last_fetched = Some(range);
                    inner.fetch_count += 1;
                    if inner.state == FetchState::Fetching {
                        self.set_state(&mut inner, FetchState::Idle);
                    }
                    return;
                }
                Err(e) => {
                    warn!(%range, error = %e, "fetch failed, keeping previous transactions");
                    // Allow the same range to be retried.
                    inner.requested = inner.last_fetched;
                    e
                }
            }
        };

        self.notifier
            .show(&format!("Failed to load transactions: {error}"), NoticeKind::Error);

        let mut inner = self.lock();
        if inner.state == FetchState::Fetching && inner.latest_request == request {
            self.set_state(&mut inner, FetchState::Idle);
        }
    }
}

/// Turns date-range edits into at most one fetch per settled range.
///
/// - **Tentative vs committed**: start/end edits only touch the tentative range.
///   Nothing is fetched until the range is applied, committed or reset.
/// - **Debounce**: a commit arms a timer (trailing edge). A newer commit before
///   it fires cancels and rearms it, so only the last value is fetched.
/// - **Redundancy**: a commit equal to the most recently requested range is ignored.
/// - **Last request wins**: each request gets a sequence number; responses to
///   superseded requests are dropped, even if they arrive last.
/// - **Failures**: logged and surfaced through the [`Notifier`]; the previous
///   transactions stay in place.
///
/// Must be used from within a Tokio runtime: commits spawn the timer task.
pub struct FetchCoordinator {
    shared: Shared,
    debounce: Duration,
    timer: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for FetchCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.shared.lock();
        f.debug_struct("FetchCoordinator")
            .field("state", &inner.state)
            .field("committed", &inner.committed)
            .field("last_fetched", &inner.last_fetched)
            .field("rows", &inner.transactions.len())
            .field("debounce", &self.debounce)
            .finish()
    }
}

impl FetchCoordinator {
    /// Create an idle coordinator. `initial` seeds both the tentative and the
    /// committed range; no fetch is scheduled until a commit.
    pub fn new(
        store: Arc<dyn TransactionStore>,
        notifier: Arc<dyn Notifier>,
        owner_id: impl Into<String>,
        initial: DateRange,
    ) -> Self {
        let (state_tx, _) = watch::channel(FetchState::Idle);
        let inner = Inner {
            state: FetchState::Idle,
            tentative: initial,
            committed: initial,
            requested: None,
            last_fetched: None,
            timer_generation: 0,
            latest_request: 0,
            in_flight: false,
            transactions: Arc::new(Vec::new()),
            fetch_count: 0,
        };

        Self {
            shared: Shared {
                store,
                notifier,
                owner_id: owner_id.into(),
                row_cap: DEFAULT_ROW_CAP,
                inner: Arc::new(Mutex::new(inner)),
                state_tx: Arc::new(state_tx),
            },
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            timer: None,
        }
    }

    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    #[must_use]
    pub fn with_row_cap(mut self, row_cap: usize) -> Self {
        self.shared.row_cap = row_cap;
        self
    }

    // ── Range editing ───────────────────────────────────────────────

    /// Edit the tentative start. An inverted range snaps the end forward.
    pub fn set_tentative_start(&mut self, start: NaiveDate) {
        let mut inner = self.shared.lock();
        inner.tentative = inner.tentative.with_start(start);
    }

    /// Edit the tentative end. An inverted range snaps the start back.
    pub fn set_tentative_end(&mut self, end: NaiveDate) {
        let mut inner = self.shared.lock();
        inner.tentative = inner.tentative.with_end(end);
    }

    /// Commit the tentative range.
    pub fn apply_tentative(&mut self) {
        let range = self.shared.lock().tentative;
        self.commit_range(range);
    }

    /// Set tentative and committed to `[first day of month, today]`.
    pub fn reset_to_current_month(&mut self, today: NaiveDate) {
        self.commit_range(DateRange::current_month(today));
    }

    /// Commit a range (and mirror it into the tentative range), arming the debounce timer.
    pub fn commit_range(&mut self, range: DateRange) {
        let generation = {
            let mut inner = self.shared.lock();
            inner.tentative = range;
            inner.committed = range;

            if inner.requested == Some(range) {
                if inner.state == FetchState::PendingDebounce {
                    inner.timer_generation += 1;
                    if let Some(timer) = self.timer.take() {
                        timer.abort();
                    }
                    let next = if inner.in_flight {
                        FetchState::Fetching
                    } else {
                        FetchState::Idle
                    };
                    self.shared.set_state(&mut inner, next);
                }
                debug!(%range, "range already requested, not refetching");
                return;
            }

            // A timer that already fired owns an in-flight request; let it finish.
            if inner.state == FetchState::PendingDebounce {
                if let Some(timer) = self.timer.take() {
                    timer.abort();
                }
            }
            inner.timer_generation += 1;
            self.shared.set_state(&mut inner, FetchState::PendingDebounce);
            inner.timer_generation
        };

        debug!(%range, debounce_ms = self.debounce.as_millis() as u64, "debounce armed");
        let shared = self.shared.clone();
        // Deadline is fixed at commit time, not when the task first gets polled.
        let deadline = tokio::time::Instant::now() + self.debounce;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            shared.fire(generation).await;
        }));
    }

    // ── Observation ─────────────────────────────────────────────────

    #[must_use]
    pub fn state(&self) -> FetchState {
        self.shared.lock().state
    }

    #[must_use]
    pub fn tentative(&self) -> DateRange {
        self.shared.lock().tentative
    }

    #[must_use]
    pub fn committed(&self) -> DateRange {
        self.shared.lock().committed
    }

    /// Range of the data currently displayed, if any fetch has succeeded.
    #[must_use]
    pub fn last_fetched(&self) -> Option<DateRange> {
        self.shared.lock().last_fetched
    }

    /// The transactions currently displayed, newest first.
    #[must_use]
    pub fn transactions(&self) -> Arc<Vec<Transaction>> {
        Arc::clone(&self.shared.lock().transactions)
    }

    /// Number of successful responses applied so far.
    #[must_use]
    pub fn fetch_count(&self) -> u64 {
        self.shared.lock().fetch_count
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.shared.state_tx.subscribe()
    }

    /// Resolve once nothing is pending or in flight.
    pub async fn wait_until_idle(&self) {
        let mut rx = self.subscribe();
        let _ = rx.wait_for(|state| *state == FetchState::Idle).await;
    }
}

impl Drop for FetchCoordinator {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
