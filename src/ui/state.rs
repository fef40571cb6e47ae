use tokio::sync::broadcast;
use tracing::{debug, error, warn};

use crate::api::{ApiError, TransactionQuery};
use crate::models::{CategoryCount, MonthCode, PriceRangeBucket, Statistics, Transaction};

/// Message shown for every failed refresh, whatever the cause
pub const FETCH_ERROR_MESSAGE: &str = "An error occurred while fetching data. Please try again.";

/// Everything one successful refresh produces
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    pub transactions: Vec<Transaction>,
    pub statistics: Statistics,
    pub price_ranges: Vec<PriceRangeBucket>,
    pub categories: Vec<CategoryCount>,
}

/// What the user has picked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub month: MonthCode,
    pub search_term: String,
    pub page: u32,
}

impl Selection {
    pub fn new(month: MonthCode) -> Self {
        Self {
            month,
            search_term: String::new(),
            page: 1,
        }
    }

    pub fn query(&self) -> TransactionQuery {
        TransactionQuery::new(self.month, self.search_term.clone(), self.page)
    }

    /// The values a change of which triggers a refresh
    fn dependencies(&self) -> (MonthCode, u32) {
        (self.month, self.page)
    }
}

/// The three mutually exclusive things the view can show
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderState<'a> {
    Loading,
    Error(&'a str),
    Ready(&'a DashboardData),
}

/// Notifications published on every state mutation
#[derive(Debug, Clone, PartialEq)]
pub enum StateUpdate {
    SelectionChanged,
    RefreshStarted { seq: u64, query: TransactionQuery },
    RefreshSucceeded { seq: u64 },
    RefreshFailed { seq: u64 },
    StaleResponseDiscarded { seq: u64 },
}

/// Handle for one in-flight refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTicket {
    pub seq: u64,
    pub query: TransactionQuery,
}

/// How a completed refresh was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    Failed,
    /// A newer refresh was started after this one; the result was dropped
    Stale,
}

/// Dashboard state store
///
/// Only event handlers and refresh completions mutate it. Each mutation is
/// published to subscribers so the renderer can redraw.
#[derive(Debug)]
pub struct DashboardState {
    selection: Selection,
    data: DashboardData,
    loading: bool,
    error: Option<String>,
    next_seq: u64,
    latest_seq: Option<u64>,
    requested: Option<(MonthCode, u32)>,
    updates: broadcast::Sender<StateUpdate>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(MonthCode::default())
    }
}

impl DashboardState {
    pub fn new(initial_month: MonthCode) -> Self {
        let (updates, _) = broadcast::channel::<StateUpdate>(100);
        Self {
            selection: Selection::new(initial_month),
            data: DashboardData::default(),
            loading: true,
            error: None,
            next_seq: 0,
            latest_seq: None,
            requested: None,
            updates,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn data(&self) -> &DashboardData {
        &self.data
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn render_state(&self) -> RenderState<'_> {
        if self.loading {
            RenderState::Loading
        } else if let Some(message) = &self.error {
            RenderState::Error(message)
        } else {
            RenderState::Ready(&self.data)
        }
    }

    /// Subscribe to state updates
    pub fn subscribe(&self) -> broadcast::Receiver<StateUpdate> {
        self.updates.subscribe()
    }

    fn publish(&self, update: StateUpdate) {
        // No subscribers is fine
        let _ = self.updates.send(update);
    }

    pub fn set_month(&mut self, month: MonthCode) {
        self.selection.month = month;
        self.selection.page = 1;
        self.publish(StateUpdate::SelectionChanged);
    }

    pub fn set_page(&mut self, page: u32) {
        self.selection.page = page.max(1);
        self.publish(StateUpdate::SelectionChanged);
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.selection.search_term = term.into();
        self.publish(StateUpdate::SelectionChanged);
    }

    pub fn push_search_char(&mut self, c: char) {
        self.selection.search_term.push(c);
        self.publish(StateUpdate::SelectionChanged);
    }

    pub fn pop_search_char(&mut self) {
        if self.selection.search_term.pop().is_some() {
            self.publish(StateUpdate::SelectionChanged);
        }
    }

    /// True when month or page differ from what was last requested
    pub fn dependencies_changed(&self) -> bool {
        self.requested != Some(self.selection.dependencies())
    }

    /// Enter the loading state and hand out a ticket for the current selection
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.latest_seq = Some(seq);
        self.requested = Some(self.selection.dependencies());
        self.loading = true;
        self.error = None;

        let query = self.selection.query();
        debug!("Refresh #{} started: {}", seq, query);
        self.publish(StateUpdate::RefreshStarted { seq, query: query.clone() });
        RefreshTicket { seq, query }
    }

    /// Apply the result of the refresh identified by `seq`
    pub fn complete_refresh(&mut self, seq: u64, result: Result<DashboardData, ApiError>) -> RefreshOutcome {
        if self.latest_seq != Some(seq) {
            warn!("Discarding response of superseded refresh #{}", seq);
            self.publish(StateUpdate::StaleResponseDiscarded { seq });
            return RefreshOutcome::Stale;
        }

        self.loading = false;
        match result {
            Ok(data) => {
                debug!(
                    "Refresh #{} applied: {} transactions, {} price ranges, {} categories",
                    seq,
                    data.transactions.len(),
                    data.price_ranges.len(),
                    data.categories.len()
                );
                self.data = data;
                self.error = None;
                self.publish(StateUpdate::RefreshSucceeded { seq });
                RefreshOutcome::Applied
            }
            Err(e) => {
                error!("Error fetching data: {}", e);
                self.error = Some(FETCH_ERROR_MESSAGE.to_string());
                self.publish(StateUpdate::RefreshFailed { seq });
                RefreshOutcome::Failed
            }
        }
    }
}
