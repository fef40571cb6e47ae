//! Dashboard refresh orchestration
//!
//! One refresh issues the transaction page request and the combined-data
//! request concurrently and only succeeds when both do.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::{ApiError, DashboardApi, TransactionQuery};
use crate::ui::events::AppEvent;
use crate::ui::state::{DashboardData, DashboardState, RefreshOutcome, RefreshTicket};

/// Result of a refresh that ran off the app loop
#[derive(Debug)]
pub struct FetchCompletion {
    pub seq: u64,
    pub result: Result<DashboardData, ApiError>,
}

#[derive(Clone)]
pub struct DataFetcher {
    api: Arc<dyn DashboardApi>,
}

impl DataFetcher {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self { api }
    }

    /// Fetch both payloads for `query`; either failure fails the whole load
    pub async fn load(&self, query: &TransactionQuery) -> Result<DashboardData, ApiError> {
        let (transactions, combined) = tokio::try_join!(
            self.api.fetch_transactions(query),
            self.api.fetch_combined_data(query.month),
        )?;

        Ok(DashboardData {
            transactions,
            statistics: combined.statistics,
            price_ranges: combined.price_range,
            categories: combined.categories,
        })
    }

    /// Refresh `state` for its current selection and wait for the result
    pub async fn refresh(&self, state: &mut DashboardState) -> RefreshOutcome {
        let ticket = state.begin_refresh();
        let result = self.load(&ticket.query).await;
        state.complete_refresh(ticket.seq, result)
    }

    /// Run the refresh on a tokio task and post the completion to the app loop
    pub fn spawn(&self, ticket: RefreshTicket, events: mpsc::Sender<AppEvent>) -> tokio::task::JoinHandle<()> {
        let fetcher = self.clone();
        tokio::spawn(async move {
            let RefreshTicket { seq, query } = ticket;
            debug!("Fetching dashboard data for refresh #{}: {}", seq, query);
            let result = fetcher.load(&query).await;
            if events.send(AppEvent::FetchCompleted(FetchCompletion { seq, result })).await.is_err() {
                warn!("Refresh #{} finished after the dashboard closed", seq);
            }
        })
    }
}
