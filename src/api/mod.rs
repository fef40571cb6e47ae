use reqwest::StatusCode;
use std::fmt;

use crate::models::{CombinedData, MonthCode, Transaction};

pub mod product_client;
pub use product_client::ProductClient;

/// Errors raised while talking to the product API
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid request URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned status {status}")]
    Status { url: String, status: StatusCode },

    #[error("unexpected response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Parameters of one transaction page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    pub month: MonthCode,
    pub search: String,
    pub page: u32,
}

impl TransactionQuery {
    pub fn new(month: MonthCode, search: impl Into<String>, page: u32) -> Self {
        Self {
            month,
            search: search.into(),
            page: page.max(1),
        }
    }
}

impl fmt::Display for TransactionQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "month={} search='{}' page={}", self.month, self.search, self.page)
    }
}

/// Read side of the product API the dashboard depends on
#[async_trait::async_trait]
pub trait DashboardApi: Send + Sync {
    /// One page of transactions for a month, filtered by a search term
    async fn fetch_transactions(&self, query: &TransactionQuery) -> ApiResult<Vec<Transaction>>;

    /// Statistics, price-range buckets and category counts for a month
    async fn fetch_combined_data(&self, month: MonthCode) -> ApiResult<CombinedData>;
}
