use reqwest::{header::{HeaderMap, HeaderValue, ACCEPT}, Client};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::models::{CombinedData, Config, MonthCode, Transaction};
use super::{ApiError, ApiResult, DashboardApi, TransactionQuery};

/// HTTP client for the product transactions API
#[derive(Debug, Clone)]
pub struct ProductClient {
    client: Client,
    base_url: String,
}

impl ProductClient {
    /// Create a new client from configuration
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut builder = Client::builder().user_agent("sales-dashboard/0.1");
        // No timeout unless one is configured; a hung request keeps the dashboard loading.
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        // Fail early on a base URL that can never produce a valid request
        Url::parse(&config.api_base_url)
            .map_err(|e| anyhow::anyhow!("invalid API base URL '{}': {}", config.api_base_url, e))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/transactions?month=MM&search=TERM&page=N`
    pub fn transactions_url(&self, query: &TransactionQuery) -> ApiResult<Url> {
        let page = query.page.to_string();
        let month = query.month.to_string();
        self.endpoint("transactions", &[
            ("month", month.as_str()),
            ("search", query.search.as_str()),
            ("page", page.as_str()),
        ])
    }

    /// `{base}/combined-data?month=MM`
    pub fn combined_data_url(&self, month: MonthCode) -> ApiResult<Url> {
        let month = month.to_string();
        self.endpoint("combined-data", &[("month", month.as_str())])
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> ApiResult<Url> {
        let raw = format!("{}/{}", self.base_url, path);
        let mut url = Url::parse(&raw).map_err(|source| ApiError::InvalidUrl { url: raw, source })?;
        url.query_pairs_mut().extend_pairs(params.iter().copied());
        Ok(url)
    }

    /// GET a JSON document and decode it into `T`
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        debug!("Making request to: {}", url);

        let response = self.client
            .get(url.clone())
            .headers(headers)
            .send()
            .await
            .map_err(|source| ApiError::Transport { url: url.to_string(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { url: url.to_string(), status });
        }

        let body = response
            .text()
            .await
            .map_err(|source| ApiError::Transport { url: url.to_string(), source })?;
        debug!("API response received: {} bytes", body.len());

        serde_json::from_str(&body).map_err(|source| ApiError::Decode { url: url.to_string(), source })
    }
}

#[async_trait::async_trait]
impl DashboardApi for ProductClient {
    async fn fetch_transactions(&self, query: &TransactionQuery) -> ApiResult<Vec<Transaction>> {
        let url = self.transactions_url(query)?;
        let transactions: Vec<Transaction> = self.get_json(url).await?;
        debug!("Retrieved {} transactions for {}", transactions.len(), query);
        Ok(transactions)
    }

    async fn fetch_combined_data(&self, month: MonthCode) -> ApiResult<CombinedData> {
        let url = self.combined_data_url(month)?;
        let data: CombinedData = self.get_json(url).await?;
        debug!(
            "Retrieved combined data for month {}: {} price ranges, {} categories",
            month,
            data.price_range.len(),
            data.categories.len()
        );
        Ok(data)
    }
}
