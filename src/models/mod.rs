use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api/product";

/// One product transaction as returned by `/transactions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub sold: bool,
    pub date_of_sale: DateTime<Utc>,
}

/// Monthly aggregate figures. The backend may omit any of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(default)]
    pub total_sale_amount: Option<f64>,
    #[serde(default)]
    pub total_sold_items: Option<u64>,
    #[serde(default)]
    pub total_not_sold_items: Option<u64>,
}

/// Named price interval with the number of transactions inside it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRangeBucket {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub count: u64,
}

/// Number of transactions per category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub count: u64,
}

/// Payload of `/combined-data`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedData {
    pub statistics: Statistics,
    pub price_range: Vec<PriceRangeBucket>,
    pub categories: Vec<CategoryCount>,
}

/// Calendar month, serialized as a zero-padded two digit code ("01" = January)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthCode(u8);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid month code '{0}', expected 01-12")]
pub struct InvalidMonth(pub String);

impl MonthCode {
    pub const MARCH: MonthCode = MonthCode(3);

    pub fn new(month: u8) -> Result<Self, InvalidMonth> {
        if (1..=12).contains(&month) {
            Ok(Self(month))
        } else {
            Err(InvalidMonth(month.to_string()))
        }
    }

    /// All twelve months in calendar order
    pub fn all() -> impl Iterator<Item = MonthCode> {
        (1..=12).map(MonthCode)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Zero-based position, used as the dropdown index
    pub fn index(self) -> usize {
        self.0 as usize - 1
    }

    pub fn from_index(index: usize) -> Option<Self> {
        u8::try_from(index + 1).ok().and_then(|m| Self::new(m).ok())
    }

    /// Full English month name
    pub fn name(self) -> &'static str {
        chrono::Month::try_from(self.0)
            .map(|m| m.name())
            .unwrap_or("Unknown")
    }

    pub fn next(self) -> Self {
        Self(self.0 % 12 + 1)
    }

    pub fn previous(self) -> Self {
        Self(if self.0 == 1 { 12 } else { self.0 - 1 })
    }
}

impl Default for MonthCode {
    fn default() -> Self {
        MonthCode::MARCH
    }
}

impl fmt::Display for MonthCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl FromStr for MonthCode {
    type Err = InvalidMonth;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.len() > 2 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidMonth(s.to_string()));
        }
        trimmed
            .parse::<u8>()
            .ok()
            .and_then(|m| MonthCode::new(m).ok())
            .ok_or_else(|| InvalidMonth(s.to_string()))
    }
}

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub initial_month: MonthCode,
    pub request_timeout: Option<Duration>,
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            initial_month: MonthCode::default(),
            request_timeout: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let initial_month = match lookup("DASHBOARD_INITIAL_MONTH") {
            Some(raw) => raw
                .parse()
                .map_err(|e| anyhow::anyhow!("DASHBOARD_INITIAL_MONTH: {}", e))?,
            None => MonthCode::default(),
        };

        let request_timeout = match lookup("DASHBOARD_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    anyhow::anyhow!("DASHBOARD_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{}'", raw)
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Config {
            api_base_url: lookup("DASHBOARD_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            initial_month,
            request_timeout,
            log_file: lookup("DASHBOARD_LOG_FILE").filter(|path| !path.is_empty()),
        })
    }
}
