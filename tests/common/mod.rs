//! Common test utilities and helpers

use sales_dashboard::api::ProductClient;
use sales_dashboard::data_fetcher::DataFetcher;
use sales_dashboard::models::Config;
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

pub const API_PREFIX: &str = "/api/product";

/// Client pointed at a mock server
pub fn client_for(server: &MockServer) -> ProductClient {
    client_with_timeout(server, None)
}

pub fn client_with_timeout(server: &MockServer, timeout: Option<Duration>) -> ProductClient {
    let config = Config {
        api_base_url: format!("{}{}", server.uri(), API_PREFIX),
        request_timeout: timeout,
        ..Config::default()
    };
    ProductClient::new(&config).expect("Failed to create client")
}

pub fn fetcher_for(server: &MockServer) -> DataFetcher {
    DataFetcher::new(Arc::new(client_for(server)))
}

/// JSON payloads shaped like the backend responses
pub mod fixtures {
    use serde_json::{json, Value};

    pub fn transactions_json() -> Value {
        json!([
            {
                "title": "Fjallraven Backpack",
                "description": "Your perfect pack for everyday use",
                "price": 109.95,
                "category": "men's clothing",
                "sold": false,
                "dateOfSale": "2022-03-27T20:29:54+05:30"
            },
            {
                "title": "Mens Casual Slim Fit",
                "description": "The color could be slightly different",
                "price": 15.99,
                "category": "men's clothing",
                "sold": true,
                "dateOfSale": "2022-03-02T09:15:00Z"
            }
        ])
    }

    pub fn combined_data_json() -> Value {
        json!({
            "statistics": {
                "totalSaleAmount": 1234.5,
                "totalSoldItems": 10,
                "totalNotSoldItems": 5
            },
            "priceRange": [
                { "_id": "0-100", "count": 7 },
                { "_id": "101-200", "count": 3 },
                { "_id": "901-above", "count": 1 }
            ],
            "categories": [
                { "_id": "Electronics", "count": 4 },
                { "_id": "Clothing", "count": 6 }
            ]
        })
    }
}

/// Logging utilities for tests
pub mod logging {
    use std::sync::Once;
    use tracing::{debug, info};

    static INIT: Once = Once::new();

    /// Initialize test logging
    #[allow(dead_code)]
    pub fn init_test_logging() {
        INIT.call_once(|| {
            // Another test may already have installed a subscriber
            let _ = tracing::subscriber::set_global_default(
                tracing_subscriber::fmt()
                    .with_env_filter("sales_dashboard=debug")
                    .with_test_writer()
                    .finish(),
            );
        });
    }

    /// Log test step
    pub fn log_test_step(step: &str) {
        info!("🧪 Test Step: {}", step);
    }

    /// Log test data
    pub fn log_test_data<T: std::fmt::Debug>(label: &str, data: &T) {
        debug!("📊 {}: {:?}", label, data);
    }
}
