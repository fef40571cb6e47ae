//! Integration tests for the product API client against a mock server

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{client_for, client_with_timeout, fixtures, logging::log_test_step, API_PREFIX};
use sales_dashboard::api::{ApiError, DashboardApi, ProductClient, TransactionQuery};
use sales_dashboard::models::{Config, MonthCode};

#[tokio::test]
async fn test_fetch_transactions_sends_month_search_and_page() {
    log_test_step("Fetching a transaction page");
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/transactions", API_PREFIX)))
        .and(query_param("month", "03"))
        .and(query_param("search", "pack"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::transactions_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let query = TransactionQuery::new(MonthCode::MARCH, "pack", 2);
    let transactions = client.fetch_transactions(&query).await.expect("transactions");

    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0].title, "Fjallraven Backpack");
    assert_eq!(transactions[0].price, 109.95);
    assert!(transactions[1].sold);
}

#[tokio::test]
async fn test_fetch_combined_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/combined-data", API_PREFIX)))
        .and(query_param("month", "11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::combined_data_json()))
        .expect(1)
        .mount(&server)
        .await;

    let data = client_for(&server)
        .fetch_combined_data(MonthCode::new(11).unwrap())
        .await
        .expect("combined data");

    assert_eq!(data.statistics.total_sale_amount, Some(1234.5));
    let labels: Vec<&str> = data.price_range.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(labels, vec!["0-100", "101-200", "901-above"]);
    assert_eq!(data.categories[1].id, "Clothing");
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/combined-data", API_PREFIX)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client_for(&server).fetch_combined_data(MonthCode::MARCH).await;
    assert_matches!(result, Err(ApiError::Status { status, .. }) if status == StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_malformed_payload_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/transactions", API_PREFIX)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "items": [] })))
        .mount(&server)
        .await;

    let query = TransactionQuery::new(MonthCode::MARCH, "", 1);
    let result = client_for(&server).fetch_transactions(&query).await;
    assert_matches!(result, Err(ApiError::Decode { .. }));
}

#[tokio::test]
async fn test_missing_combined_fields_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/combined-data", API_PREFIX)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "statistics": {} })))
        .mount(&server)
        .await;

    let result = client_for(&server).fetch_combined_data(MonthCode::MARCH).await;
    assert_matches!(result, Err(ApiError::Decode { .. }));
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    // Port 9 (discard) is closed on test machines
    let config = Config {
        api_base_url: "http://127.0.0.1:9/api/product".to_string(),
        ..Config::default()
    };
    let client = ProductClient::new(&config).unwrap();

    let result = client.fetch_combined_data(MonthCode::MARCH).await;
    assert_matches!(result, Err(ApiError::Transport { .. }));
}

#[tokio::test]
async fn test_configured_timeout_applies() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/combined-data", API_PREFIX)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(fixtures::combined_data_json())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = client_with_timeout(&server, Some(Duration::from_millis(300)));
    let result = client.fetch_combined_data(MonthCode::MARCH).await;
    assert_matches!(result, Err(ApiError::Transport { source, .. }) if source.is_timeout());
}
