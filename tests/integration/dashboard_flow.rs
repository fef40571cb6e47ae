//! End-to-end refresh cycles: handlers, fetcher and state store against a mock API

use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{fetcher_for, fixtures, logging::{init_test_logging, log_test_step}, API_PREFIX};
use sales_dashboard::models::MonthCode;
use sales_dashboard::ui::events::{self, Effect};
use sales_dashboard::ui::state::{RefreshOutcome, FETCH_ERROR_MESSAGE};
use sales_dashboard::ui::{render_to_string, ControlsView, DashboardState};

async fn mount_month(server: &MockServer, month: &str) {
    Mock::given(method("GET"))
        .and(path(format!("{}/transactions", API_PREFIX)))
        .and(query_param("month", month))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::transactions_json()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/combined-data", API_PREFIX)))
        .and(query_param("month", month))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::combined_data_json()))
        .mount(server)
        .await;
}

/// Query strings the server received, in arrival order
async fn received_queries(server: &MockServer) -> Vec<String> {
    let mut queries: Vec<String> = server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| format!("{}?{}", r.url.path(), r.url.query().unwrap_or("")))
        .collect();
    queries.sort();
    queries
}

#[test_log::test(tokio::test)]
async fn test_initial_load_requests_march_page_one() {
    log_test_step("Initial load");
    let server = MockServer::start().await;
    mount_month(&server, "03").await;

    let fetcher = fetcher_for(&server);
    let mut state = DashboardState::default();
    assert!(state.dependencies_changed());

    assert_eq!(fetcher.refresh(&mut state).await, RefreshOutcome::Applied);

    assert_eq!(received_queries(&server).await, vec![
        "/api/product/combined-data?month=03".to_string(),
        "/api/product/transactions?month=03&search=&page=1".to_string(),
    ]);
    assert!(!state.is_loading());
    assert_eq!(state.error(), None);
    assert_eq!(state.data().transactions.len(), 2);
    assert_eq!(state.data().price_ranges.len(), 3);
    assert_eq!(state.data().categories.len(), 2);
}

#[tokio::test]
async fn test_ready_screen_shows_statistics_and_charts() {
    init_test_logging();
    let server = MockServer::start().await;
    mount_month(&server, "03").await;

    let mut state = DashboardState::default();
    fetcher_for(&server).refresh(&mut state).await;

    let screen = render_to_string(&state, &ControlsView::default(), 140, 42).unwrap();
    for expected in ["$1234.50", "10", "5", "Electronics", "Clothing", "0-100", "Fjallraven Backpack", "2022-03-27", "No"] {
        assert!(screen.contains(expected), "missing {:?} in\n{}", expected, screen);
    }
}

#[tokio::test]
async fn test_month_change_resets_page_before_fetch() {
    let server = MockServer::start().await;
    mount_month(&server, "03").await;
    mount_month(&server, "04").await;

    let fetcher = fetcher_for(&server);
    let mut state = DashboardState::default();
    fetcher.refresh(&mut state).await;

    assert_eq!(events::on_next_page(&mut state), Effect::Refresh);
    fetcher.refresh(&mut state).await;
    assert_eq!(state.selection().page, 2);

    assert_eq!(events::on_month_change(&mut state, MonthCode::new(4).unwrap()), Effect::Refresh);
    fetcher.refresh(&mut state).await;

    let queries = received_queries(&server).await;
    assert!(queries.contains(&"/api/product/transactions?month=03&search=&page=2".to_string()));
    assert!(queries.contains(&"/api/product/transactions?month=04&search=&page=1".to_string()));
    assert!(queries.contains(&"/api/product/combined-data?month=04".to_string()));
}

#[tokio::test]
async fn test_search_submit_fetches_first_page_with_term() {
    let server = MockServer::start().await;
    mount_month(&server, "03").await;

    let fetcher = fetcher_for(&server);
    let mut state = DashboardState::default();
    state.set_page(3);
    fetcher.refresh(&mut state).await;

    for c in "slim fit".chars() {
        events::on_search_input(&mut state, c);
    }
    assert_eq!(events::on_search_submit(&mut state), Effect::Refresh);
    fetcher.refresh(&mut state).await;

    let queries = received_queries(&server).await;
    assert!(
        queries.contains(&"/api/product/transactions?month=03&search=slim+fit&page=1".to_string()),
        "{:?}",
        queries
    );
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_data() {
    let server = MockServer::start().await;
    mount_month(&server, "03").await;
    // April's aggregate endpoint fails while its transactions succeed
    Mock::given(method("GET"))
        .and(path(format!("{}/transactions", API_PREFIX)))
        .and(query_param("month", "04"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/combined-data", API_PREFIX)))
        .and(query_param("month", "04"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server);
    let mut state = DashboardState::default();
    fetcher.refresh(&mut state).await;
    let before = state.data().clone();

    events::on_month_change(&mut state, MonthCode::new(4).unwrap());
    assert_eq!(fetcher.refresh(&mut state).await, RefreshOutcome::Failed);

    assert!(!state.is_loading());
    assert_eq!(state.error(), Some(FETCH_ERROR_MESSAGE));
    assert_eq!(state.data(), &before);

    let screen = render_to_string(&state, &ControlsView::default(), 100, 20).unwrap();
    assert!(screen.contains(FETCH_ERROR_MESSAGE));
    assert!(!screen.contains("Fjallraven"));
}

#[tokio::test]
async fn test_page_past_the_end_renders_empty_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/transactions", API_PREFIX)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/combined-data", API_PREFIX)))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::combined_data_json()))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server);
    let mut state = DashboardState::default();
    state.set_page(99);
    assert_eq!(fetcher.refresh(&mut state).await, RefreshOutcome::Applied);
    assert_eq!(state.error(), None);

    let screen = render_to_string(&state, &ControlsView::default(), 120, 40).unwrap();
    assert!(screen.contains("No transactions found"));
    assert!(screen.contains("Page 99"));
}
