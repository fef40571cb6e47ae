//! Selection invariants exercised through the public handler API

use pretty_assertions::assert_eq;
use sales_dashboard::models::MonthCode;
use sales_dashboard::ui::events::{self, Effect};
use sales_dashboard::ui::DashboardState;

#[test]
fn test_every_month_change_resets_page() {
    let mut state = DashboardState::default();
    state.begin_refresh();

    for month in MonthCode::all() {
        for _ in 0..3 {
            events::on_next_page(&mut state);
        }
        events::on_month_change(&mut state, month);
        let ticket = state.begin_refresh();
        assert_eq!(ticket.query.month, month);
        assert_eq!(ticket.query.page, 1, "page not reset for month {}", month);
    }
}

#[test]
fn test_previous_page_never_goes_below_one() {
    let mut state = DashboardState::default();
    state.begin_refresh();

    events::on_next_page(&mut state);
    events::on_next_page(&mut state);
    for _ in 0..5 {
        events::on_prev_page(&mut state);
    }
    assert_eq!(state.selection().page, 1);
}

#[test]
fn test_search_term_survives_pagination() {
    let mut state = DashboardState::default();
    state.begin_refresh();
    state.set_search_term("kids");

    assert_eq!(events::on_next_page(&mut state), Effect::Refresh);
    let ticket = state.begin_refresh();
    assert_eq!(ticket.query.search, "kids");
    assert_eq!(ticket.query.page, 2);
}
