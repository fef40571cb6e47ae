use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::data_fetcher::FetchCompletion;
use crate::models::MonthCode;
use crate::ui::state::DashboardState;

/// What the app loop must do after a handler ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    Refresh,
}

/// Refresh only when month or page moved away from the last request
fn schedule(state: &DashboardState) -> Effect {
    if state.dependencies_changed() {
        Effect::Refresh
    } else {
        Effect::None
    }
}

pub fn on_month_change(state: &mut DashboardState, month: MonthCode) -> Effect {
    state.set_month(month);
    schedule(state)
}

/// Resets to page 1 and refreshes with the current search term right away
pub fn on_search_submit(state: &mut DashboardState) -> Effect {
    state.set_page(1);
    Effect::Refresh
}

pub fn on_prev_page(state: &mut DashboardState) -> Effect {
    let page = state.selection().page.saturating_sub(1).max(1);
    state.set_page(page);
    schedule(state)
}

// No upper bound: the server decides what lies past the last page.
pub fn on_next_page(state: &mut DashboardState) -> Effect {
    let page = state.selection().page.saturating_add(1);
    state.set_page(page);
    schedule(state)
}

pub fn on_search_input(state: &mut DashboardState, c: char) -> Effect {
    state.push_search_char(c);
    Effect::None
}

pub fn on_search_backspace(state: &mut DashboardState) -> Effect {
    state.pop_search_char();
    Effect::None
}

/// Which control receives key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Dashboard,
    SearchInput,
    MonthPicker,
}

/// User intent decoded from a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    OpenMonthPicker,
    PickerUp,
    PickerDown,
    PickerConfirm,
    CloseMonthPicker,
    PreviousMonth,
    NextMonth,
    FocusSearch,
    LeaveSearch,
    SearchInput(char),
    SearchBackspace,
    SubmitSearch,
    PreviousPage,
    NextPage,
    Ignore,
}

/// Map a key to an action given the focused control
pub fn key_action(focus: Focus, key: KeyCode) -> Action {
    match focus {
        Focus::SearchInput => match key {
            KeyCode::Enter => Action::SubmitSearch,
            KeyCode::Esc | KeyCode::Tab => Action::LeaveSearch,
            KeyCode::Backspace => Action::SearchBackspace,
            KeyCode::Char(c) => Action::SearchInput(c),
            _ => Action::Ignore,
        },
        Focus::MonthPicker => match key {
            KeyCode::Up | KeyCode::Char('k') => Action::PickerUp,
            KeyCode::Down | KeyCode::Char('j') => Action::PickerDown,
            KeyCode::Enter => Action::PickerConfirm,
            KeyCode::Esc | KeyCode::Char('m') => Action::CloseMonthPicker,
            _ => Action::Ignore,
        },
        Focus::Dashboard => match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('m') | KeyCode::Char('M') => Action::OpenMonthPicker,
            KeyCode::Char('[') => Action::PreviousMonth,
            KeyCode::Char(']') => Action::NextMonth,
            KeyCode::Char('/') | KeyCode::Tab => Action::FocusSearch,
            KeyCode::Enter | KeyCode::Char('s') | KeyCode::Char('S') => Action::SubmitSearch,
            KeyCode::Left | KeyCode::Char('p') | KeyCode::Char('P') => Action::PreviousPage,
            KeyCode::Right | KeyCode::Char('n') | KeyCode::Char('N') => Action::NextPage,
            _ => Action::Ignore,
        },
    }
}

/// Events consumed by the app loop
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyCode),
    Resize(u16, u16),
    FetchCompleted(FetchCompletion),
}

/// Merges terminal input with fetch completions posted by background tasks
pub struct EventManager {
    event_sender: mpsc::Sender<AppEvent>,
    event_receiver: mpsc::Receiver<AppEvent>,
    poll_interval: Duration,
}

impl EventManager {
    pub fn new() -> Self {
        let (event_sender, event_receiver) = mpsc::channel::<AppEvent>(100);
        Self {
            event_sender,
            event_receiver,
            poll_interval: Duration::from_millis(50),
        }
    }

    /// Get a clone of the event sender for use in async tasks
    pub fn sender(&self) -> mpsc::Sender<AppEvent> {
        self.event_sender.clone()
    }

    /// Next pending event; `None` when nothing happened during one poll interval
    pub async fn next(&mut self) -> Result<Option<AppEvent>> {
        if let Ok(event) = self.event_receiver.try_recv() {
            return Ok(Some(event));
        }

        if crossterm::event::poll(self.poll_interval)? {
            return Ok(match crossterm::event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key.code)),
                Event::Resize(width, height) => Some(AppEvent::Resize(width, height)),
                _ => None,
            });
        }

        // Let spawned fetches deliver before the next terminal poll
        tokio::task::yield_now().await;
        Ok(self.event_receiver.try_recv().ok())
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}
