use anyhow::Result;
use crossterm::{
    event::KeyCode,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io;
use tokio::sync::{broadcast::error::TryRecvError, mpsc};
use tracing::{debug, info};

use crate::data_fetcher::{DataFetcher, FetchCompletion};
use crate::models::MonthCode;
use super::events::{self, key_action, Action, AppEvent, Effect, EventManager, Focus};
use super::state::{DashboardState, RefreshOutcome};
use super::view::{self, ControlsView};

/// Dashboard controller: owns the state store and dispatches input to the handlers
pub struct DashboardApp {
    pub state: DashboardState,
    pub controls: ControlsView,
    pub should_quit: bool,
    fetcher: DataFetcher,
}

impl DashboardApp {
    pub fn new(fetcher: DataFetcher, initial_month: MonthCode) -> Self {
        Self {
            state: DashboardState::new(initial_month),
            controls: ControlsView {
                focus: Focus::Dashboard,
                picker_index: initial_month.index(),
            },
            should_quit: false,
            fetcher,
        }
    }

    pub fn draw(&self, f: &mut Frame) {
        view::render(f, &self.state, &self.controls);
    }

    /// Apply one key press and report whether a refresh is due
    pub fn handle_key(&mut self, key: KeyCode) -> Effect {
        let action = key_action(self.controls.focus, key);
        debug!("Key {:?} -> {:?}", key, action);

        match action {
            Action::Quit => {
                self.should_quit = true;
                Effect::None
            }
            Action::OpenMonthPicker => {
                self.controls.focus = Focus::MonthPicker;
                self.controls.picker_index = self.state.selection().month.index();
                Effect::None
            }
            Action::PickerUp => {
                self.controls.picker_index = self.controls.picker_index.checked_sub(1).unwrap_or(11);
                Effect::None
            }
            Action::PickerDown => {
                self.controls.picker_index = (self.controls.picker_index + 1) % 12;
                Effect::None
            }
            Action::PickerConfirm => {
                self.controls.focus = Focus::Dashboard;
                match MonthCode::from_index(self.controls.picker_index) {
                    Some(month) => events::on_month_change(&mut self.state, month),
                    None => Effect::None,
                }
            }
            Action::CloseMonthPicker => {
                self.controls.focus = Focus::Dashboard;
                Effect::None
            }
            Action::PreviousMonth => {
                let month = self.state.selection().month.previous();
                events::on_month_change(&mut self.state, month)
            }
            Action::NextMonth => {
                let month = self.state.selection().month.next();
                events::on_month_change(&mut self.state, month)
            }
            Action::FocusSearch => {
                self.controls.focus = Focus::SearchInput;
                Effect::None
            }
            Action::LeaveSearch => {
                self.controls.focus = Focus::Dashboard;
                Effect::None
            }
            Action::SearchInput(c) => events::on_search_input(&mut self.state, c),
            Action::SearchBackspace => events::on_search_backspace(&mut self.state),
            Action::SubmitSearch => {
                self.controls.focus = Focus::Dashboard;
                events::on_search_submit(&mut self.state)
            }
            Action::PreviousPage => events::on_prev_page(&mut self.state),
            Action::NextPage => events::on_next_page(&mut self.state),
            Action::Ignore => Effect::None,
        }
    }

    /// Start a refresh on a background task
    pub fn start_refresh(&mut self, events: mpsc::Sender<AppEvent>) {
        let ticket = self.state.begin_refresh();
        self.fetcher.spawn(ticket, events);
    }

    pub fn finish_refresh(&mut self, completion: FetchCompletion) -> RefreshOutcome {
        self.state.complete_refresh(completion.seq, completion.result)
    }
}

/// Run the main TUI application
pub async fn run_app(mut app: DashboardApp) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app).await;

    // Cleanup terminal
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

async fn event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut DashboardApp) -> Result<()> {
    let mut events = EventManager::new();
    let mut updates = app.state.subscribe();

    // Initial load
    app.start_refresh(events.sender());
    info!("Dashboard started for month {}", app.state.selection().month);

    let mut dirty = true;
    loop {
        if dirty {
            terminal.draw(|f| app.draw(f))?;
            dirty = false;
        }

        match events.next().await? {
            Some(AppEvent::Key(key)) => {
                if app.handle_key(key) == Effect::Refresh {
                    app.start_refresh(events.sender());
                }
                dirty = true;
            }
            Some(AppEvent::Resize(width, height)) => {
                debug!("Terminal resized to {}x{}", width, height);
                dirty = true;
            }
            Some(AppEvent::FetchCompleted(completion)) => {
                app.finish_refresh(completion);
            }
            None => {}
        }

        if app.should_quit {
            break;
        }

        // Any store mutation schedules a redraw
        loop {
            match updates.try_recv() {
                Ok(_) | Err(TryRecvError::Lagged(_)) => dirty = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }

    info!("Dashboard closed");
    Ok(())
}
