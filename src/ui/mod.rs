use anyhow::Result;
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

pub mod app;
pub mod components;
pub mod events;
pub mod layout;
pub mod state;
pub mod view;

pub use app::{run_app, DashboardApp};
pub use state::{DashboardData, DashboardState, RenderState, StateUpdate};
pub use view::ControlsView;

/// Render the dashboard into an off-screen buffer and return it as text
pub fn render_to_string(state: &DashboardState, controls: &ControlsView, width: u16, height: u16) -> Result<String> {
    let mut terminal = Terminal::new(TestBackend::new(width, height))?;
    terminal.draw(|f| view::render(f, state, controls))?;
    Ok(buffer_to_string(terminal.backend().buffer()))
}

/// One line per buffer row, trailing blanks trimmed
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let width = buffer.area.width as usize;
    if width == 0 {
        return String::new();
    }

    buffer
        .content()
        .chunks(width)
        .map(|row| {
            let line: String = row.iter().map(|cell| cell.symbol()).collect();
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
