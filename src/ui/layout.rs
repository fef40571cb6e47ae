use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Areas of the ready dashboard
pub struct DashboardLayout {
    pub title: Rect,
    pub controls: Rect,
    pub transactions: Rect,
    pub pagination: Rect,
    pub statistics: Rect,
    pub price_chart: Rect,
    pub category_chart: Rect,
}

impl DashboardLayout {
    /// Create a new layout from the given area
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Title
                Constraint::Length(3),  // Month + search controls
                Constraint::Min(6),     // Transactions table
                Constraint::Length(3),  // Pagination
                Constraint::Length(14), // Statistics and charts
            ])
            .split(area);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(40),
                Constraint::Percentage(35),
            ])
            .split(rows[4]);

        Self {
            title: rows[0],
            controls: rows[1],
            transactions: rows[2],
            pagination: rows[3],
            statistics: bottom[0],
            price_chart: bottom[1],
            category_chart: bottom[2],
        }
    }

    /// Month dropdown, search input, search button
    pub fn split_controls(&self) -> [Rect; 3] {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(24),
                Constraint::Min(20),
                Constraint::Length(20),
            ])
            .split(self.controls);
        [chunks[0], chunks[1], chunks[2]]
    }

    /// One area per statistics tile
    pub fn split_statistics(&self) -> [Rect; 3] {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(self.statistics);
        [chunks[0], chunks[1], chunks[2]]
    }

    /// Popup for the month dropdown, anchored under the month control
    pub fn month_picker(&self, frame: Rect) -> Rect {
        let anchor = self.split_controls()[0];
        let height = 14.min(frame.height.saturating_sub(anchor.y + 1));
        Rect {
            x: anchor.x,
            y: (anchor.y + anchor.height).min(frame.bottom().saturating_sub(height)),
            width: anchor.width.min(frame.width),
            height,
        }
    }
}

/// Split a chart block into the drawing and its legend
pub fn split_chart_and_legend(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    (chunks[0], chunks[1])
}
