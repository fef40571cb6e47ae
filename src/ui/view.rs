use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, ListState, Paragraph, Row, Table,
    },
    Frame,
};

use crate::models::{MonthCode, Transaction};
use crate::ui::components::{
    self, bar_series, format_price, format_sale_date, format_sold, pie_slices, slice_at, stat_tiles, BAR_COLOR,
};
use crate::ui::events::Focus;
use crate::ui::layout::{split_chart_and_legend, DashboardLayout};
use crate::ui::state::{DashboardData, DashboardState, RenderState};

pub const TITLE: &str = "Product Transactions Dashboard";
pub const SEARCH_PLACEHOLDER: &str = "Search transactions";

/// Control state owned by the app rather than the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlsView {
    pub focus: Focus,
    pub picker_index: usize,
}

impl Default for ControlsView {
    fn default() -> Self {
        Self {
            focus: Focus::Dashboard,
            picker_index: MonthCode::default().index(),
        }
    }
}

/// Month dropdown options: (code, full month name)
pub fn month_options() -> Vec<(MonthCode, &'static str)> {
    MonthCode::all().map(|m| (m, m.name())).collect()
}

/// Pagination buttons for the current page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub previous_enabled: bool,
    pub label: String,
    pub next_enabled: bool,
}

pub fn pagination(page: u32) -> PaginationView {
    PaginationView {
        previous_enabled: page > 1,
        label: format!("Page {}", page),
        next_enabled: true,
    }
}

/// Table cells for one transaction, in column order
pub fn transaction_cells(tx: &Transaction) -> [String; 6] {
    [
        tx.title.clone(),
        tx.description.clone(),
        format_price(tx.price),
        tx.category.clone(),
        format_sold(tx.sold).to_string(),
        format_sale_date(&tx.date_of_sale),
    ]
}

/// Draw the whole dashboard for the current state
pub fn render(f: &mut Frame, state: &DashboardState, controls: &ControlsView) {
    let area = f.area();
    match state.render_state() {
        RenderState::Loading => components::render_loading_indicator(f, area, "Loading..."),
        RenderState::Error(message) => components::render_error(f, area, message),
        RenderState::Ready(data) => render_ready(f, area, state, data, controls),
    }
}

fn render_ready(f: &mut Frame, area: Rect, state: &DashboardState, data: &DashboardData, controls: &ControlsView) {
    let layout = DashboardLayout::new(area);

    render_title(f, layout.title);
    render_controls(f, &layout, state, controls);
    render_transactions(f, layout.transactions, &data.transactions);
    render_pagination(f, layout.pagination, state.selection().page);
    render_statistics(f, &layout, data);
    render_price_chart(f, layout.price_chart, data);
    render_category_chart(f, layout.category_chart, data);

    if controls.focus == Focus::MonthPicker {
        render_month_picker(f, layout.month_picker(area), controls.picker_index);
    }
}

fn render_title(f: &mut Frame, area: Rect) {
    let hints = Line::from(vec![
        Span::styled("m", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::styled(" month • ", Style::default().fg(Color::Gray)),
        Span::styled("/", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::styled(" search • ", Style::default().fg(Color::Gray)),
        Span::styled("←/→", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::styled(" page • ", Style::default().fg(Color::Gray)),
        Span::styled("Q", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::styled(" quit", Style::default().fg(Color::Gray)),
    ]);

    let title = Paragraph::new(Line::from(TITLE))
        .block(Block::default().borders(Borders::ALL).title_bottom(hints.right_aligned()))
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    f.render_widget(title, area);
}

fn focused_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn render_controls(f: &mut Frame, layout: &DashboardLayout, state: &DashboardState, controls: &ControlsView) {
    let [month_area, search_area, button_area] = layout.split_controls();
    let selection = state.selection();

    let month = Paragraph::new(format!("{} ▾", selection.month.name())).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Month (m)")
            .border_style(focused_border(controls.focus == Focus::MonthPicker)),
    );
    f.render_widget(month, month_area);

    let editing = controls.focus == Focus::SearchInput;
    let search_line = if selection.search_term.is_empty() && !editing {
        Line::from(Span::styled(SEARCH_PLACEHOLDER, Style::default().fg(Color::DarkGray)))
    } else if editing {
        Line::from(vec![
            Span::raw(selection.search_term.as_str()),
            Span::styled("█", Style::default().fg(Color::Yellow)),
        ])
    } else {
        Line::from(selection.search_term.as_str())
    };
    let search = Paragraph::new(search_line).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Search (/)")
            .border_style(focused_border(editing)),
    );
    f.render_widget(search, search_area);

    let button = Paragraph::new("[ Search ]")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Enter"))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(button, button_area);
}

fn render_transactions(f: &mut Frame, area: Rect, transactions: &[Transaction]) {
    let block = Block::default().borders(Borders::ALL).title("Transactions");

    if transactions.is_empty() {
        let empty = Paragraph::new("No transactions found")
            .alignment(Alignment::Center)
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(["Title", "Description", "Price", "Category", "Sold", "Date of Sale"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    let rows = transactions.iter().map(|tx| Row::new(transaction_cells(tx)));
    let widths = [
        Constraint::Percentage(20),
        Constraint::Percentage(34),
        Constraint::Length(10),
        Constraint::Percentage(16),
        Constraint::Length(5),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths).header(header).block(block).column_spacing(1);
    f.render_widget(table, area);
}

fn render_pagination(f: &mut Frame, area: Rect, page: u32) {
    let view = pagination(page);
    let button_style = |enabled: bool| {
        if enabled {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };

    let line = Line::from(vec![
        Span::styled("◀ Previous", button_style(view.previous_enabled)),
        Span::raw("   "),
        Span::styled(view.label, Style::default().fg(Color::Cyan)),
        Span::raw("   "),
        Span::styled("Next ▶", button_style(view.next_enabled)),
    ]);
    let paragraph = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn render_statistics(f: &mut Frame, layout: &DashboardLayout, data: &DashboardData) {
    let tiles = stat_tiles(&data.statistics);
    for (tile, area) in tiles.iter().zip(layout.split_statistics()) {
        let paragraph = Paragraph::new(tile.value.as_str())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(tile.label))
            .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD));
        f.render_widget(paragraph, area);
    }
}

fn render_price_chart(f: &mut Frame, area: Rect, data: &DashboardData) {
    let block = Block::default().borders(Borders::ALL).title("Price Range Distribution");
    let series = bar_series(&data.price_ranges);
    if series.is_empty() {
        f.render_widget(Paragraph::new("No data").block(block), area);
        return;
    }

    let inner_width = area.width.saturating_sub(2);
    let bar_width = (inner_width / series.len() as u16).saturating_sub(1).clamp(1, 10);

    let bars: Vec<Bar> = series
        .iter()
        .map(|(label, count)| Bar::default().label(Line::from(label.as_str())).value(*count))
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(BAR_COLOR))
        .value_style(Style::default().fg(Color::Black).bg(BAR_COLOR));
    f.render_widget(chart, area);
}

fn render_category_chart(f: &mut Frame, area: Rect, data: &DashboardData) {
    let block = Block::default().borders(Borders::ALL).title("Category Distribution");
    let slices = pie_slices(&data.categories);
    if slices.is_empty() {
        f.render_widget(Paragraph::new("No data").block(block), area);
        return;
    }

    let inner = block.inner(area);
    f.render_widget(block, area);
    let (pie_area, legend_area) = split_chart_and_legend(inner);

    // Cells are about twice as tall as wide; widen x bounds to keep the pie round
    let half_width = if pie_area.height > 0 {
        pie_area.width as f64 / (pie_area.height as f64 * 2.0)
    } else {
        1.0
    };

    let steps = 60;
    let mut points: Vec<Vec<(f64, f64)>> = vec![Vec::new(); slices.len()];
    for i in 0..=steps {
        for j in 0..=steps {
            let x = -1.0 + 2.0 * i as f64 / steps as f64;
            let y = -1.0 + 2.0 * j as f64 / steps as f64;
            if x * x + y * y > 0.95 * 0.95 {
                continue;
            }
            if let Some(index) = slice_at(&slices, y.atan2(x)) {
                points[index].push((x, y));
            }
        }
    }

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([-half_width.max(1.0), half_width.max(1.0)])
        .y_bounds([-1.0, 1.0])
        .paint(|ctx| {
            for (slice, coords) in slices.iter().zip(points.iter()) {
                ctx.draw(&Points { coords: coords.as_slice(), color: slice.color });
            }
        });
    f.render_widget(canvas, pie_area);

    let legend: Vec<ListItem> = slices
        .iter()
        .map(|slice| {
            ListItem::new(Line::from(vec![
                Span::styled("■ ", Style::default().fg(slice.color)),
                Span::raw(slice.label.clone()),
                Span::styled(
                    format!(" {} ({:.0}%)", slice.count, slice.share() * 100.0),
                    Style::default().fg(Color::Gray),
                ),
            ]))
        })
        .collect();
    f.render_widget(List::new(legend), legend_area);
}

fn render_month_picker(f: &mut Frame, area: Rect, selected: usize) {
    let items: Vec<ListItem> = month_options()
        .into_iter()
        .map(|(_, name)| ListItem::new(name))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Select month"))
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Yellow))
        .highlight_symbol("▶ ");

    let mut list_state = ListState::default().with_selected(Some(selected.min(11)));
    f.render_widget(Clear, area);
    f.render_stateful_widget(list, area, &mut list_state);
}
