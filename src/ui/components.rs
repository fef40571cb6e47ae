/// Formatting helpers and chart models for the dashboard view
use chrono::{DateTime, Utc};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::{CategoryCount, PriceRangeBucket, Statistics};

/// Slice colors, assigned by position
pub const PALETTE: [Color; 5] = [
    Color::Rgb(0x00, 0x88, 0xFE),
    Color::Rgb(0x00, 0xC4, 0x9F),
    Color::Rgb(0xFF, 0xBB, 0x28),
    Color::Rgb(0xFF, 0x80, 0x42),
    Color::Rgb(0x88, 0x84, 0xD8),
];

pub const BAR_COLOR: Color = Color::Rgb(0x88, 0x84, 0xD8);

pub fn palette_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

/// `$` followed by the amount with two decimals
pub fn format_price(amount: f64) -> String {
    format!("${:.2}", amount)
}

pub fn format_sale_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_sold(sold: bool) -> &'static str {
    if sold { "Yes" } else { "No" }
}

/// One statistics tile
#[derive(Debug, Clone, PartialEq)]
pub struct StatTile {
    pub label: &'static str,
    pub value: String,
}

/// The three fixed tiles; absent figures show as zero
pub fn stat_tiles(statistics: &Statistics) -> [StatTile; 3] {
    [
        StatTile {
            label: "Total Sale Amount",
            value: format_price(statistics.total_sale_amount.unwrap_or(0.0)),
        },
        StatTile {
            label: "Total Sold Items",
            value: statistics.total_sold_items.unwrap_or(0).to_string(),
        },
        StatTile {
            label: "Total Not Sold Items",
            value: statistics.total_not_sold_items.unwrap_or(0).to_string(),
        },
    ]
}

/// Bars in server order: (bucket label, count)
pub fn bar_series(buckets: &[PriceRangeBucket]) -> Vec<(String, u64)> {
    buckets.iter().map(|b| (b.id.clone(), b.count)).collect()
}

/// One pie slice. Angles are in radians, counter-clockwise from 3 o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub count: u64,
    pub color: Color,
    pub start_angle: f64,
    pub sweep: f64,
}

impl PieSlice {
    pub fn share(&self) -> f64 {
        self.sweep / std::f64::consts::TAU
    }

    pub fn contains_angle(&self, angle: f64) -> bool {
        angle >= self.start_angle && angle < self.start_angle + self.sweep
    }
}

/// Slices proportional to each category count
pub fn pie_slices(categories: &[CategoryCount]) -> Vec<PieSlice> {
    let total: u64 = categories.iter().map(|c| c.count).sum();
    let mut start_angle = 0.0;

    categories
        .iter()
        .enumerate()
        .map(|(index, category)| {
            let sweep = if total == 0 {
                0.0
            } else {
                category.count as f64 / total as f64 * std::f64::consts::TAU
            };
            let slice = PieSlice {
                label: category.id.clone(),
                count: category.count,
                color: palette_color(index),
                start_angle,
                sweep,
            };
            start_angle += sweep;
            slice
        })
        .collect()
}

/// Index of the slice covering the given angle, normalized into [0, TAU)
pub fn slice_at(slices: &[PieSlice], angle: f64) -> Option<usize> {
    let angle = angle.rem_euclid(std::f64::consts::TAU);
    slices
        .iter()
        .position(|s| s.contains_angle(angle))
        // Rounding can leave a sliver below TAU uncovered
        .or_else(|| slices.iter().rposition(|s| s.sweep > 0.0))
}

/// Render a loading indicator
pub fn render_loading_indicator(f: &mut Frame, area: Rect, message: &str) {
    let loading = Paragraph::new(message)
        .block(Block::default().borders(Borders::ALL).title("Loading"))
        .style(Style::default().fg(Color::Yellow));

    f.render_widget(loading, area);
}

/// Render error message
pub fn render_error(f: &mut Frame, area: Rect, error: &str) {
    let error_paragraph = Paragraph::new(error)
        .block(Block::default().borders(Borders::ALL).title("Error"))
        .style(Style::default().fg(Color::Red));

    f.render_widget(error_paragraph, area);
}
