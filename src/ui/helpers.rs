use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::EstimateStatus;

/// A `Label: value` row for the home dashboard. Blank values render as a dim
/// dash so missing company details are visible at a glance.
pub(crate) fn labelled_line(label: &str, value: &str) -> Line<'static> {
    let value = value.trim();
    let value_span = if value.is_empty() {
        Span::styled("-", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(value.to_string())
    };
    Line::from(vec![
        Span::styled(
            format!("{label:<16}"),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        value_span,
    ])
}

/// Badge colour for an estimate status on the dashboard.
pub(crate) fn status_style(status: EstimateStatus) -> Style {
    let color = match status {
        EstimateStatus::Provided => Color::Yellow,
        EstimateStatus::Requested => Color::Blue,
        EstimateStatus::Accepted => Color::Green,
        EstimateStatus::Completed => Color::LightGreen,
        EstimateStatus::Revised => Color::LightRed,
        EstimateStatus::Cancelled => Color::Red,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for the sign-in form and the layout dialog.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}
