//! Log viewer

use crate::tui::app::state::LogsState;
use crate::tui::theme::Theme;
use crate::tui::views::helpers::create_themed_block;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};
use std::ops::Range;

/// Indices of the buffered lines that fit in `height` rows when the view
/// sits `from_bottom` lines above the newest one. Scrolling stops once the
/// first line reaches the top.
fn window(total: usize, height: usize, from_bottom: usize) -> Range<usize> {
    let end = total.saturating_sub(from_bottom).max(height.min(total));
    end.saturating_sub(height)..end
}

pub fn render_logs(f: &mut Frame, area: Rect, logs: &LogsState, theme: &Theme) {
    let mode = if logs.follow { "following" } else { "paused" };
    let ended = if logs.is_streaming() { "" } else { " (stream ended)" };
    let title = format!(
        "Logs: {} [{}] {} lines{}",
        logs.container_name,
        mode,
        logs.lines.len(),
        ended
    );

    let height = area.height.saturating_sub(2) as usize;
    let range = window(logs.lines.len(), height, logs.scroll_from_bottom);
    let lines: Vec<Line> = logs
        .lines
        .range(range)
        .map(|entry| {
            let style = if entry.is_error() {
                Style::default().fg(theme.operation_error)
            } else {
                Style::default().fg(theme.text_primary)
            };
            Line::from(Span::styled(entry.line.clone(), style))
        })
        .collect();

    let body = if lines.is_empty() {
        Paragraph::new(Line::from(Span::styled(
            "Waiting for output...",
            Style::default().fg(theme.text_secondary),
        )))
    } else {
        Paragraph::new(lines)
    };
    f.render_widget(body.block(create_themed_block(&title, theme)), area);
}
