//! Common helper functions for view rendering
//!
//! Reusable pieces shared by the list views.

use crate::tui::app::state::ListState;
use crate::tui::constants::SCROLL_BUFFER;
use crate::tui::theme::Theme;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph, Row, Table},
};

/// Update scroll offset based on selected index and visible area
///
/// Keeps the selected row visible with a buffer zone above and below it.
pub fn update_scroll_offset(
    selected_index: usize,
    visible_height: usize,
    scroll_offset: &mut usize,
    scroll_buffer: usize,
) {
    if selected_index >= *scroll_offset + visible_height.saturating_sub(scroll_buffer) {
        *scroll_offset =
            selected_index.saturating_sub(visible_height.saturating_sub(scroll_buffer + 1));
    }
    if selected_index < *scroll_offset + scroll_buffer {
        *scroll_offset = selected_index.saturating_sub(scroll_buffer);
    }
}

/// Render a loading state message
pub fn render_loading_state(f: &mut Frame, area: Rect, title: &str, message: &str, theme: &Theme) {
    let text = vec![
        Line::from(message),
        Line::from(""),
        Line::from("Please wait..."),
    ];
    let paragraph = Paragraph::new(text)
        .block(create_themed_block(title, theme))
        .style(Style::default().fg(theme.text_secondary));
    f.render_widget(paragraph, area);
}

/// Render an empty state message
pub fn render_empty_state(
    f: &mut Frame,
    area: Rect,
    title: &str,
    message: &str,
    instructions: &str,
    theme: &Theme,
) {
    let text = vec![
        Line::from(message),
        Line::from(""),
        Line::from(instructions),
    ];
    let paragraph = Paragraph::new(text)
        .block(create_themed_block(title, theme))
        .style(Style::default().fg(theme.text_secondary));
    f.render_widget(paragraph, area);
}

/// Truncate a message to at most `max_len` characters, ending in "..."
pub fn truncate_message(message: &str, max_len: usize) -> String {
    if message.chars().count() > max_len {
        let kept: String = message.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        message.to_string()
    }
}

/// Create a block with title and borders using theme
pub fn create_themed_block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.text_label))
}

/// Title with the filter appended when one is applied
pub fn list_title(name: &str, count: usize, list: &ListState) -> String {
    if list.filter.is_empty() {
        format!("{} ({})", name, count)
    } else {
        format!("{} ({}) [filter: {}]", name, count, list.filter)
    }
}

/// Render the visible window of `rows` as a table, highlighting the
/// selection and scrolling to keep it in view
pub fn render_table(
    f: &mut Frame,
    area: Rect,
    title: &str,
    header: &[&'static str],
    widths: &[Constraint],
    rows: Vec<Row<'static>>,
    list: &mut ListState,
    theme: &Theme,
) {
    // Borders plus the header row
    let visible_height = (area.height as usize).saturating_sub(3);
    list.clamp(rows.len());
    update_scroll_offset(
        list.selected,
        visible_height,
        &mut list.scroll_offset,
        SCROLL_BUFFER,
    );

    let selected = list.selected;
    let offset = list.scroll_offset;
    let visible: Vec<Row> = rows
        .into_iter()
        .enumerate()
        .skip(offset)
        .take(visible_height)
        .map(|(idx, row)| {
            if idx == selected {
                row.style(theme.table_selected_style())
            } else {
                row.style(Style::default().fg(theme.table_normal))
            }
        })
        .collect();

    let header = Row::new(header.to_vec()).style(theme.table_header_style());
    let table = Table::new(visible, widths.to_vec())
        .header(header)
        .block(create_themed_block(title, theme));
    f.render_widget(table, area);
}

/// A rectangle of `percent_x` width and `height` rows centered in `area`
pub fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Bytes as megabytes with one decimal
pub fn format_mb(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_offset_follows_selection() {
        let mut offset = 0;
        update_scroll_offset(9, 10, &mut offset, 2);
        assert_eq!(offset, 2);
        update_scroll_offset(1, 10, &mut offset, 2);
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate_message("héllo wörld", 8), "héllo...");
        assert_eq!(truncate_message("short", 8), "short");
    }

    #[test]
    fn test_format_mb() {
        assert_eq!(format_mb(3 * 1024 * 1024 / 2), "1.5 MB");
    }
}
