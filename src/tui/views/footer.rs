//! Footer view rendering

use crate::tui::app::state::{ListState, StatusBanner};
use crate::tui::keybindings::NavigationCommand;
use crate::tui::theme::Theme;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Render the footer: the filter prompt while filtering, else the status
/// banner, else the key hints of the current view
pub fn render_footer(
    f: &mut Frame,
    area: Rect,
    filter: Option<&ListState>,
    status: Option<&StatusBanner>,
    hints: &[NavigationCommand],
    theme: &Theme,
) {
    let line = if let Some(list) = filter.filter(|l| l.filtering) {
        Line::from(vec![
            Span::styled("/", theme.filter_prompt_style()),
            Span::raw(list.filter.clone()),
            Span::raw("_"),
            Span::styled(
                " (Esc to cancel, Enter to apply)",
                Style::default().fg(theme.text_secondary),
            ),
        ])
    } else if let Some(status) = status {
        let style = if status.is_error {
            theme.operation_error_style()
        } else {
            theme.operation_success_style()
        };
        Line::from(Span::styled(status.message.clone(), style))
    } else {
        navigation_line(hints, theme)
    };

    let footer = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

fn navigation_line(hints: &[NavigationCommand], theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();
    for (idx, cmd) in hints.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw(" | "));
        }
        spans.push(Span::styled(cmd.key, theme.footer_key_style()));
        spans.push(Span::styled(
            format!(" {}", cmd.label),
            Style::default().fg(theme.footer_text),
        ));
    }
    Line::from(spans)
}
