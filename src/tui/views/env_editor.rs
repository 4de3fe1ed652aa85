//! Environment variable editor

use crate::tui::app::state::{EnvField, EnvState};
use crate::tui::theme::Theme;
use crate::tui::views::helpers::{create_themed_block, list_title, render_table, truncate_message};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row},
};

pub fn render_env_editor(f: &mut Frame, area: Rect, env: &mut EnvState, theme: &Theme) {
    let (table_area, edit_area) = if env.is_editing() {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(4)])
            .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    let marker = if env.modified { " *" } else { "" };
    let rows: Vec<Row<'static>> = env
        .visible()
        .into_iter()
        .map(|var| {
            Row::new(vec![
                Cell::from(Span::styled(
                    var.key.clone(),
                    Style::default().fg(theme.text_label),
                )),
                Cell::from(truncate_message(&var.value, 120)),
            ])
        })
        .collect();
    let title = list_title(
        &format!("Environment: {}{}", env.container_name, marker),
        rows.len(),
        &env.list,
    );
    let widths = [Constraint::Percentage(30), Constraint::Percentage(70)];
    render_table(
        f,
        table_area,
        &title,
        &["KEY", "VALUE"],
        &widths,
        rows,
        &mut env.list,
        theme,
    );

    if let (Some(area), Some(edit)) = (edit_area, env.editing.as_ref()) {
        let field = |label: &'static str, value: &str, focused: bool| {
            let style = if focused {
                Style::default()
                    .fg(theme.input_focused)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text_label)
            };
            let cursor = if focused { "_" } else { "" };
            Line::from(vec![
                Span::styled(label, style),
                Span::styled(
                    format!("{}{}", value, cursor),
                    Style::default().fg(theme.text_value),
                ),
            ])
        };
        let heading = if edit.index.is_some() {
            "Edit variable (Tab switch, Enter save, Esc cancel)"
        } else {
            "New variable (Tab switch, Enter save, Esc cancel)"
        };
        let lines = vec![
            field("Key:   ", &edit.key, edit.focus == EnvField::Key),
            field("Value: ", &edit.value, edit.focus == EnvField::Value),
        ];
        f.render_widget(
            Paragraph::new(lines).block(create_themed_block(heading, theme)),
            area,
        );
    }
}
