//! Confirmation dialog and form rendering

use crate::tui::app::{ModalKind, ModalState};
use crate::tui::constants::MODAL_WIDTH_PERCENT;
use crate::tui::theme::Theme;
use crate::tui::views::helpers::centered_rect;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Draw the modal centered over `area`
pub fn render_modal(f: &mut Frame, area: Rect, modal: &ModalState, theme: &Theme) {
    match &modal.kind {
        ModalKind::Confirm { message } => render_confirm(f, area, &modal.title, message, theme),
        ModalKind::Form { fields, focus } => {
            let mut lines = vec![Line::from("")];
            for (idx, field) in fields.iter().enumerate() {
                let focused = idx == *focus;
                let marker = if field.required { "*" } else { " " };
                let label_style = if focused {
                    Style::default()
                        .fg(theme.input_focused)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.text_label)
                };
                lines.push(Line::from(Span::styled(
                    format!("{}{}", field.label, marker),
                    label_style,
                )));
                let cursor = if focused { "_" } else { "" };
                lines.push(Line::from(vec![
                    Span::raw("> "),
                    Span::styled(
                        format!("{}{}", field.value, cursor),
                        Style::default().fg(theme.text_value),
                    ),
                ]));
                lines.push(Line::from(""));
            }
            lines.push(Line::from(vec![
                Span::styled("Tab", theme.footer_key_style()),
                Span::raw(" next field  "),
                Span::styled("Enter", theme.footer_key_style()),
                Span::raw(" submit  "),
                Span::styled("Esc", theme.footer_key_style()),
                Span::raw(" cancel"),
            ]));

            let height = lines.len() as u16 + 2;
            let rect = centered_rect(MODAL_WIDTH_PERCENT, height, area);
            let block = Block::default()
                .title(modal.title.as_str())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.text_label));
            f.render_widget(Clear, rect);
            f.render_widget(Paragraph::new(lines).block(block), rect);
        }
    }
}

fn render_confirm(f: &mut Frame, area: Rect, title: &str, message: &str, theme: &Theme) {
    let key_style = |color| Style::default().fg(color).add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(title.to_string(), theme.operation_warning_style())),
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("y", key_style(theme.operation_confirm)),
            Span::raw(" or "),
            Span::styled("Enter", key_style(theme.operation_confirm)),
            Span::raw(" to confirm"),
        ]),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("n", key_style(theme.operation_cancel)),
            Span::raw(" or "),
            Span::styled("Esc", key_style(theme.operation_cancel)),
            Span::raw(" to cancel"),
        ]),
    ];

    let rect = centered_rect(MODAL_WIDTH_PERCENT, lines.len() as u16 + 3, area);
    let block = Block::default()
        .title("Confirm Operation")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.operation_warning));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(Clear, rect);
    f.render_widget(paragraph, rect);
}
