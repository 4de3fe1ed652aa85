//! About view: version and key reference

use crate::tui::keybindings::global_help_commands;
use crate::tui::theme::Theme;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const CONTAINER_KEYS: [(&str, &str); 7] = [
    ("<s>", "Start"),
    ("<x>", "Stop"),
    ("<r>", "Restart"),
    ("<d>", "Delete (asks first)"),
    ("<l>", "Follow logs"),
    ("<t>", "Live stats"),
    ("<v>", "Edit environment"),
];

const VIEW_KEYS: [(&str, &str); 9] = [
    ("<j>/<k>", "Move selection"),
    ("<Enter>", "Open group, network, project"),
    ("<←>/<→>", "Switch sub-tab"),
    ("<n>", "New group or network"),
    ("<u>", "Remove from group / disconnect"),
    ("<p>", "Pull image / prune volumes"),
    ("<f>", "Toggle log follow"),
    ("<a>/<e>", "Add / edit variable"),
    ("<Ctrl+s>", "Save env and recreate"),
];

pub fn render_about(f: &mut Frame, area: Rect, theme: &Theme) {
    let block = Block::default().title("About").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    let banner = vec![
        Line::from(vec![
            Span::styled("dockhand ", theme.header_title_style()),
            Span::styled(
                format!("v{}", env!("CARGO_PKG_VERSION")),
                Style::default().fg(theme.text_secondary),
            ),
        ]),
        Line::from("Terminal UI for Docker containers, images, volumes, networks and compose projects"),
    ];
    f.render_widget(Paragraph::new(banner), rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(rows[1]);

    render_column(f, columns[0], "GENERAL", &global_help_commands(), theme);
    render_column(f, columns[1], "CONTAINERS", &CONTAINER_KEYS, theme);
    render_column(f, columns[2], "VIEWS", &VIEW_KEYS, theme);
}

fn render_column(f: &mut Frame, area: Rect, title: &str, items: &[(&str, &str)], theme: &Theme) {
    let mut lines = vec![Line::from(Span::styled(
        title,
        Style::default()
            .fg(theme.table_header)
            .add_modifier(Modifier::BOLD),
    ))];
    for (key, description) in items {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", key),
                Style::default()
                    .fg(theme.footer_key)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(*description),
        ]));
    }
    f.render_widget(Paragraph::new(lines), area);
}
