//! Container table, shared by every view that lists containers

use crate::models::Container;
use crate::tui::app::state::{ListState, Resources};
use crate::tui::theme::Theme;
use crate::tui::views::helpers::{list_title, render_empty_state, render_table, truncate_message};
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Cell, Row},
};

const HEADER: [&str; 6] = ["NAME", "IMAGE", "STATE", "STATUS", "PORTS", "ID"];

fn widths() -> [Constraint; 6] {
    [
        Constraint::Percentage(22),
        Constraint::Percentage(22),
        Constraint::Length(10),
        Constraint::Percentage(18),
        Constraint::Percentage(20),
        Constraint::Length(12),
    ]
}

pub fn container_row(container: &Container, theme: &Theme) -> Row<'static> {
    Row::new(vec![
        Cell::from(container.name.clone()),
        Cell::from(truncate_message(&container.image, 40)),
        Cell::from(Span::styled(
            container.state.clone(),
            theme.container_state_style(&container.state),
        )),
        Cell::from(container.status.clone()),
        Cell::from(truncate_message(&container.ports_display(), 40)),
        Cell::from(container.short_id().to_string()),
    ])
}

/// Render `containers` (already filtered) as a selectable table
pub fn render_container_table(
    f: &mut Frame,
    area: Rect,
    title: &str,
    containers: &[&Container],
    list: &mut ListState,
    empty_hint: &str,
    theme: &Theme,
) {
    if containers.is_empty() {
        render_empty_state(f, area, title, "No containers", empty_hint, theme);
        return;
    }
    let rows = containers.iter().map(|c| container_row(c, theme)).collect();
    render_table(f, area, title, &HEADER, &widths(), rows, list, theme);
}

pub fn render_containers(f: &mut Frame, area: Rect, resources: &Resources, list: &mut ListState, theme: &Theme) {
    let containers = list.visible(&resources.containers, |c| {
        format!("{} {} {}", c.name, c.image, c.state)
    });
    let title = list_title("Containers", containers.len(), list);
    render_container_table(
        f,
        area,
        &title,
        &containers,
        list,
        "No containers found. Start one with docker run",
        theme,
    );
}
