//! Image and volume tables

use crate::tui::app::state::{ListState, Resources};
use crate::tui::theme::Theme;
use crate::tui::views::helpers::{
    format_mb, list_title, render_empty_state, render_table, truncate_message,
};
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Cell, Row},
};

pub fn render_images(f: &mut Frame, area: Rect, resources: &Resources, list: &mut ListState, theme: &Theme) {
    let images = list.visible(&resources.images, |i| format!("{} {}", i.primary_tag(), i.id));
    let title = list_title("Images", images.len(), list);
    if images.is_empty() {
        render_empty_state(f, area, &title, "No images", "Press p to pull an image", theme);
        return;
    }

    let rows = images
        .iter()
        .map(|image| {
            let repository = if image.is_dangling() {
                Cell::from(Span::styled(
                    "<none>",
                    Style::default().fg(theme.text_secondary),
                ))
            } else {
                Cell::from(truncate_message(image.repository(), 50))
            };
            let created = image
                .created
                .map(|c| c.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            Row::new(vec![
                repository,
                Cell::from(image.tag().to_string()),
                Cell::from(image.short_id().to_string()),
                Cell::from(format_mb(image.size.max(0) as u64)),
                Cell::from(created),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(40),
        Constraint::Percentage(15),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(18),
    ];
    render_table(
        f,
        area,
        &title,
        &["REPOSITORY", "TAG", "ID", "SIZE", "CREATED"],
        &widths,
        rows,
        list,
        theme,
    );
}

pub fn render_volumes(f: &mut Frame, area: Rect, resources: &Resources, list: &mut ListState, theme: &Theme) {
    let volumes = list.visible(&resources.volumes, |v| v.name.clone());
    let title = list_title("Volumes", volumes.len(), list);
    if volumes.is_empty() {
        render_empty_state(f, area, &title, "No volumes", "Volumes appear here once created", theme);
        return;
    }

    let rows = volumes
        .iter()
        .map(|volume| {
            let users = resources.volume_users(&volume.name);
            let usage = if users > 0 {
                Span::styled(
                    format!("{} container(s)", users),
                    Style::default().fg(theme.state_running),
                )
            } else {
                Span::styled("unused", Style::default().fg(theme.text_secondary))
            };
            Row::new(vec![
                Cell::from(volume.display_name()),
                Cell::from(volume.driver_or_default().to_string()),
                Cell::from(usage),
                Cell::from(truncate_message(&volume.mountpoint, 50)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(35),
        Constraint::Length(10),
        Constraint::Length(16),
        Constraint::Percentage(45),
    ];
    render_table(
        f,
        area,
        &title,
        &["NAME", "DRIVER", "USED BY", "MOUNTPOINT"],
        &widths,
        rows,
        list,
        theme,
    );
}
