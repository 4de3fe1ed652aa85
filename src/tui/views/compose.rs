//! Compose projects, their services, and the replicas of a scaled service

use crate::tui::app::state::{ComposeLevel, ComposeState, Refresh, Resources};
use crate::tui::theme::Theme;
use crate::tui::views::containers::render_container_table;
use crate::tui::views::helpers::{list_title, render_empty_state, render_loading_state, render_table};
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Cell, Row},
};

fn running_span(running: usize, total: usize, theme: &Theme) -> Span<'static> {
    let color = if total > 0 && running == total {
        theme.state_running
    } else if running == 0 {
        theme.state_exited
    } else {
        theme.state_paused
    };
    Span::styled(format!("{}/{}", running, total), Style::default().fg(color))
}

pub fn render_compose(f: &mut Frame, area: Rect, resources: &Resources, compose: &mut ComposeState, theme: &Theme) {
    if !resources.is_loaded(Refresh::Compose) {
        render_loading_state(f, area, "Compose", "Loading compose projects...", theme);
        return;
    }
    let projects = &resources.projects;

    match compose.level {
        ComposeLevel::Projects => {
            let visible = compose.visible_projects(projects);
            let title = list_title("Compose Projects", visible.len(), &compose.projects);
            if visible.is_empty() {
                render_empty_state(
                    f,
                    area,
                    &title,
                    "No compose projects",
                    "Containers started by docker compose are grouped here",
                    theme,
                );
                return;
            }
            let rows = visible
                .iter()
                .map(|project| {
                    Row::new(vec![
                        Cell::from(project.name.clone()),
                        Cell::from(project.services.len().to_string()),
                        Cell::from(running_span(
                            project.running_count(),
                            project.container_count(),
                            theme,
                        )),
                        Cell::from(project.working_dir.clone().unwrap_or_else(|| "-".to_string())),
                    ])
                })
                .collect();
            let widths = [
                Constraint::Percentage(30),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Percentage(50),
            ];
            render_table(
                f,
                area,
                &title,
                &["PROJECT", "SERVICES", "RUNNING", "WORKING DIR"],
                &widths,
                rows,
                &mut compose.projects,
                theme,
            );
        }
        ComposeLevel::Services => {
            let project_name = compose
                .selected_project(projects)
                .map(|p| p.name.clone())
                .unwrap_or_default();
            let visible = compose.visible_services(projects);
            let title = list_title(&format!("Services in {}", project_name), visible.len(), &compose.services);
            if visible.is_empty() {
                render_empty_state(f, area, &title, "No services", "Esc to go back", theme);
                return;
            }
            let rows = visible
                .iter()
                .map(|service| {
                    let (image, state) = match service.containers.as_slice() {
                        [only] => (
                            only.image.clone(),
                            Span::styled(
                                only.state.clone(),
                                theme.container_state_style(&only.state),
                            ),
                        ),
                        _ => (
                            service
                                .containers
                                .first()
                                .map(|c| c.image.clone())
                                .unwrap_or_default(),
                            Span::styled(
                                "scaled (Enter)",
                                Style::default().fg(theme.text_secondary),
                            ),
                        ),
                    };
                    Row::new(vec![
                        Cell::from(service.name.clone()),
                        Cell::from(image),
                        Cell::from(running_span(
                            service.running_count(),
                            service.containers.len(),
                            theme,
                        )),
                        Cell::from(state),
                    ])
                })
                .collect();
            let widths = [
                Constraint::Percentage(25),
                Constraint::Percentage(35),
                Constraint::Length(10),
                Constraint::Percentage(25),
            ];
            render_table(
                f,
                area,
                &title,
                &["SERVICE", "IMAGE", "REPLICAS", "STATE"],
                &widths,
                rows,
                &mut compose.services,
                theme,
            );
        }
        ComposeLevel::Containers => {
            let service_name = compose
                .selected_service(projects)
                .map(|s| s.name.clone())
                .unwrap_or_default();
            let visible = compose.visible_containers(projects);
            let title = list_title(
                &format!("Replicas of {}", service_name),
                visible.len(),
                &compose.containers,
            );
            render_container_table(
                f,
                area,
                &title,
                &visible,
                &mut compose.containers,
                "Esc to go back",
                theme,
            );
        }
    }
}
