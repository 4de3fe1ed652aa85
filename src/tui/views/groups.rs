//! Groups and networks: a parent list with member / non-member tabs

use crate::tui::app::state::{DrillDown, Resources, Tab};
use crate::tui::theme::Theme;
use crate::tui::views::containers::render_container_table;
use crate::tui::views::helpers::{list_title, render_empty_state, render_loading_state, render_table};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row},
};

/// One-line strip showing the three sub-tabs
fn render_sub_tabs(f: &mut Frame, area: Rect, labels: [&str; 3], active: Tab, theme: &Theme) {
    let mut spans = Vec::new();
    for (tab, label) in Tab::ALL.iter().zip(labels) {
        spans.push(Span::styled(format!(" {} ", label), theme.tab_style(*tab == active)));
        spans.push(Span::raw(" "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn split(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);
    (chunks[0], chunks[1])
}

pub fn render_groups(f: &mut Frame, area: Rect, resources: &Resources, drill: &mut DrillDown, theme: &Theme) {
    use crate::tui::app::state::Refresh;

    let (tabs_area, body) = split(area);
    let parent_name = drill
        .selected_group(&resources.groups)
        .map(|g| g.name.clone());
    render_sub_tabs(
        f,
        tabs_area,
        ["Groups", "In Group", "Available"],
        drill.tab,
        theme,
    );

    if !resources.is_loaded(Refresh::Groups) {
        render_loading_state(f, body, "Groups", "Loading groups...", theme);
        return;
    }

    match drill.tab {
        Tab::List => {
            let groups = drill.visible_groups(&resources.groups);
            let title = list_title("Groups", groups.len(), &drill.list);
            if groups.is_empty() {
                render_empty_state(f, body, &title, "No groups", "Press n to create a group", theme);
                return;
            }
            let rows = groups
                .iter()
                .map(|group| {
                    let running = resources
                        .containers
                        .iter()
                        .filter(|c| group.contains(&c.id) && c.is_running())
                        .count();
                    let marker = if Some(&group.name) == parent_name.as_ref() {
                        "▸ "
                    } else {
                        "  "
                    };
                    Row::new(vec![
                        Cell::from(format!("{}{}", marker, group.name)),
                        Cell::from(group.description.clone()),
                        Cell::from(format!("{}/{}", running, group.container_ids.len())),
                        Cell::from(group.modified.format("%Y-%m-%d %H:%M").to_string()),
                    ])
                })
                .collect();
            let widths = [
                Constraint::Percentage(25),
                Constraint::Percentage(45),
                Constraint::Length(9),
                Constraint::Length(18),
            ];
            render_table(
                f,
                body,
                &title,
                &["NAME", "DESCRIPTION", "RUNNING", "MODIFIED"],
                &widths,
                rows,
                &mut drill.list,
                theme,
            );
        }
        Tab::InGroup | Tab::Available => {
            let Some(name) = parent_name else {
                render_empty_state(
                    f,
                    body,
                    "Group",
                    "No group selected",
                    "Select a group on the Groups tab and press Enter",
                    theme,
                );
                return;
            };
            let (title, containers, hint) = if drill.tab == Tab::InGroup {
                (
                    format!("Containers in {}", name),
                    drill.group_members(&resources.groups, &resources.containers),
                    "Add containers from the Available tab",
                )
            } else {
                (
                    format!("Available for {}", name),
                    drill.group_available(&resources.groups, &resources.containers),
                    "Every container is already in this group",
                )
            };
            let list = if drill.tab == Tab::InGroup {
                &mut drill.members
            } else {
                &mut drill.available
            };
            let title = list_title(&title, containers.len(), list);
            render_container_table(f, body, &title, &containers, list, hint, theme);
        }
    }
}

pub fn render_networks(f: &mut Frame, area: Rect, resources: &Resources, drill: &mut DrillDown, theme: &Theme) {
    let (tabs_area, body) = split(area);
    let parent = drill
        .selected_network(&resources.networks)
        .map(|n| (n.name.clone(), n.is_system()));
    render_sub_tabs(
        f,
        tabs_area,
        ["Networks", "Connected", "Available"],
        drill.tab,
        theme,
    );

    match drill.tab {
        Tab::List => {
            let networks = drill.visible_networks(&resources.networks);
            let title = list_title("Networks", networks.len(), &drill.list);
            if networks.is_empty() {
                render_empty_state(f, body, &title, "No networks", "Press n to create a network", theme);
                return;
            }
            let rows = networks
                .iter()
                .map(|network| {
                    let name = if network.is_system() {
                        Span::styled(
                            format!("{} (system)", network.name),
                            Style::default().fg(theme.text_secondary),
                        )
                    } else {
                        Span::raw(network.name.clone())
                    };
                    Row::new(vec![
                        Cell::from(name),
                        Cell::from(network.driver.clone()),
                        Cell::from(network.scope.clone()),
                        Cell::from(network.subnet.clone().unwrap_or_else(|| "-".to_string())),
                        Cell::from(network.containers.len().to_string()),
                        Cell::from(network.short_id().to_string()),
                    ])
                })
                .collect();
            let widths = [
                Constraint::Percentage(30),
                Constraint::Length(10),
                Constraint::Length(8),
                Constraint::Length(18),
                Constraint::Length(10),
                Constraint::Length(12),
            ];
            render_table(
                f,
                body,
                &title,
                &["NAME", "DRIVER", "SCOPE", "SUBNET", "CONTAINERS", "ID"],
                &widths,
                rows,
                &mut drill.list,
                theme,
            );
        }
        Tab::InGroup | Tab::Available => {
            let Some((name, system)) = parent else {
                render_empty_state(
                    f,
                    body,
                    "Network",
                    "No network selected",
                    "Select a network on the Networks tab and press Enter",
                    theme,
                );
                return;
            };
            let (title, containers, hint) = if drill.tab == Tab::InGroup {
                (
                    format!("Connected to {}", name),
                    drill.network_members(&resources.networks, &resources.containers),
                    "No containers are connected",
                )
            } else {
                (
                    format!("Available for {}", name),
                    drill.network_available(&resources.networks, &resources.containers),
                    if system {
                        "System networks cannot be modified"
                    } else {
                        "Every container is already connected"
                    },
                )
            };
            let list = if drill.tab == Tab::InGroup {
                &mut drill.members
            } else {
                &mut drill.available
            };
            let title = list_title(&title, containers.len(), list);
            render_container_table(f, body, &title, &containers, list, hint, theme);
        }
    }
}
