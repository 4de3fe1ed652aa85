//! Header view rendering

use crate::tui::app::state::{Resources, ViewKind};
use crate::tui::theme::Theme;
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Render the tab bar: one numbered tab per main view, plus the open detail
/// view when there is one
pub fn render_header(f: &mut Frame, area: Rect, current: ViewKind, resources: &Resources, theme: &Theme) {
    let mut spans = vec![Span::styled(" dockhand ", theme.header_title_style()), Span::raw(" ")];

    for (idx, view) in ViewKind::CYCLE.iter().enumerate() {
        let label = match view_count(*view, resources) {
            Some(count) => format!(" {} {} ({}) ", idx + 1, view.title(), count),
            None => format!(" {} {} ", idx + 1, view.title()),
        };
        spans.push(Span::styled(label, theme.tab_style(*view == current)));
        spans.push(Span::raw(" "));
    }

    if !current.is_main() {
        spans.push(Span::raw("» "));
        spans.push(Span::styled(format!(" {} ", current.title()), theme.tab_style(true)));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn view_count(view: ViewKind, resources: &Resources) -> Option<usize> {
    use crate::tui::app::state::Refresh;
    let (what, count) = match view {
        ViewKind::Containers => (Refresh::Containers, resources.containers.len()),
        ViewKind::Images => (Refresh::Images, resources.images.len()),
        ViewKind::Groups => (Refresh::Groups, resources.groups.len()),
        ViewKind::Volumes => (Refresh::Volumes, resources.volumes.len()),
        ViewKind::Compose => (Refresh::Compose, resources.projects.len()),
        ViewKind::Networks => (Refresh::Networks, resources.networks.len()),
        _ => return None,
    };
    resources.is_loaded(what).then_some(count)
}
