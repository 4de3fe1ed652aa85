//! Rendering logic for the application
//!
//! Lays out header, body and footer, dispatches the body to the current
//! view and draws the modal on top.

use super::core::App;
use super::state::{Refresh, ViewKind};
use crate::tui::constants::{FOOTER_HEIGHT, HEADER_HEIGHT, MIN_TERMINAL_HEIGHT, MIN_TERMINAL_WIDTH};
use crate::tui::keybindings::commands_for;
use crate::tui::views::helpers::render_loading_state;
use crate::tui::views::*;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

impl App {
    /// Main render entry point
    pub fn render(&mut self, f: &mut Frame) {
        let area = f.area();
        if area.width < MIN_TERMINAL_WIDTH || area.height < MIN_TERMINAL_HEIGHT {
            let lines = vec![
                Line::from(""),
                Line::from(format!(
                    "Terminal too small! Need at least {}x{} (current: {}x{})",
                    MIN_TERMINAL_WIDTH, MIN_TERMINAL_HEIGHT, area.width, area.height
                )),
                Line::from("Please resize your terminal window."),
            ];
            let block = Block::default().title("Error").borders(Borders::ALL);
            f.render_widget(Paragraph::new(lines).block(block), area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        let current = self.view_state.current;
        render_header(f, chunks[0], current, &self.resources, &self.theme);
        self.render_main(f, chunks[1]);

        let hints = commands_for(current, self.current_tab(), self.compose_level());
        render_footer(
            f,
            chunks[2],
            self.view_state.active_list(),
            self.ui_state.status.as_ref(),
            &hints,
            &self.theme,
        );

        if let Some(modal) = &self.modal {
            render_modal(f, area, modal, &self.theme);
        }
    }

    fn render_main(&mut self, f: &mut Frame, area: Rect) {
        let current = self.view_state.current;
        if let Some(missing) = Refresh::for_view(current)
            .iter()
            .find(|what| !self.resources.is_loaded(**what))
            && !matches!(current, ViewKind::Groups | ViewKind::Compose)
        {
            tracing::trace!(?missing, "waiting for first load");
            render_loading_state(f, area, current.title(), "Loading...", &self.theme);
            return;
        }

        let resources = &self.resources;
        let views = &mut self.view_state;
        let theme = &self.theme;
        match current {
            ViewKind::Containers => render_containers(f, area, resources, &mut views.containers, theme),
            ViewKind::Images => render_images(f, area, resources, &mut views.images, theme),
            ViewKind::Volumes => render_volumes(f, area, resources, &mut views.volumes, theme),
            ViewKind::Groups => render_groups(f, area, resources, &mut views.groups, theme),
            ViewKind::Networks => render_networks(f, area, resources, &mut views.networks, theme),
            ViewKind::Compose => render_compose(f, area, resources, &mut views.compose, theme),
            ViewKind::Logs => render_logs(f, area, &views.logs, theme),
            ViewKind::Stats => render_stats(f, area, &views.stats, theme),
            ViewKind::EnvVars => render_env_editor(f, area, &mut views.env, theme),
            ViewKind::About => render_about(f, area, theme),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::docker::MockResourceClient;
    use crate::groups::GroupStore;
    use crate::tui::app::App;
    use crate::tui::theme::Theme;
    use ratatui::{Terminal, backend::TestBackend};
    use std::sync::Arc;

    fn screen(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = GroupStore::open_in(dir.path()).unwrap();
        let app = App::new(
            Arc::new(MockResourceClient::new()),
            Arc::new(store),
            Config::default(),
            Theme::default(),
        );
        (app, dir)
    }

    #[test]
    fn test_too_small_terminal() {
        let (mut app, _dir) = app();
        let text = screen(&mut app, 40, 10);
        assert!(text.contains("Terminal too small"));
    }

    #[test]
    fn test_containers_loading_before_first_fetch() {
        let (mut app, _dir) = app();
        let text = screen(&mut app, 100, 20);
        assert!(text.contains("Loading..."));
        assert!(text.contains("1 Containers"));
    }
}
