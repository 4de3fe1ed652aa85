//! Application state and main TUI logic

use super::events::Event;
use super::modal::ModalState;
use super::state::{
    ComposeLevel, Refresh, Resources, StatusBanner, Tab, UIState, ViewKind, ViewState,
};
use crate::config::Config;
use crate::docker::ResourceClient;
use crate::groups::GroupStore;
use crate::models::Container;
use crate::runtime::{Command, SubscriptionIds};
use crate::tui::Theme;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Main application state
pub struct App {
    // Core data
    pub(crate) config: Config,
    pub(crate) theme: Theme,
    pub(crate) resources: Resources,

    // Organized state
    pub(crate) view_state: ViewState,
    pub(crate) ui_state: UIState,
    pub(crate) modal: Option<ModalState>,

    // Services
    pub(crate) client: Arc<dyn ResourceClient>,
    pub(crate) store: Arc<GroupStore>,
    /// Parent of every stream token; cancelled on shutdown
    pub(crate) streams: CancellationToken,
    pub(crate) subscription_ids: SubscriptionIds,
}

impl App {
    pub fn new(
        client: Arc<dyn ResourceClient>,
        store: Arc<GroupStore>,
        config: Config,
        theme: Theme,
    ) -> Self {
        Self {
            config,
            theme,
            resources: Resources::default(),
            view_state: ViewState::default(),
            ui_state: UIState::default(),
            modal: None,
            client,
            store,
            streams: CancellationToken::new(),
            subscription_ids: SubscriptionIds::default(),
        }
    }

    /// Work to schedule before the first event: load the start view and arm
    /// the refresh tick
    pub fn initial_commands(&mut self) -> Vec<Command<Event>> {
        let mut commands = self.fetch_view(ViewKind::Containers);
        commands.push(self.fetch(Refresh::Groups));
        commands.push(self.tick());
        commands
    }

    /// Cancel every live stream
    pub fn shutdown(&mut self) {
        self.view_state.logs.close();
        self.view_state.stats.close();
        self.streams.cancel();
    }

    pub fn current_view(&self) -> ViewKind {
        self.view_state.current
    }

    pub fn views(&self) -> &ViewState {
        &self.view_state
    }

    pub fn modal(&self) -> Option<&ModalState> {
        self.modal.as_ref()
    }

    pub fn status(&self) -> Option<&StatusBanner> {
        self.ui_state.status.as_ref()
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn should_quit(&self) -> bool {
        self.ui_state.should_quit
    }

    /// Sub-tab of the current view, for views that have them
    pub(crate) fn current_tab(&self) -> Tab {
        match self.view_state.current {
            ViewKind::Groups => self.view_state.groups.tab,
            ViewKind::Networks => self.view_state.networks.tab,
            _ => Tab::List,
        }
    }

    pub(crate) fn compose_level(&self) -> ComposeLevel {
        self.view_state.compose.level
    }

    /// The container that container actions apply to in the current view
    pub fn selected_container(&self) -> Option<Container> {
        let views = &self.view_state;
        let resources = &self.resources;
        match views.current {
            ViewKind::Containers => views
                .containers
                .visible(&resources.containers, |c| {
                    format!("{} {} {}", c.name, c.image, c.state)
                })
                .get(views.containers.selected)
                .map(|c| (*c).clone()),
            ViewKind::Groups if views.groups.tab == Tab::InGroup => views
                .groups
                .group_members(&resources.groups, &resources.containers)
                .get(views.groups.members.selected)
                .map(|c| (*c).clone()),
            ViewKind::Networks if views.networks.tab == Tab::InGroup => views
                .networks
                .network_members(&resources.networks, &resources.containers)
                .get(views.networks.members.selected)
                .map(|c| (*c).clone()),
            ViewKind::Compose => views
                .compose
                .selected_container(&resources.projects)
                .cloned(),
            _ => None,
        }
    }

    /// Show a banner and schedule its expiry
    pub(crate) fn set_status(&mut self, message: impl Into<String>, is_error: bool) -> Command<Event> {
        let message = message.into();
        if is_error {
            tracing::warn!("{}", message);
        } else {
            tracing::debug!("{}", message);
        }
        self.ui_state.status_generation += 1;
        self.ui_state.status = Some(StatusBanner { message, is_error });

        let timeout = if is_error {
            self.config.error_timeout()
        } else {
            self.config.status_timeout()
        };
        Command::after(
            "clear status",
            timeout,
            Event::ClearStatus {
                generation: self.ui_state.status_generation,
            },
        )
    }

    pub(crate) fn clear_status(&mut self, generation: u64) {
        if generation == self.ui_state.status_generation {
            self.ui_state.status = None;
        }
    }

    pub(crate) fn tick(&self) -> Command<Event> {
        Command::after("refresh tick", self.config.refresh_interval(), Event::RefreshTick)
    }

    /// Fetch everything `view` renders from
    pub(crate) fn fetch_view(&self, view: ViewKind) -> Vec<Command<Event>> {
        Refresh::for_view(view)
            .iter()
            .map(|what| self.fetch(*what))
            .collect()
    }

    /// Switch views, tearing down whatever the old view owned
    pub(crate) fn switch_view(&mut self, target: ViewKind) -> Vec<Command<Event>> {
        let current = self.view_state.current;
        if current == target {
            return self.fetch_view(target);
        }

        match current {
            ViewKind::Logs => self.view_state.logs.close(),
            ViewKind::Stats => self.view_state.stats.close(),
            ViewKind::EnvVars => self.view_state.env.discard(),
            _ => {}
        }
        if current.is_main() && current != ViewKind::About {
            self.view_state.previous = current;
        }
        tracing::debug!(from = ?current, to = ?target, "switching view");
        self.view_state.current = target;
        self.fetch_view(target)
    }

    /// Return to the view a detail view was opened from
    pub(crate) fn go_back(&mut self) -> Vec<Command<Event>> {
        let previous = self.view_state.previous;
        self.switch_view(previous)
    }
}
