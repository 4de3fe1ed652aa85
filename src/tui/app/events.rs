//! Events and keyboard routing
//!
//! A keystroke goes to exactly one consumer, in this order: the open modal,
//! the text input of the current view (filter prompt or env row editor), the
//! global keymap, and finally the current view's own handler.

use super::core::App;
use super::modal::{FormField, ModalOutcome, ModalState, PendingAction};
use super::state::{ComposeLevel, Refresh, Tab, ViewKind};
use crate::docker::ClientError;
use crate::groups::GroupStoreError;
use crate::models::{
    ComposeProject, Container, ContainerSpec, ContainerStats, Group, Image, LogEntry, Network,
    Volume,
};
use crate::runtime::{Command, Subscription, SubscriptionId};
use crate::services::RecreateOutcome;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Everything the reducer reacts to
#[derive(Debug)]
pub enum Event {
    Input(KeyEvent),
    Resize(u16, u16),
    RefreshTick,
    ClearStatus {
        generation: u64,
    },

    ContainersLoaded(Result<Vec<Container>, ClientError>),
    ImagesLoaded(Result<Vec<Image>, ClientError>),
    VolumesLoaded(Result<Vec<Volume>, ClientError>),
    NetworksLoaded(Result<Vec<Network>, ClientError>),
    ComposeLoaded(Result<Vec<ComposeProject>, ClientError>),
    GroupsLoaded(Result<Vec<Group>, GroupStoreError>),

    /// A mutation finished; the message becomes the banner
    OperationFinished {
        result: Result<String, String>,
        refresh: Vec<Refresh>,
    },
    ContainerConfigLoaded {
        id: String,
        result: Result<ContainerSpec, ClientError>,
    },
    Recreated {
        old_id: String,
        name: String,
        outcome: RecreateOutcome,
    },

    /// A requested stream's channels exist; the view may attach it
    LogStreamOpened(Subscription<LogEntry>),
    StatsStreamOpened(Subscription<ContainerStats>),
    LogLine {
        subscription: SubscriptionId,
        entry: LogEntry,
    },
    StatsSample {
        subscription: SubscriptionId,
        stats: ContainerStats,
    },
    StreamFailed {
        subscription: SubscriptionId,
        error: ClientError,
    },
}

type Commands = Vec<Command<Event>>;

fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

impl App {
    /// Route one keystroke
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Commands {
        if self.modal.is_some() {
            return self.handle_modal_key(key);
        }

        if self.view_state.is_capturing_text() {
            if self.view_state.current == ViewKind::EnvVars && self.view_state.env.is_editing() {
                self.view_state.env.handle_edit_key(key);
            } else if let Some(list) = self.view_state.active_list_mut() {
                list.handle_filter_key(key);
            }
            return Vec::new();
        }

        if let Some(commands) = self.handle_global_key(key) {
            return commands;
        }

        match self.view_state.current {
            ViewKind::Containers => self.handle_containers_key(key),
            ViewKind::Images => self.handle_images_key(key),
            ViewKind::Groups => self.handle_groups_key(key),
            ViewKind::Volumes => self.handle_volumes_key(key),
            ViewKind::Compose => self.handle_compose_key(key),
            ViewKind::Networks => self.handle_networks_key(key),
            ViewKind::Logs => {
                self.handle_logs_key(key);
                Vec::new()
            }
            ViewKind::EnvVars => self.handle_env_key(key),
            ViewKind::About | ViewKind::Stats => Vec::new(),
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) -> Commands {
        let outcome = match self.modal.as_mut() {
            Some(modal) => modal.handle_key(key),
            None => return Vec::new(),
        };
        match outcome {
            ModalOutcome::Pending => Vec::new(),
            ModalOutcome::Cancelled => {
                if let Some(modal) = self.modal.take() {
                    tracing::debug!(action = ?modal.action, "modal cancelled");
                }
                Vec::new()
            }
            ModalOutcome::Confirmed => match self.modal.take() {
                Some(modal) => self.run_pending(modal),
                None => Vec::new(),
            },
        }
    }

    /// Keys that mean the same thing in every view. `None` passes the key on.
    fn handle_global_key(&mut self, key: KeyEvent) -> Option<Commands> {
        let current = self.view_state.current;

        if is_ctrl(&key, 'c') || key.code == KeyCode::Char('q') {
            if matches!(current, ViewKind::Logs | ViewKind::Stats | ViewKind::About) {
                return Some(self.switch_view(ViewKind::Containers));
            }
            tracing::debug!("quit requested");
            self.ui_state.should_quit = true;
            return Some(Vec::new());
        }

        match key.code {
            KeyCode::Char('?') => Some(self.switch_view(ViewKind::About)),
            KeyCode::Char(c @ '1'..='7') => {
                ViewKind::from_hotkey(c).map(|target| self.switch_view(target))
            }
            KeyCode::Tab if current.is_main() => Some(self.switch_view(current.next())),
            KeyCode::BackTab if current.is_main() => Some(self.switch_view(current.prev())),
            KeyCode::Esc => Some(self.handle_escape()),
            _ => None,
        }
    }

    fn handle_escape(&mut self) -> Commands {
        match self.view_state.current {
            ViewKind::Containers => Vec::new(),
            ViewKind::About | ViewKind::Logs | ViewKind::Stats | ViewKind::EnvVars => {
                self.go_back()
            }
            ViewKind::Compose => {
                if self.view_state.compose.back() {
                    Vec::new()
                } else {
                    self.switch_view(ViewKind::Containers)
                }
            }
            ViewKind::Groups if self.view_state.groups.tab != Tab::List => {
                self.view_state.groups.tab = Tab::List;
                Vec::new()
            }
            ViewKind::Networks if self.view_state.networks.tab != Tab::List => {
                self.view_state.networks.tab = Tab::List;
                Vec::new()
            }
            _ => self.switch_view(ViewKind::Containers),
        }
    }

    /// Navigation and `/` for the current list. True when consumed.
    fn handle_list_key(&mut self, key: KeyEvent, len: usize) -> bool {
        let Some(list) = self.view_state.active_list_mut() else {
            return false;
        };
        if key.code == KeyCode::Char('/') {
            list.start_filter();
            return true;
        }
        list.handle_nav_key(key, len)
    }

    /// Start/stop/restart/delete/logs/stats/env on the selected container
    fn handle_container_action(&mut self, key: KeyEvent, allow_delete: bool) -> Commands {
        let Some(container) = self.selected_container() else {
            return Vec::new();
        };
        match key.code {
            KeyCode::Char('s') => vec![self.start_container(&container)],
            KeyCode::Char('x') => vec![self.stop_container(&container)],
            KeyCode::Char('r') => vec![self.restart_container(&container)],
            KeyCode::Char('d') if allow_delete => {
                self.modal = Some(ModalState::confirm(
                    format!(
                        "Are you sure you want to remove container '{}'?",
                        container.name
                    ),
                    PendingAction::DeleteContainer {
                        id: container.id.clone(),
                        name: container.name.clone(),
                    },
                ));
                Vec::new()
            }
            KeyCode::Char('l') => self.open_logs(&container),
            KeyCode::Char('t') => self.open_stats(&container),
            KeyCode::Char('v') => {
                let status = self.set_status(
                    format!("Loading configuration for {}...", container.name),
                    false,
                );
                vec![status, self.load_container_config(&container)]
            }
            _ => Vec::new(),
        }
    }

    fn handle_containers_key(&mut self, key: KeyEvent) -> Commands {
        let len = self
            .view_state
            .containers
            .visible(&self.resources.containers, |c| {
                format!("{} {} {}", c.name, c.image, c.state)
            })
            .len();
        if self.handle_list_key(key, len) {
            return Vec::new();
        }
        self.handle_container_action(key, true)
    }

    fn handle_images_key(&mut self, key: KeyEvent) -> Commands {
        let visible: Vec<Image> = self
            .view_state
            .images
            .visible(&self.resources.images, |i| {
                format!("{} {}", i.primary_tag(), i.id)
            })
            .into_iter()
            .cloned()
            .collect();
        if self.handle_list_key(key, visible.len()) {
            return Vec::new();
        }
        match key.code {
            KeyCode::Char('d') => {
                if let Some(image) = visible.get(self.view_state.images.selected) {
                    self.modal = Some(ModalState::confirm(
                        format!(
                            "Are you sure you want to remove image '{}'?",
                            image.primary_tag()
                        ),
                        PendingAction::DeleteImage {
                            id: image.id.clone(),
                            tag: image.primary_tag().to_string(),
                        },
                    ));
                }
            }
            KeyCode::Char('p') => {
                self.modal = Some(ModalState::form(
                    "Pull Image",
                    vec![FormField::required("Image Name (e.g. nginx:latest)")],
                    PendingAction::PullImage,
                ));
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_volumes_key(&mut self, key: KeyEvent) -> Commands {
        let visible: Vec<String> = self
            .view_state
            .volumes
            .visible(&self.resources.volumes, |v| v.name.clone())
            .into_iter()
            .map(|v| v.name.clone())
            .collect();
        if self.handle_list_key(key, visible.len()) {
            return Vec::new();
        }
        match key.code {
            KeyCode::Char('d') => {
                if let Some(name) = visible.get(self.view_state.volumes.selected) {
                    self.modal = Some(ModalState::confirm(
                        format!("Are you sure you want to remove volume '{}'?", name),
                        PendingAction::DeleteVolume { name: name.clone() },
                    ));
                }
            }
            KeyCode::Char('p') => {
                self.modal = Some(ModalState::confirm(
                    "Remove all volumes not used by at least one container?",
                    PendingAction::PruneVolumes,
                ));
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_groups_key(&mut self, key: KeyEvent) -> Commands {
        match key.code {
            KeyCode::Left => {
                self.view_state.groups.prev_tab();
                return Vec::new();
            }
            KeyCode::Right => {
                self.view_state.groups.next_tab();
                return Vec::new();
            }
            _ => {}
        }

        let groups = &self.resources.groups;
        let containers = &self.resources.containers;
        let drill = &self.view_state.groups;
        let tab = drill.tab;
        match tab {
            Tab::List => {
                let highlighted = drill.highlighted_group(groups).cloned();
                let len = drill.visible_groups(groups).len();
                if self.handle_list_key(key, len) {
                    return Vec::new();
                }
                match key.code {
                    KeyCode::Enter => {
                        if let Some(group) = highlighted {
                            self.view_state.groups.enter(group.id);
                        }
                        Vec::new()
                    }
                    KeyCode::Char('n') => {
                        self.modal = Some(ModalState::form(
                            "Create New Group",
                            vec![FormField::required("Name"), FormField::optional("Description")],
                            PendingAction::CreateGroup,
                        ));
                        Vec::new()
                    }
                    KeyCode::Char(c @ ('s' | 'x')) => match highlighted {
                        Some(group) if group.container_ids.is_empty() => {
                            vec![self.set_status(
                                format!("Group {} has no containers", group.name),
                                true,
                            )]
                        }
                        Some(group) => {
                            let start = c == 's';
                            let verb = if start { "Starting" } else { "Stopping" };
                            let status = self.set_status(
                                format!(
                                    "{} {} containers in group {}...",
                                    verb,
                                    group.container_ids.len(),
                                    group.name
                                ),
                                false,
                            );
                            vec![status, self.group_batch(&group, start)]
                        }
                        None => Vec::new(),
                    },
                    KeyCode::Char('d') => {
                        if let Some(group) = highlighted {
                            self.modal = Some(ModalState::confirm(
                                format!("Are you sure you want to delete group '{}'?", group.name),
                                PendingAction::DeleteGroup {
                                    id: group.id,
                                    name: group.name,
                                },
                            ));
                        }
                        Vec::new()
                    }
                    _ => Vec::new(),
                }
            }
            Tab::InGroup => {
                let group = drill.selected_group(groups).cloned();
                let len = drill.group_members(groups, containers).len();
                if self.handle_list_key(key, len) {
                    return Vec::new();
                }
                if key.code == KeyCode::Char('u') {
                    if let (Some(group), Some(container)) = (group, self.selected_container()) {
                        self.modal = Some(ModalState::confirm(
                            format!("Remove '{}' from group '{}'?", container.name, group.name),
                            PendingAction::RemoveFromGroup {
                                group_id: group.id,
                                container_id: container.id,
                            },
                        ));
                    }
                    return Vec::new();
                }
                self.handle_container_action(key, true)
            }
            Tab::Available => {
                let group = drill.selected_group(groups).cloned();
                let available: Vec<Container> = drill
                    .group_available(groups, containers)
                    .into_iter()
                    .cloned()
                    .collect();
                if self.handle_list_key(key, available.len()) {
                    return Vec::new();
                }
                match (key.code, group) {
                    (KeyCode::Enter, Some(group)) => {
                        match available.get(self.view_state.groups.available.selected) {
                            Some(container) => vec![self.add_to_group(&group, container)],
                            None => Vec::new(),
                        }
                    }
                    _ => Vec::new(),
                }
            }
        }
    }

    fn handle_networks_key(&mut self, key: KeyEvent) -> Commands {
        match key.code {
            KeyCode::Left => {
                self.view_state.networks.prev_tab();
                return Vec::new();
            }
            KeyCode::Right => {
                self.view_state.networks.next_tab();
                return Vec::new();
            }
            _ => {}
        }

        let networks = &self.resources.networks;
        let containers = &self.resources.containers;
        let drill = &self.view_state.networks;
        let tab = drill.tab;
        match tab {
            Tab::List => {
                let highlighted = drill.highlighted_network(networks).cloned();
                let len = drill.visible_networks(networks).len();
                if self.handle_list_key(key, len) {
                    return Vec::new();
                }
                match key.code {
                    KeyCode::Enter => {
                        if let Some(network) = highlighted {
                            self.view_state.networks.enter(network.id);
                        }
                        Vec::new()
                    }
                    KeyCode::Char('n') => {
                        self.modal = Some(ModalState::form(
                            "Create New Network",
                            vec![
                                FormField::required("Name"),
                                FormField::optional("Driver (default: bridge)"),
                            ],
                            PendingAction::CreateNetwork,
                        ));
                        Vec::new()
                    }
                    KeyCode::Char('d') => match highlighted {
                        Some(network) if network.is_system() => {
                            vec![self.set_status("Cannot delete system network", true)]
                        }
                        Some(network) => {
                            self.modal = Some(ModalState::confirm(
                                format!(
                                    "Are you sure you want to remove network '{}'?",
                                    network.name
                                ),
                                PendingAction::DeleteNetwork {
                                    id: network.id,
                                    name: network.name,
                                },
                            ));
                            Vec::new()
                        }
                        None => Vec::new(),
                    },
                    _ => Vec::new(),
                }
            }
            Tab::InGroup => {
                let network = drill.selected_network(networks).cloned();
                let members: Vec<Container> = drill
                    .network_members(networks, containers)
                    .into_iter()
                    .cloned()
                    .collect();
                if self.handle_list_key(key, members.len()) {
                    return Vec::new();
                }
                if key.code == KeyCode::Char('u')
                    && let (Some(network), Some(container)) =
                        (network, members.get(self.view_state.networks.members.selected))
                {
                    self.modal = Some(ModalState::confirm(
                        format!(
                            "Disconnect '{}' from network '{}'?",
                            container.name, network.name
                        ),
                        PendingAction::DisconnectFromNetwork {
                            network_id: network.id,
                            container_id: container.id.clone(),
                        },
                    ));
                    return Vec::new();
                }
                self.handle_container_action(key, false)
            }
            Tab::Available => {
                let network = drill.selected_network(networks).cloned();
                let available: Vec<Container> = drill
                    .network_available(networks, containers)
                    .into_iter()
                    .cloned()
                    .collect();
                if self.handle_list_key(key, available.len()) {
                    return Vec::new();
                }
                match (key.code, network) {
                    (KeyCode::Enter, Some(network)) if network.is_system() => {
                        vec![self.set_status("Cannot modify system network", true)]
                    }
                    (KeyCode::Enter, Some(network)) => {
                        match available.get(self.view_state.networks.available.selected) {
                            Some(container) => vec![self.connect_network(&network, container)],
                            None => Vec::new(),
                        }
                    }
                    _ => Vec::new(),
                }
            }
        }
    }

    fn handle_compose_key(&mut self, key: KeyEvent) -> Commands {
        let projects = &self.resources.projects;
        let compose = &self.view_state.compose;
        let len = match compose.level {
            ComposeLevel::Projects => compose.visible_projects(projects).len(),
            ComposeLevel::Services => compose.visible_services(projects).len(),
            ComposeLevel::Containers => compose.visible_containers(projects).len(),
        };
        if self.handle_list_key(key, len) {
            return Vec::new();
        }
        if key.code == KeyCode::Enter {
            self.view_state.compose.enter(&self.resources.projects);
            return Vec::new();
        }

        match self.view_state.compose.level {
            ComposeLevel::Projects => {
                let Some(project) = self
                    .view_state
                    .compose
                    .highlighted_project(&self.resources.projects)
                    .cloned()
                else {
                    return Vec::new();
                };
                match key.code {
                    KeyCode::Char(c @ ('s' | 'x' | 'r')) => {
                        let status =
                            self.set_status(format!("Updating project {}...", project.name), false);
                        vec![status, self.compose_batch(&project, c)]
                    }
                    _ => Vec::new(),
                }
            }
            ComposeLevel::Services => self.handle_container_action(key, false),
            ComposeLevel::Containers => self.handle_container_action(key, true),
        }
    }

    fn handle_logs_key(&mut self, key: KeyEvent) {
        let logs = &mut self.view_state.logs;
        match key.code {
            KeyCode::Char('f') => logs.toggle_follow(),
            KeyCode::Char('g') | KeyCode::Home => logs.top(),
            KeyCode::Char('G') | KeyCode::End => logs.bottom(),
            KeyCode::Up | KeyCode::Char('k') => logs.scroll_up(),
            KeyCode::Down | KeyCode::Char('j') => logs.scroll_down(),
            _ => {}
        }
    }

    fn handle_env_key(&mut self, key: KeyEvent) -> Commands {
        if is_ctrl(&key, 's') {
            return self.save_env();
        }
        let len = self.view_state.env.visible().len();
        if self.handle_list_key(key, len) {
            return Vec::new();
        }
        let env = &mut self.view_state.env;
        match key.code {
            KeyCode::Char('a') | KeyCode::Char('n') => env.begin_add(),
            KeyCode::Char('e') | KeyCode::Enter => env.begin_edit(),
            KeyCode::Char('d') => env.delete_selected(),
            _ => {}
        }
        Vec::new()
    }

    fn save_env(&mut self) -> Commands {
        let env = &self.view_state.env;
        if !env.modified {
            return vec![self.set_status("No changes to save", false)];
        }
        let Some(spec) = env.to_spec() else {
            return Vec::new();
        };
        let id = env.container_id.clone();
        let status = self.set_status(format!("Recreating container {}...", spec.name), false);
        let recreate = self.recreate_container(id, spec);
        let mut commands = vec![status, recreate];
        commands.extend(self.go_back());
        commands
    }
}
