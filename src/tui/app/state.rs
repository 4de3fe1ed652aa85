//! Application state structures
//!
//! Per-view navigation state lives here, separate from the resource data it
//! points into. Parent selections in drill-down views are stored by key and
//! re-resolved against every refreshed collection.

use crate::docker::ClientError;
use crate::models::{
    ComposeProject, ComposeService, Container, ContainerSpec, ContainerStats, EnvVar, Group, Image,
    LogEntry, Network, Volume, env_to_strings, parse_env,
};
use crate::runtime::{Subscription, SubscriptionId};
use crossterm::event::{KeyCode, KeyEvent};
use std::collections::{HashSet, VecDeque};
use tokio_util::sync::CancellationToken;

/// View types for the application
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum ViewKind {
    Containers,
    Images,
    Groups,
    Volumes,
    Compose,
    Networks,
    About,
    Logs,
    Stats,
    EnvVars,
}

impl ViewKind {
    /// Views reachable with tab / shift+tab, in order
    pub const CYCLE: [ViewKind; 7] = [
        ViewKind::Containers,
        ViewKind::Images,
        ViewKind::Groups,
        ViewKind::Volumes,
        ViewKind::Compose,
        ViewKind::Networks,
        ViewKind::About,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ViewKind::Containers => "Containers",
            ViewKind::Images => "Images",
            ViewKind::Groups => "Groups",
            ViewKind::Volumes => "Volumes",
            ViewKind::Compose => "Compose",
            ViewKind::Networks => "Networks",
            ViewKind::About => "About",
            ViewKind::Logs => "Logs",
            ViewKind::Stats => "Stats",
            ViewKind::EnvVars => "Environment",
        }
    }

    pub fn from_hotkey(c: char) -> Option<Self> {
        let index = c.to_digit(10)? as usize;
        index
            .checked_sub(1)
            .and_then(|i| Self::CYCLE.get(i).copied())
    }

    fn cycle_index(self) -> Option<usize> {
        Self::CYCLE.iter().position(|v| *v == self)
    }

    /// Whether this view takes part in tab cycling
    pub fn is_main(self) -> bool {
        self.cycle_index().is_some()
    }

    pub fn next(self) -> Self {
        match self.cycle_index() {
            Some(i) => Self::CYCLE[(i + 1) % Self::CYCLE.len()],
            None => self,
        }
    }

    pub fn prev(self) -> Self {
        match self.cycle_index() {
            Some(i) => Self::CYCLE[(i + Self::CYCLE.len() - 1) % Self::CYCLE.len()],
            None => self,
        }
    }
}

/// Collections a view can ask to refetch
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Refresh {
    Containers,
    Images,
    Groups,
    Volumes,
    Networks,
    Compose,
}

impl Refresh {
    /// What a view needs fetched to render
    pub fn for_view(view: ViewKind) -> &'static [Refresh] {
        match view {
            ViewKind::Containers => &[Refresh::Containers],
            ViewKind::Images => &[Refresh::Images],
            ViewKind::Groups => &[Refresh::Groups, Refresh::Containers],
            ViewKind::Volumes => &[Refresh::Volumes, Refresh::Containers],
            ViewKind::Compose => &[Refresh::Compose],
            ViewKind::Networks => &[Refresh::Networks, Refresh::Containers],
            ViewKind::About | ViewKind::Logs | ViewKind::Stats | ViewKind::EnvVars => &[],
        }
    }
}

/// The latest snapshot of every resource collection
#[derive(Debug, Default)]
pub struct Resources {
    pub containers: Vec<Container>,
    pub images: Vec<Image>,
    pub volumes: Vec<Volume>,
    pub networks: Vec<Network>,
    pub groups: Vec<Group>,
    pub projects: Vec<ComposeProject>,
    pub loaded: HashSet<Refresh>,
}

impl Resources {
    pub fn is_loaded(&self, what: Refresh) -> bool {
        self.loaded.contains(&what)
    }

    /// Number of containers that mount `volume`
    pub fn volume_users(&self, volume: &str) -> usize {
        self.containers
            .iter()
            .filter(|c| c.uses_volume(volume))
            .count()
    }
}

/// Selection, scroll and filter of one list
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListState {
    pub selected: usize,
    pub scroll_offset: usize,
    pub filter: String,
    pub filtering: bool,
}

impl ListState {
    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    /// Keep the selection inside a list that may have shrunk
    pub fn clamp(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Case-insensitive substring match against the applied filter
    pub fn matches(&self, text: &str) -> bool {
        self.filter.is_empty() || text.to_lowercase().contains(&self.filter.to_lowercase())
    }

    /// Items of `items` that pass the filter
    pub fn visible<'a, T>(&self, items: &'a [T], text: impl Fn(&T) -> String) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(&text(item))).collect()
    }

    pub fn start_filter(&mut self) {
        self.filtering = true;
    }

    /// Keystrokes while the filter prompt is open
    pub fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.filter.clear();
                self.filtering = false;
                self.selected = 0;
                self.scroll_offset = 0;
            }
            KeyCode::Enter => {
                self.filtering = false;
                self.selected = 0;
                self.scroll_offset = 0;
            }
            KeyCode::Backspace => {
                self.filter.pop();
                self.selected = 0;
            }
            KeyCode::Char(c) => {
                self.filter.push(c);
                self.selected = 0;
            }
            _ => {}
        }
    }

    /// Up/down/home/end; returns false for keys it does not handle
    pub fn handle_nav_key(&mut self, key: KeyEvent, len: usize) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(len),
            KeyCode::Home => self.select_first(),
            KeyCode::End => self.select_last(len),
            _ => return false,
        }
        true
    }
}

/// Sub-tabs of the Groups and Networks views
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Tab {
    #[default]
    List,
    InGroup,
    Available,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::List, Tab::InGroup, Tab::Available];

    fn index(self) -> usize {
        match self {
            Tab::List => 0,
            Tab::InGroup => 1,
            Tab::Available => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// A parent list with two child lists (members and non-members).
///
/// Used by Groups (parent = group id) and Networks (parent = network id).
#[derive(Debug, Default)]
pub struct DrillDown {
    pub tab: Tab,
    pub list: ListState,
    pub members: ListState,
    pub available: ListState,
    parent: Option<String>,
}

impl DrillDown {
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn active(&self) -> &ListState {
        match self.tab {
            Tab::List => &self.list,
            Tab::InGroup => &self.members,
            Tab::Available => &self.available,
        }
    }

    pub fn active_mut(&mut self) -> &mut ListState {
        match self.tab {
            Tab::List => &mut self.list,
            Tab::InGroup => &mut self.members,
            Tab::Available => &mut self.available,
        }
    }

    /// Make `key` the parent and show its members
    pub fn enter(&mut self, key: impl Into<String>) {
        self.parent = Some(key.into());
        self.tab = Tab::InGroup;
        self.members.reset();
        self.available.reset();
    }

    /// Forget the parent and every child selection
    pub fn clear_parent(&mut self) {
        self.parent = None;
        self.tab = Tab::List;
        self.members.reset();
        self.available.reset();
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
    }

    pub fn prev_tab(&mut self) {
        self.tab = self.tab.prev();
    }

    /// Look the stored parent up by key
    pub fn resolve<'a, T>(&self, parents: &'a [T], key: impl Fn(&T) -> &str) -> Option<&'a T> {
        let wanted = self.parent.as_deref()?;
        parents.iter().find(|p| key(p) == wanted)
    }

    /// Re-resolve after `parents` was refreshed. A parent that vanished
    /// clears the child selections and returns to the list tab.
    pub fn reconcile<T>(&mut self, parents: &[T], key: impl Fn(&T) -> &str) {
        if self.parent.is_some() && self.resolve(parents, &key).is_none() {
            tracing::debug!(parent = ?self.parent, "drill-down parent disappeared");
            self.clear_parent();
        }
        self.list.clamp(parents.len());
    }
}

/// Groups view helpers
impl DrillDown {
    pub fn visible_groups<'a>(&self, groups: &'a [Group]) -> Vec<&'a Group> {
        self.list
            .visible(groups, |g| format!("{} {}", g.name, g.description))
    }

    pub fn highlighted_group<'a>(&self, groups: &'a [Group]) -> Option<&'a Group> {
        self.visible_groups(groups).get(self.list.selected).copied()
    }

    pub fn selected_group<'a>(&self, groups: &'a [Group]) -> Option<&'a Group> {
        self.resolve(groups, |g| g.id.as_str())
    }

    pub fn group_members<'a>(
        &self,
        groups: &[Group],
        containers: &'a [Container],
    ) -> Vec<&'a Container> {
        let Some(group) = self.selected_group(groups) else {
            return Vec::new();
        };
        containers
            .iter()
            .filter(|c| group.contains(&c.id) && self.members.matches(&c.name))
            .collect()
    }

    pub fn group_available<'a>(
        &self,
        groups: &[Group],
        containers: &'a [Container],
    ) -> Vec<&'a Container> {
        let Some(group) = self.selected_group(groups) else {
            return Vec::new();
        };
        containers
            .iter()
            .filter(|c| !group.contains(&c.id) && self.available.matches(&c.name))
            .collect()
    }
}

/// Networks view helpers
impl DrillDown {
    pub fn visible_networks<'a>(&self, networks: &'a [Network]) -> Vec<&'a Network> {
        self.list
            .visible(networks, |n| format!("{} {}", n.name, n.driver))
    }

    pub fn highlighted_network<'a>(&self, networks: &'a [Network]) -> Option<&'a Network> {
        self.visible_networks(networks)
            .get(self.list.selected)
            .copied()
    }

    pub fn selected_network<'a>(&self, networks: &'a [Network]) -> Option<&'a Network> {
        self.resolve(networks, |n| n.id.as_str())
    }

    pub fn network_members<'a>(
        &self,
        networks: &[Network],
        containers: &'a [Container],
    ) -> Vec<&'a Container> {
        let Some(network) = self.selected_network(networks) else {
            return Vec::new();
        };
        containers
            .iter()
            .filter(|c| network.has_container(&c.id) && self.members.matches(&c.name))
            .collect()
    }

    pub fn network_available<'a>(
        &self,
        networks: &[Network],
        containers: &'a [Container],
    ) -> Vec<&'a Container> {
        let Some(network) = self.selected_network(networks) else {
            return Vec::new();
        };
        containers
            .iter()
            .filter(|c| !network.has_container(&c.id) && self.available.matches(&c.name))
            .collect()
    }
}

/// Depth of the Compose drill-down
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ComposeLevel {
    #[default]
    Projects,
    Services,
    Containers,
}

/// Compose view: projects, then services, then the replicas of a scaled
/// service
#[derive(Debug, Default)]
pub struct ComposeState {
    pub level: ComposeLevel,
    pub projects: ListState,
    pub services: ListState,
    pub containers: ListState,
    project: Option<String>,
    service: Option<String>,
}

impl ComposeState {
    pub fn active(&self) -> &ListState {
        match self.level {
            ComposeLevel::Projects => &self.projects,
            ComposeLevel::Services => &self.services,
            ComposeLevel::Containers => &self.containers,
        }
    }

    pub fn active_mut(&mut self) -> &mut ListState {
        match self.level {
            ComposeLevel::Projects => &mut self.projects,
            ComposeLevel::Services => &mut self.services,
            ComposeLevel::Containers => &mut self.containers,
        }
    }

    pub fn visible_projects<'a>(&self, projects: &'a [ComposeProject]) -> Vec<&'a ComposeProject> {
        self.projects.visible(projects, |p| p.name.clone())
    }

    pub fn highlighted_project<'a>(
        &self,
        projects: &'a [ComposeProject],
    ) -> Option<&'a ComposeProject> {
        self.visible_projects(projects)
            .get(self.projects.selected)
            .copied()
    }

    pub fn selected_project<'a>(&self, projects: &'a [ComposeProject]) -> Option<&'a ComposeProject> {
        let name = self.project.as_deref()?;
        projects.iter().find(|p| p.name == name)
    }

    pub fn visible_services<'a>(&self, projects: &'a [ComposeProject]) -> Vec<&'a ComposeService> {
        match self.selected_project(projects) {
            Some(project) => self.services.visible(&project.services, |s| s.name.clone()),
            None => Vec::new(),
        }
    }

    fn highlighted_service<'a>(&self, projects: &'a [ComposeProject]) -> Option<&'a ComposeService> {
        self.visible_services(projects)
            .get(self.services.selected)
            .copied()
    }

    pub fn selected_service<'a>(&self, projects: &'a [ComposeProject]) -> Option<&'a ComposeService> {
        let name = self.service.as_deref()?;
        self.selected_project(projects)?.service(name)
    }

    pub fn visible_containers<'a>(&self, projects: &'a [ComposeProject]) -> Vec<&'a Container> {
        match self.selected_service(projects) {
            Some(service) => self.containers.visible(&service.containers, |c| c.name.clone()),
            None => Vec::new(),
        }
    }

    /// The container that container actions target. At service level only a
    /// single-replica service has one.
    pub fn selected_container<'a>(&self, projects: &'a [ComposeProject]) -> Option<&'a Container> {
        match self.level {
            ComposeLevel::Projects => None,
            ComposeLevel::Services => {
                let service = self.highlighted_service(projects)?;
                match service.containers.as_slice() {
                    [only] => Some(only),
                    _ => None,
                }
            }
            ComposeLevel::Containers => self
                .visible_containers(projects)
                .get(self.containers.selected)
                .copied(),
        }
    }

    /// Descend one level. Services only open when scaled.
    pub fn enter(&mut self, projects: &[ComposeProject]) {
        match self.level {
            ComposeLevel::Projects => {
                if let Some(project) = self.highlighted_project(projects) {
                    self.project = Some(project.name.clone());
                    self.level = ComposeLevel::Services;
                    self.services.reset();
                }
            }
            ComposeLevel::Services => {
                if let Some(service) = self.highlighted_service(projects)
                    && service.is_scaled()
                {
                    self.service = Some(service.name.clone());
                    self.level = ComposeLevel::Containers;
                    self.containers.reset();
                }
            }
            ComposeLevel::Containers => {}
        }
    }

    /// Climb one level; false when already at the top
    pub fn back(&mut self) -> bool {
        match self.level {
            ComposeLevel::Projects => false,
            ComposeLevel::Services => {
                self.level = ComposeLevel::Projects;
                self.project = None;
                true
            }
            ComposeLevel::Containers => {
                self.level = ComposeLevel::Services;
                self.service = None;
                true
            }
        }
    }

    /// Re-resolve project and service by name after a refresh
    pub fn reconcile(&mut self, projects: &[ComposeProject]) {
        self.projects.clamp(projects.len());
        if self.project.is_some() && self.selected_project(projects).is_none() {
            tracing::debug!(project = ?self.project, "compose project disappeared");
            self.project = None;
            self.service = None;
            self.level = ComposeLevel::Projects;
            return;
        }
        if self.service.is_some() && self.selected_service(projects).is_none() {
            self.service = None;
            if self.level == ComposeLevel::Containers {
                self.level = ComposeLevel::Services;
            }
        }
    }
}

/// A stream a view asked for. The subscription arrives later, once the
/// command that opens the channels has run.
#[derive(Debug)]
pub(crate) struct LiveStream<T> {
    id: SubscriptionId,
    token: CancellationToken,
    subscription: Option<Subscription<T>>,
}

impl<T: Send + 'static> LiveStream<T> {
    fn new(id: SubscriptionId, token: CancellationToken) -> Self {
        Self {
            id,
            token,
            subscription: None,
        }
    }

    pub(crate) fn subscription(&self) -> Option<&Subscription<T>> {
        self.subscription.as_ref()
    }

    fn cancel(self, kind: &str) {
        tracing::debug!(subscription = %self.id, "closing {} stream", kind);
        self.token.cancel();
        if let Some(subscription) = self.subscription {
            subscription.cancel();
        }
    }
}

/// Store `subscription` in `slot` if it is the stream the view is waiting
/// for; otherwise tear it down. Returns whether it was kept.
fn attach<T: Send + 'static>(slot: &mut Option<LiveStream<T>>, subscription: Subscription<T>) -> bool {
    match slot {
        Some(live) if live.id == subscription.id() && live.subscription.is_none() => {
            live.subscription = Some(subscription);
            true
        }
        _ => {
            tracing::debug!(subscription = %subscription.id(), "dropping unwanted stream");
            subscription.cancel();
            false
        }
    }
}

/// Log viewer
#[derive(Debug, Default)]
pub struct LogsState {
    pub container_id: String,
    pub container_name: String,
    pub lines: VecDeque<LogEntry>,
    pub capacity: usize,
    pub follow: bool,
    /// Lines between the bottom of the buffer and the bottom of the screen
    pub scroll_from_bottom: usize,
    pub(crate) stream: Option<LiveStream<LogEntry>>,
}

impl LogsState {
    pub(crate) fn open(
        &mut self,
        container: &Container,
        capacity: usize,
        follow: bool,
        id: SubscriptionId,
        token: CancellationToken,
    ) {
        self.close();
        self.container_id = container.id.clone();
        self.container_name = container.name.clone();
        self.lines.clear();
        self.capacity = capacity.max(1);
        self.follow = follow;
        self.scroll_from_bottom = 0;
        self.stream = Some(LiveStream::new(id, token));
    }

    /// Attach the opened stream; false if it is not the one requested
    pub(crate) fn attach(&mut self, subscription: Subscription<LogEntry>) -> bool {
        attach(&mut self.stream, subscription)
    }

    pub fn subscription_id(&self) -> Option<SubscriptionId> {
        self.stream.as_ref().map(|s| s.id)
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.is_some()
    }

    /// Whether an event from `id` belongs to the live stream
    pub fn accepts(&self, id: SubscriptionId) -> bool {
        self.subscription_id() == Some(id)
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.lines.push_back(entry);
        while self.lines.len() > self.capacity {
            self.lines.pop_front();
        }
        if self.follow {
            self.scroll_from_bottom = 0;
        } else {
            self.scroll_from_bottom = (self.scroll_from_bottom + 1).min(self.lines.len());
        }
    }

    pub fn toggle_follow(&mut self) {
        self.follow = !self.follow;
        if self.follow {
            self.scroll_from_bottom = 0;
        }
    }

    pub fn scroll_up(&mut self) {
        self.follow = false;
        self.scroll_from_bottom = (self.scroll_from_bottom + 1).min(self.lines.len());
    }

    pub fn scroll_down(&mut self) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(1);
    }

    pub fn top(&mut self) {
        self.follow = false;
        self.scroll_from_bottom = self.lines.len();
    }

    pub fn bottom(&mut self) {
        self.scroll_from_bottom = 0;
    }

    /// Tear down the stream; later events from it are ignored
    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.cancel("log");
        }
    }
}

/// Live resource usage
#[derive(Debug, Default)]
pub struct StatsState {
    pub container_id: String,
    pub container_name: String,
    pub latest: Option<ContainerStats>,
    /// CPU percentage samples, oldest first
    pub cpu_history: VecDeque<u64>,
    pub history: usize,
    pub(crate) stream: Option<LiveStream<ContainerStats>>,
}

impl StatsState {
    pub(crate) fn open(
        &mut self,
        container: &Container,
        history: usize,
        id: SubscriptionId,
        token: CancellationToken,
    ) {
        self.close();
        self.container_id = container.id.clone();
        self.container_name = container.name.clone();
        self.latest = None;
        self.cpu_history.clear();
        self.history = history.max(1);
        self.stream = Some(LiveStream::new(id, token));
    }

    pub(crate) fn attach(&mut self, subscription: Subscription<ContainerStats>) -> bool {
        attach(&mut self.stream, subscription)
    }

    pub fn subscription_id(&self) -> Option<SubscriptionId> {
        self.stream.as_ref().map(|s| s.id)
    }

    pub fn accepts(&self, id: SubscriptionId) -> bool {
        self.subscription_id() == Some(id)
    }

    pub fn push(&mut self, stats: ContainerStats) {
        self.cpu_history.push_back(stats.cpu_percent.round().max(0.0) as u64);
        while self.cpu_history.len() > self.history {
            self.cpu_history.pop_front();
        }
        self.latest = Some(stats);
    }

    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.cancel("stats");
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum EnvField {
    #[default]
    Key,
    Value,
}

/// One row being added (`index == None`) or edited
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnvEdit {
    pub index: Option<usize>,
    pub key: String,
    pub value: String,
    pub focus: EnvField,
}

/// Environment editor for one container
#[derive(Debug, Default)]
pub struct EnvState {
    pub container_id: String,
    pub container_name: String,
    pub vars: Vec<EnvVar>,
    pub list: ListState,
    pub editing: Option<EnvEdit>,
    pub modified: bool,
    spec: Option<ContainerSpec>,
}

impl EnvState {
    pub fn load(&mut self, container_id: &str, spec: ContainerSpec) {
        self.container_id = container_id.to_string();
        self.container_name = spec.name.clone();
        self.vars = parse_env(&spec.env);
        self.list.reset();
        self.editing = None;
        self.modified = false;
        self.spec = Some(spec);
    }

    pub fn discard(&mut self) {
        *self = Self::default();
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn visible(&self) -> Vec<&EnvVar> {
        self.list.visible(&self.vars, |v| v.key.clone())
    }

    fn selected_index(&self) -> Option<usize> {
        let key = &self.visible().get(self.list.selected)?.key;
        self.vars.iter().position(|v| &v.key == key)
    }

    pub fn begin_add(&mut self) {
        self.editing = Some(EnvEdit::default());
    }

    pub fn begin_edit(&mut self) {
        if let Some(index) = self.selected_index() {
            let var = &self.vars[index];
            self.editing = Some(EnvEdit {
                index: Some(index),
                key: var.key.clone(),
                value: var.value.clone(),
                focus: EnvField::Key,
            });
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(index) = self.selected_index() {
            self.vars.remove(index);
            self.modified = true;
            self.list.clamp(self.visible().len());
        }
    }

    /// Keystrokes while a row is open. Enter saves (a blank key discards),
    /// esc cancels.
    pub fn handle_edit_key(&mut self, key: KeyEvent) {
        let Some(edit) = self.editing.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.editing = None,
            KeyCode::Tab | KeyCode::BackTab => {
                edit.focus = match edit.focus {
                    EnvField::Key => EnvField::Value,
                    EnvField::Value => EnvField::Key,
                };
            }
            KeyCode::Backspace => {
                match edit.focus {
                    EnvField::Key => edit.key.pop(),
                    EnvField::Value => edit.value.pop(),
                };
            }
            KeyCode::Char(c) => match edit.focus {
                EnvField::Key => edit.key.push(c),
                EnvField::Value => edit.value.push(c),
            },
            KeyCode::Enter => {
                if let Some(edit) = self.editing.take() {
                    self.commit(edit);
                }
            }
            _ => {}
        }
    }

    fn commit(&mut self, edit: EnvEdit) {
        let key = edit.key.trim();
        if key.is_empty() {
            return;
        }
        let var = EnvVar::new(key, edit.value);
        match edit.index {
            Some(index) if index < self.vars.len() => self.vars[index] = var,
            _ => self.vars.push(var),
        }
        self.modified = true;
    }

    /// The loaded spec with the edited environment
    pub fn to_spec(&self) -> Option<ContainerSpec> {
        let mut spec = self.spec.clone()?;
        spec.env = env_to_strings(&self.vars);
        Some(spec)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBanner {
    pub message: String,
    pub is_error: bool,
}

/// UI-related state (banner, terminal size, quit flag)
#[derive(Debug, Default)]
pub struct UIState {
    pub status: Option<StatusBanner>,
    /// Bumped on every new banner; a clear for an older generation is stale
    pub status_generation: u64,
    pub size: (u16, u16),
    pub should_quit: bool,
}

/// View-related state (navigation, per-view lists, detail views)
#[derive(Debug)]
pub struct ViewState {
    pub current: ViewKind,
    pub previous: ViewKind,
    pub containers: ListState,
    pub images: ListState,
    pub volumes: ListState,
    pub groups: DrillDown,
    pub networks: DrillDown,
    pub compose: ComposeState,
    pub logs: LogsState,
    pub stats: StatsState,
    pub env: EnvState,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            current: ViewKind::Containers,
            previous: ViewKind::Containers,
            containers: ListState::default(),
            images: ListState::default(),
            volumes: ListState::default(),
            groups: DrillDown::default(),
            networks: DrillDown::default(),
            compose: ComposeState::default(),
            logs: LogsState::default(),
            stats: StatsState::default(),
            env: EnvState::default(),
        }
    }
}

impl ViewState {
    /// The list that receives navigation and filter keys in the current view
    pub fn active_list(&self) -> Option<&ListState> {
        match self.current {
            ViewKind::Containers => Some(&self.containers),
            ViewKind::Images => Some(&self.images),
            ViewKind::Volumes => Some(&self.volumes),
            ViewKind::Groups => Some(self.groups.active()),
            ViewKind::Networks => Some(self.networks.active()),
            ViewKind::Compose => Some(self.compose.active()),
            ViewKind::EnvVars => Some(&self.env.list),
            ViewKind::About | ViewKind::Logs | ViewKind::Stats => None,
        }
    }

    pub fn active_list_mut(&mut self) -> Option<&mut ListState> {
        match self.current {
            ViewKind::Containers => Some(&mut self.containers),
            ViewKind::Images => Some(&mut self.images),
            ViewKind::Volumes => Some(&mut self.volumes),
            ViewKind::Groups => Some(self.groups.active_mut()),
            ViewKind::Networks => Some(self.networks.active_mut()),
            ViewKind::Compose => Some(self.compose.active_mut()),
            ViewKind::EnvVars => Some(&mut self.env.list),
            ViewKind::About | ViewKind::Logs | ViewKind::Stats => None,
        }
    }

    /// Whether the current view's filter prompt is open
    pub fn is_filtering(&self) -> bool {
        self.active_list().is_some_and(|l| l.filtering)
    }

    /// Whether keystrokes are captured as text (filter prompt or env row)
    pub fn is_capturing_text(&self) -> bool {
        self.is_filtering() || (self.current == ViewKind::EnvVars && self.env.is_editing())
    }

    /// Re-resolve every drill-down against fresh data and clamp selections
    pub fn reconcile(&mut self, resources: &Resources) {
        let visible = self.containers.visible(&resources.containers, |c| {
            format!("{} {} {}", c.name, c.image, c.state)
        });
        self.containers.clamp(visible.len());
        self.images.clamp(resources.images.len());
        self.volumes.clamp(resources.volumes.len());

        self.groups.reconcile(&resources.groups, |g| g.id.as_str());
        let members = self
            .groups
            .group_members(&resources.groups, &resources.containers)
            .len();
        let available = self
            .groups
            .group_available(&resources.groups, &resources.containers)
            .len();
        self.groups.members.clamp(members);
        self.groups.available.clamp(available);

        self.networks.reconcile(&resources.networks, |n| n.id.as_str());
        let members = self
            .networks
            .network_members(&resources.networks, &resources.containers)
            .len();
        let available = self
            .networks
            .network_available(&resources.networks, &resources.containers)
            .len();
        self.networks.members.clamp(members);
        self.networks.available.clamp(available);

        self.compose.reconcile(&resources.projects);
    }
}

/// Error text for a failed stream, shown in the banner
pub(crate) fn stream_error_message(kind: &str, error: &ClientError) -> String {
    format!("{} stream ended: {}", kind, error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_view_cycle_wraps() {
        assert_eq!(ViewKind::About.next(), ViewKind::Containers);
        assert_eq!(ViewKind::Containers.prev(), ViewKind::About);
        assert_eq!(ViewKind::Logs.next(), ViewKind::Logs);
        assert_eq!(ViewKind::from_hotkey('6'), Some(ViewKind::Networks));
        assert_eq!(ViewKind::from_hotkey('8'), None);
        assert_eq!(ViewKind::from_hotkey('0'), None);
    }

    #[test]
    fn test_filter_keys() {
        let mut list = ListState {
            selected: 3,
            ..Default::default()
        };
        list.start_filter();
        list.handle_filter_key(key(KeyCode::Char('w')));
        list.handle_filter_key(key(KeyCode::Char('e')));
        list.handle_filter_key(key(KeyCode::Char('x')));
        list.handle_filter_key(key(KeyCode::Backspace));
        assert_eq!(list.filter, "we");
        assert_eq!(list.selected, 0);
        assert!(list.matches("Web-1"));
        assert!(!list.matches("db"));

        list.handle_filter_key(key(KeyCode::Enter));
        assert!(!list.filtering);
        assert_eq!(list.filter, "we");

        list.start_filter();
        list.handle_filter_key(key(KeyCode::Esc));
        assert!(list.filter.is_empty());
    }

    #[test]
    fn test_logs_buffer_is_capped() {
        let mut logs = LogsState {
            capacity: 3,
            follow: true,
            ..Default::default()
        };
        for i in 0..5 {
            logs.push(LogEntry::stdout(format!("line {}", i)));
        }
        let lines: Vec<_> = logs.lines.iter().map(|l| l.line.as_str()).collect();
        assert_eq!(lines, vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn test_logs_scroll_holds_position_when_not_following() {
        let mut logs = LogsState {
            capacity: 10,
            follow: true,
            ..Default::default()
        };
        logs.push(LogEntry::stdout("a"));
        logs.push(LogEntry::stdout("b"));
        logs.scroll_up();
        assert!(!logs.follow);
        logs.push(LogEntry::stdout("c"));
        assert_eq!(logs.scroll_from_bottom, 2);
        logs.toggle_follow();
        assert_eq!(logs.scroll_from_bottom, 0);
    }

    #[test]
    fn test_env_editor_add_edit_delete() {
        let spec = ContainerSpec {
            name: "api".into(),
            env: vec!["A=1".into(), "B=2".into()],
            ..Default::default()
        };
        let mut env = EnvState::default();
        env.load("abc", spec);

        env.begin_add();
        for c in "C".chars() {
            env.handle_edit_key(key(KeyCode::Char(c)));
        }
        env.handle_edit_key(key(KeyCode::Tab));
        env.handle_edit_key(key(KeyCode::Char('3')));
        env.handle_edit_key(key(KeyCode::Enter));

        env.list.selected = 0;
        env.begin_edit();
        env.handle_edit_key(key(KeyCode::Tab));
        env.handle_edit_key(key(KeyCode::Backspace));
        env.handle_edit_key(key(KeyCode::Char('9')));
        env.handle_edit_key(key(KeyCode::Enter));

        env.list.selected = 1;
        env.delete_selected();

        assert!(env.modified);
        let spec = env.to_spec().unwrap();
        assert_eq!(spec.env, vec!["A=9".to_string(), "C=3".to_string()]);
    }

    #[test]
    fn test_env_editor_blank_key_is_discarded() {
        let mut env = EnvState::default();
        env.load("abc", ContainerSpec::default());
        env.begin_add();
        env.handle_edit_key(key(KeyCode::Char(' ')));
        env.handle_edit_key(key(KeyCode::Enter));
        assert!(env.vars.is_empty());
        assert!(!env.modified);
        assert!(!env.is_editing());
    }
}
