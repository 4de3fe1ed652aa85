//! Centralized keybindings and navigation commands
//!
//! Single source of truth for the footer hints and the About view's key
//! reference.

use crate::tui::app::state::{ComposeLevel, Tab, ViewKind};

/// Navigation command with keybinding and label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationCommand {
    /// The keybinding string (e.g., "j/k", "s", "Enter")
    pub key: &'static str,
    /// The human-readable label (e.g., "Navigate", "Start")
    pub label: &'static str,
}

impl NavigationCommand {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

const NAVIGATE: NavigationCommand = NavigationCommand::new("j/k", "Navigate");
const FILTER: NavigationCommand = NavigationCommand::new("/", "Filter");
const HELP: NavigationCommand = NavigationCommand::new("?", "Help");
const QUIT: NavigationCommand = NavigationCommand::new("q", "Quit");
const BACK: NavigationCommand = NavigationCommand::new("Esc", "Back");
const SUB_TABS: NavigationCommand = NavigationCommand::new("←/→", "Tabs");

const CONTAINER_ACTIONS: [NavigationCommand; 7] = [
    NavigationCommand::new("s", "Start"),
    NavigationCommand::new("x", "Stop"),
    NavigationCommand::new("r", "Restart"),
    NavigationCommand::new("d", "Delete"),
    NavigationCommand::new("l", "Logs"),
    NavigationCommand::new("t", "Stats"),
    NavigationCommand::new("v", "Env"),
];

/// Hints for the current view and its nested state
pub fn commands_for(view: ViewKind, tab: Tab, level: ComposeLevel) -> Vec<NavigationCommand> {
    let mut commands = Vec::new();
    match view {
        ViewKind::Containers => {
            commands.push(NAVIGATE);
            commands.extend(CONTAINER_ACTIONS);
            commands.push(FILTER);
        }
        ViewKind::Images => {
            commands.extend([
                NAVIGATE,
                NavigationCommand::new("d", "Delete"),
                NavigationCommand::new("p", "Pull"),
                FILTER,
            ]);
        }
        ViewKind::Volumes => {
            commands.extend([
                NAVIGATE,
                NavigationCommand::new("d", "Delete"),
                NavigationCommand::new("p", "Prune"),
                FILTER,
            ]);
        }
        ViewKind::Groups => {
            commands.extend([NAVIGATE, SUB_TABS]);
            match tab {
                Tab::List => commands.extend([
                    NavigationCommand::new("Enter", "Open"),
                    NavigationCommand::new("n", "New"),
                    NavigationCommand::new("s", "Start All"),
                    NavigationCommand::new("x", "Stop All"),
                    NavigationCommand::new("d", "Delete"),
                ]),
                Tab::InGroup => {
                    commands.extend(CONTAINER_ACTIONS);
                    commands.push(NavigationCommand::new("u", "Remove"));
                }
                Tab::Available => commands.push(NavigationCommand::new("Enter", "Add")),
            }
            commands.push(FILTER);
        }
        ViewKind::Networks => {
            commands.extend([NAVIGATE, SUB_TABS]);
            match tab {
                Tab::List => commands.extend([
                    NavigationCommand::new("Enter", "Open"),
                    NavigationCommand::new("n", "New"),
                    NavigationCommand::new("d", "Delete"),
                ]),
                Tab::InGroup => {
                    commands.extend(CONTAINER_ACTIONS.into_iter().filter(|c| c.key != "d"));
                    commands.push(NavigationCommand::new("u", "Disconnect"));
                }
                Tab::Available => commands.push(NavigationCommand::new("Enter", "Connect")),
            }
            commands.push(FILTER);
        }
        ViewKind::Compose => {
            commands.push(NAVIGATE);
            match level {
                ComposeLevel::Projects => commands.extend([
                    NavigationCommand::new("Enter", "Services"),
                    NavigationCommand::new("s", "Start"),
                    NavigationCommand::new("x", "Stop"),
                    NavigationCommand::new("r", "Restart"),
                ]),
                ComposeLevel::Services => {
                    commands.push(NavigationCommand::new("Enter", "Replicas"));
                    commands.extend(CONTAINER_ACTIONS.into_iter().filter(|c| c.key != "d"));
                }
                ComposeLevel::Containers => commands.extend(CONTAINER_ACTIONS),
            }
            commands.push(FILTER);
        }
        ViewKind::Logs => {
            commands.extend([
                NavigationCommand::new("j/k", "Scroll"),
                NavigationCommand::new("f", "Follow"),
                NavigationCommand::new("g/G", "Top/Bottom"),
            ]);
        }
        ViewKind::Stats => {}
        ViewKind::EnvVars => {
            commands.extend([
                NAVIGATE,
                NavigationCommand::new("a", "Add"),
                NavigationCommand::new("e", "Edit"),
                NavigationCommand::new("d", "Delete"),
                NavigationCommand::new("Ctrl+s", "Save & Recreate"),
            ]);
        }
        ViewKind::About => {}
    }

    if view.is_main() && view != ViewKind::About {
        commands.push(HELP);
    }
    if view == ViewKind::Containers {
        commands.push(QUIT);
    } else {
        commands.push(BACK);
    }
    commands
}

/// Render commands as a single hint line ("key label | key label")
pub fn hint_line(commands: &[NavigationCommand]) -> String {
    commands
        .iter()
        .map(|cmd| format!("{} {}", cmd.key, cmd.label))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Global keys listed in the About view
pub fn global_help_commands() -> Vec<(&'static str, &'static str)> {
    vec![
        ("<1>-<7>", "Switch view"),
        ("<Tab>/<S-Tab>", "Next / previous view"),
        ("<?>", "About and key reference"),
        ("</>", "Filter the current list"),
        ("<Esc>", "Back"),
        ("<q>/<Ctrl+c>", "Quit"),
    ]
}
