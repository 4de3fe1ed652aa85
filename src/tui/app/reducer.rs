//! The reducer: the only place application state changes
//!
//! One event is handled start to finish before the next. Side effects come
//! back as commands; nothing here awaits.

use super::async_ops::{next_log, next_stats};
use super::core::App;
use super::events::Event;
use super::state::{LiveStream, Refresh, ViewKind, stream_error_message};
use crate::models::short_id;
use crate::runtime::Command;

/// Apply `event` to `app` and return the work it triggers
pub fn reduce(app: &mut App, event: Event) -> Vec<Command<Event>> {
    match event {
        Event::Input(key) => app.handle_key(key),
        Event::Resize(width, height) => {
            app.ui_state.size = (width, height);
            Vec::new()
        }
        Event::RefreshTick => {
            let mut commands = vec![app.tick()];
            if !app.view_state.is_capturing_text() && app.modal.is_none() {
                commands.extend(app.fetch_view(app.view_state.current));
            }
            commands
        }
        Event::ClearStatus { generation } => {
            app.clear_status(generation);
            Vec::new()
        }

        Event::ContainersLoaded(result) => {
            loaded(app, Refresh::Containers, result, "containers", |app, v| {
                app.resources.containers = v
            })
        }
        Event::ImagesLoaded(result) => loaded(app, Refresh::Images, result, "images", |app, v| {
            app.resources.images = v
        }),
        Event::VolumesLoaded(result) => {
            loaded(app, Refresh::Volumes, result, "volumes", |app, v| {
                app.resources.volumes = v
            })
        }
        Event::NetworksLoaded(result) => {
            loaded(app, Refresh::Networks, result, "networks", |app, v| {
                app.resources.networks = v
            })
        }
        Event::ComposeLoaded(result) => {
            loaded(app, Refresh::Compose, result, "compose projects", |app, v| {
                app.resources.projects = v
            })
        }
        Event::GroupsLoaded(result) => loaded(app, Refresh::Groups, result, "groups", |app, v| {
            app.resources.groups = v
        }),

        Event::OperationFinished { result, refresh } => {
            let status = match result {
                Ok(message) => app.set_status(message, false),
                Err(message) => app.set_status(message, true),
            };
            let mut commands = vec![status];
            commands.extend(refresh.into_iter().map(|what| app.fetch(what)));
            commands
        }

        Event::ContainerConfigLoaded { id, result } => match result {
            Ok(spec) => {
                let name = spec.name.clone();
                let mut commands = app.switch_view(ViewKind::EnvVars);
                app.view_state.env.load(&id, spec);
                commands.push(app.set_status(format!("Editing environment of {}", name), false));
                commands
            }
            Err(e) => vec![app.set_status(format!("Failed to load container config: {}", e), true)],
        },

        Event::Recreated {
            old_id,
            name,
            outcome,
        } => {
            let message = match (&outcome.result, &outcome.new_id) {
                (Ok(()), _) => Ok(format!("Container {} recreated", name)),
                (Err(e), Some(new_id)) => Err(format!(
                    "Failed to recreate container: {} (new container {} exists)",
                    e,
                    short_id(new_id)
                )),
                (Err(e), None) => Err(format!("Failed to recreate container: {}", e)),
            };
            tracing::debug!(old = %short_id(&old_id), steps = ?outcome.steps, "recreate finished");
            let status = match message {
                Ok(message) => app.set_status(message, false),
                Err(message) => app.set_status(message, true),
            };
            vec![
                status,
                app.fetch(Refresh::Containers),
                app.fetch(Refresh::Groups),
            ]
        }

        Event::LogStreamOpened(subscription) => {
            let rearm = next_log(&subscription);
            if app.view_state.logs.attach(subscription) {
                vec![rearm]
            } else {
                Vec::new()
            }
        }
        Event::StatsStreamOpened(subscription) => {
            let rearm = next_stats(&subscription);
            if app.view_state.stats.attach(subscription) {
                vec![rearm]
            } else {
                Vec::new()
            }
        }

        Event::LogLine {
            subscription,
            entry,
        } => {
            let logs = &mut app.view_state.logs;
            if !logs.accepts(subscription) {
                return Vec::new();
            }
            logs.push(entry);
            match logs.stream.as_ref().and_then(LiveStream::subscription) {
                Some(live) => vec![next_log(live)],
                None => Vec::new(),
            }
        }
        Event::StatsSample {
            subscription,
            stats,
        } => {
            let panel = &mut app.view_state.stats;
            if !panel.accepts(subscription) {
                return Vec::new();
            }
            panel.push(stats);
            match panel.stream.as_ref().and_then(LiveStream::subscription) {
                Some(live) => vec![next_stats(live)],
                None => Vec::new(),
            }
        }
        Event::StreamFailed {
            subscription,
            error,
        } => {
            if app.view_state.logs.accepts(subscription) {
                app.view_state.logs.close();
                vec![app.set_status(stream_error_message("Log", &error), true)]
            } else if app.view_state.stats.accepts(subscription) {
                app.view_state.stats.close();
                vec![app.set_status(stream_error_message("Stats", &error), true)]
            } else {
                Vec::new()
            }
        }
    }
}

/// Store a fetched collection and re-resolve every drill-down against it
fn loaded<T, E: std::fmt::Display>(
    app: &mut App,
    what: Refresh,
    result: Result<T, E>,
    noun: &str,
    store: impl FnOnce(&mut App, T),
) -> Vec<Command<Event>> {
    match result {
        Ok(items) => {
            store(app, items);
            app.resources.loaded.insert(what);
            app.view_state.reconcile(&app.resources);
            Vec::new()
        }
        Err(e) => vec![app.set_status(format!("Failed to list {}: {}", noun, e), true)],
    }
}

impl App {
    /// Method form of [`reduce`]
    pub fn update(&mut self, event: Event) -> Vec<Command<Event>> {
        reduce(self, event)
    }
}
