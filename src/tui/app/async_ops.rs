//! Command builders
//!
//! Everything that talks to the daemon or the group store is packaged here
//! as a [`Command`] for the scheduler. The reducer never awaits.

use super::core::App;
use super::events::Event;
use super::modal::{ModalState, PendingAction};
use super::state::{Refresh, ViewKind};
use crate::docker::{LogOptions, ResourceClient};
use crate::models::{ComposeProject, Container, ContainerSpec, ContainerStats, Group, LogEntry, Network};
use crate::runtime::{Command, Subscription};
use crate::services::{recreate, run_batch};
use crate::tui::constants::DEFAULT_NETWORK_DRIVER;
use std::future::Future;
use std::sync::Arc;
use tokio::time::Instant;

/// Wrap a mutation whose outcome is already a banner message
fn finish<F>(label: &'static str, refresh: Vec<Refresh>, fut: F) -> Command<Event>
where
    F: Future<Output = Result<String, String>> + Send + 'static,
{
    Command::new(label, async move {
        let result = fut.await;
        match &result {
            Ok(message) => tracing::info!(operation = label, "{}", message),
            Err(message) => tracing::warn!(operation = label, "{}", message),
        }
        Some(Event::OperationFinished { result, refresh })
    })
}

pub(crate) fn next_log(subscription: &Subscription<LogEntry>) -> Command<Event> {
    subscription.next_command(
        |subscription, entry| Event::LogLine {
            subscription,
            entry,
        },
        |subscription, error| Event::StreamFailed {
            subscription,
            error,
        },
    )
}

pub(crate) fn next_stats(subscription: &Subscription<ContainerStats>) -> Command<Event> {
    subscription.next_command(
        |subscription, stats| Event::StatsSample {
            subscription,
            stats,
        },
        |subscription, error| Event::StreamFailed {
            subscription,
            error,
        },
    )
}

fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}

impl App {
    pub(crate) fn fetch(&self, what: Refresh) -> Command<Event> {
        let client = Arc::clone(&self.client);
        match what {
            Refresh::Containers => Command::new("list containers", async move {
                Some(Event::ContainersLoaded(client.list_containers().await))
            }),
            Refresh::Images => Command::new("list images", async move {
                Some(Event::ImagesLoaded(client.list_images().await))
            }),
            Refresh::Volumes => Command::new("list volumes", async move {
                Some(Event::VolumesLoaded(client.list_volumes().await))
            }),
            Refresh::Networks => Command::new("list networks", async move {
                Some(Event::NetworksLoaded(client.list_networks().await))
            }),
            Refresh::Compose => Command::new("list compose projects", async move {
                Some(Event::ComposeLoaded(client.list_compose_projects().await))
            }),
            Refresh::Groups => {
                let store = Arc::clone(&self.store);
                Command::new("list groups", async move {
                    Some(Event::GroupsLoaded(store.list()))
                })
            }
        }
    }

    /// Refreshes that follow any container mutation
    fn container_refresh(&self) -> Vec<Refresh> {
        let mut refresh = vec![Refresh::Containers];
        if self.view_state.current == ViewKind::Compose {
            refresh.push(Refresh::Compose);
        }
        refresh
    }

    pub(crate) fn start_container(&self, container: &Container) -> Command<Event> {
        let client = Arc::clone(&self.client);
        let id = container.id.clone();
        finish("start container", self.container_refresh(), async move {
            client
                .start_container(&id)
                .await
                .map(|_| format!("Container {} started", crate::models::short_id(&id)))
                .map_err(|e| format!("Failed to start container: {}", e))
        })
    }

    pub(crate) fn stop_container(&self, container: &Container) -> Command<Event> {
        let client = Arc::clone(&self.client);
        let id = container.id.clone();
        let grace = self.config.timeouts.stop_grace();
        finish("stop container", self.container_refresh(), async move {
            client
                .stop_container(&id, grace)
                .await
                .map(|_| format!("Container {} stopped", crate::models::short_id(&id)))
                .map_err(|e| format!("Failed to stop container: {}", e))
        })
    }

    pub(crate) fn restart_container(&self, container: &Container) -> Command<Event> {
        let client = Arc::clone(&self.client);
        let id = container.id.clone();
        let grace = self.config.timeouts.stop_grace();
        finish("restart container", self.container_refresh(), async move {
            client
                .restart_container(&id, grace)
                .await
                .map(|_| format!("Container {} restarted", crate::models::short_id(&id)))
                .map_err(|e| format!("Failed to restart container: {}", e))
        })
    }

    /// Switch to the log viewer and ask for a log stream for `container`.
    /// The stream is opened by the returned command and attached when
    /// [`Event::LogStreamOpened`] comes back.
    pub(crate) fn open_logs(&mut self, container: &Container) -> Vec<Command<Event>> {
        let logger = &self.config.logger;
        let options = LogOptions {
            follow: logger.follow,
            tail: logger.tail.clone(),
            since: 0,
            timestamps: logger.timestamps,
        };
        let capacity = logger.buffer;

        let id = self.subscription_ids.next();
        let token = self.streams.child_token();
        tracing::debug!(container = %container.short_id(), subscription = %id, "requesting log stream");

        let mut commands = self.switch_view(ViewKind::Logs);
        self.view_state
            .logs
            .open(container, capacity, true, id, token.clone());

        let client = Arc::clone(&self.client);
        let container_id = container.id.clone();
        commands.push(Command::new("open log stream", async move {
            let channels = client.stream_logs(&container_id, options, token.clone());
            Some(Event::LogStreamOpened(Subscription::open(id, channels, token)))
        }));
        commands
    }

    /// Switch to the stats panel and ask for a stats stream for `container`
    pub(crate) fn open_stats(&mut self, container: &Container) -> Vec<Command<Event>> {
        let id = self.subscription_ids.next();
        let token = self.streams.child_token();
        tracing::debug!(container = %container.short_id(), subscription = %id, "requesting stats stream");

        let mut commands = self.switch_view(ViewKind::Stats);
        self.view_state
            .stats
            .open(container, self.config.ui.stats_history, id, token.clone());

        let client = Arc::clone(&self.client);
        let container_id = container.id.clone();
        commands.push(Command::new("open stats stream", async move {
            let channels = client.stream_stats(&container_id, token.clone());
            Some(Event::StatsStreamOpened(Subscription::open(id, channels, token)))
        }));
        commands
    }

    pub(crate) fn load_container_config(&self, container: &Container) -> Command<Event> {
        let client = Arc::clone(&self.client);
        let id = container.id.clone();
        Command::new("inspect container", async move {
            let result = client.inspect_container_spec(&id).await;
            Some(Event::ContainerConfigLoaded { id, result })
        })
    }

    /// Start or stop every member of a group concurrently
    pub(crate) fn group_batch(&self, group: &Group, start: bool) -> Command<Event> {
        let client = Arc::clone(&self.client);
        let ids = group.container_ids.clone();
        let name = group.name.clone();
        let budget = self.config.timeouts.batch();
        let grace = self.config.timeouts.stop_grace();
        let label = if start { "start group" } else { "stop group" };

        finish(label, vec![Refresh::Containers, Refresh::Groups], async move {
            let deadline = Instant::now() + budget;
            let report = run_batch(ids, deadline, |id| {
                let client = Arc::clone(&client);
                async move {
                    if start {
                        client.start_container(&id).await
                    } else {
                        client.stop_container(&id, grace).await
                    }
                }
            })
            .await;
            let verb = if start { "Started" } else { "Stopped" };
            report
                .into_result()
                .map(|report| {
                    format!(
                        "{} {} containers in group {}",
                        verb,
                        report.succeeded.len(),
                        name
                    )
                })
                .map_err(|e| e.to_string())
        })
        .to_completion()
    }

    /// Start (`s`), stop (`x`) or restart (`r`) a compose project. Start
    /// skips running containers and stop skips stopped ones.
    pub(crate) fn compose_batch(&self, project: &ComposeProject, action: char) -> Command<Event> {
        let client = Arc::clone(&self.client);
        let name = project.name.clone();
        let ids: Vec<String> = project
            .services
            .iter()
            .flat_map(|s| s.containers.iter())
            .filter(|c| match action {
                's' => !c.is_running(),
                'x' => c.is_running(),
                _ => true,
            })
            .map(|c| c.id.clone())
            .collect();
        let budget = self.config.timeouts.batch();
        let grace = self.config.timeouts.stop_grace();
        let verb = match action {
            's' => "started",
            'x' => "stopped",
            _ => "restarted",
        };

        finish(
            "compose batch",
            vec![Refresh::Compose, Refresh::Containers],
            async move {
                let deadline = Instant::now() + budget;
                let report = run_batch(ids, deadline, |id| {
                    let client = Arc::clone(&client);
                    async move {
                        match action {
                            's' => client.start_container(&id).await,
                            'x' => client.stop_container(&id, grace).await,
                            _ => client.restart_container(&id, grace).await,
                        }
                    }
                })
                .await;
                report
                    .into_result()
                    .map(|_| format!("Project {} {}", name, verb))
                    .map_err(|e| e.to_string())
            },
        )
        .to_completion()
    }

    pub(crate) fn add_to_group(&self, group: &Group, container: &Container) -> Command<Event> {
        let store = Arc::clone(&self.store);
        let group_id = group.id.clone();
        let group_name = group.name.clone();
        let container_id = container.id.clone();
        let container_name = container.name.clone();
        finish("add group member", vec![Refresh::Groups], async move {
            store
                .add_member(&group_id, &container_id)
                .map(|_| format!("Added {} to group {}", container_name, group_name))
                .map_err(|e| format!("Failed to add container to group: {}", e))
        })
    }

    pub(crate) fn connect_network(&self, network: &Network, container: &Container) -> Command<Event> {
        let client = Arc::clone(&self.client);
        let network_id = network.id.clone();
        let network_name = network.name.clone();
        let container_id = container.id.clone();
        let container_name = container.name.clone();
        finish(
            "connect network",
            vec![Refresh::Networks, Refresh::Containers],
            async move {
                client
                    .attach_network(&network_id, &container_id, &[])
                    .await
                    .map(|_| format!("Connected {} to network {}", container_name, network_name))
                    .map_err(|e| format!("Failed to connect container to network: {}", e))
            },
        )
    }

    /// Replace container `id` with one built from `spec`, then point every
    /// group at the new id
    pub(crate) fn recreate_container(&self, id: String, spec: ContainerSpec) -> Command<Event> {
        let client = Arc::clone(&self.client);
        let store = Arc::clone(&self.store);
        let budget = self.config.timeouts.recreate();
        let grace = self.config.timeouts.stop_grace();
        Command::new("recreate container", async move {
            let deadline = Instant::now() + budget;
            let outcome = recreate(client.as_ref(), &id, &spec, deadline, grace).await;
            if let Some(new_id) = &outcome.new_id {
                match store.replace_member(&id, new_id) {
                    Ok(groups) => tracing::debug!(groups, "group membership moved to new container"),
                    Err(e) => tracing::warn!("failed to update groups after recreate: {}", e),
                }
            }
            Some(Event::Recreated {
                old_id: id,
                name: spec.name,
                outcome,
            })
        })
        .to_completion()
    }

    /// Run the action of a confirmed modal
    pub(crate) fn run_pending(&mut self, modal: ModalState) -> Vec<Command<Event>> {
        let values = modal.values();
        let field = |index: usize| values.get(index).cloned().unwrap_or_default();
        let client: Arc<dyn ResourceClient> = Arc::clone(&self.client);
        let store = Arc::clone(&self.store);
        tracing::debug!(action = ?modal.action, "modal confirmed");

        let command = match modal.action {
            PendingAction::DeleteContainer { id, name } => finish(
                "remove container",
                vec![Refresh::Containers, Refresh::Groups],
                async move {
                    client
                        .remove_container(&id, true)
                        .await
                        .map_err(|e| format!("Failed to remove container: {}", e))?;
                    if let Err(e) = store.remove_member_everywhere(&id) {
                        tracing::warn!("failed to drop removed container from groups: {}", e);
                    }
                    Ok::<String, String>(format!("Container {} removed", name))
                },
            )
            .to_completion(),
            PendingAction::DeleteImage { id, tag } => {
                finish("remove image", vec![Refresh::Images], async move {
                    client
                        .remove_image(&id, false)
                        .await
                        .map(|_| format!("Image {} removed", tag))
                        .map_err(|e| format!("Failed to remove image: {}", e))
                })
            }
            PendingAction::DeleteGroup { id, name } => {
                finish("delete group", vec![Refresh::Groups], async move {
                    store
                        .delete(&id)
                        .map(|_| format!("Group {} deleted", name))
                        .map_err(|e| format!("Failed to delete group: {}", e))
                })
            }
            PendingAction::RemoveFromGroup {
                group_id,
                container_id,
            } => finish("remove group member", vec![Refresh::Groups], async move {
                store
                    .remove_member(&group_id, &container_id)
                    .map(|_| "Container removed from group".to_string())
                    .map_err(|e| format!("Failed to remove container from group: {}", e))
            }),
            PendingAction::CreateGroup => {
                let name = field(0);
                let description = field(1);
                finish("create group", vec![Refresh::Groups], async move {
                    store
                        .create(&name, &description, Vec::new())
                        .map(|group| format!("Group {} created", group.name))
                        .map_err(|e| format!("Failed to create group: {}", e))
                })
            }
            PendingAction::DeleteVolume { name } => {
                finish("remove volume", vec![Refresh::Volumes], async move {
                    client
                        .remove_volume(&name, false)
                        .await
                        .map(|_| format!("Volume {} removed", name))
                        .map_err(|e| format!("Failed to remove volume: {}", e))
                })
            }
            PendingAction::PruneVolumes => {
                finish("prune volumes", vec![Refresh::Volumes], async move {
                    client
                        .prune_volumes()
                        .await
                        .map(|reclaimed| {
                            format!(
                                "Pruned unused volumes ({:.1} MB reclaimed)",
                                megabytes(reclaimed)
                            )
                        })
                        .map_err(|e| format!("Failed to prune volumes: {}", e))
                })
            }
            PendingAction::PullImage => {
                let reference = field(0);
                let status = self.set_status(format!("Pulling {}...", reference), false);
                let pull = finish("pull image", vec![Refresh::Images], async move {
                    client
                        .pull_image(&reference)
                        .await
                        .map(|_| format!("Image {} pulled", reference))
                        .map_err(|e| format!("Failed to pull image: {}", e))
                });
                return vec![status, pull];
            }
            PendingAction::CreateNetwork => {
                let name = field(0);
                let driver = match field(1) {
                    driver if driver.is_empty() => DEFAULT_NETWORK_DRIVER.to_string(),
                    driver => driver,
                };
                finish("create network", vec![Refresh::Networks], async move {
                    client
                        .create_network(&name, &driver)
                        .await
                        .map(|_| format!("Network {} created", name))
                        .map_err(|e| format!("Failed to create network: {}", e))
                })
            }
            PendingAction::DeleteNetwork { id, name } => {
                finish("remove network", vec![Refresh::Networks], async move {
                    client
                        .remove_network(&id)
                        .await
                        .map(|_| format!("Network {} removed", name))
                        .map_err(|e| format!("Failed to remove network: {}", e))
                })
            }
            PendingAction::DisconnectFromNetwork {
                network_id,
                container_id,
            } => finish(
                "disconnect network",
                vec![Refresh::Networks, Refresh::Containers],
                async move {
                    client
                        .detach_network(&network_id, &container_id)
                        .await
                        .map(|_| "Container disconnected from network".to_string())
                        .map_err(|e| format!("Failed to disconnect container: {}", e))
                },
            ),
        };
        vec![command]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::docker::{ClientError, MockResourceClient};
    use crate::groups::GroupStore;
    use crate::models::ComposeService;
    use crate::tui::Theme;

    fn app_with(client: MockResourceClient, dir: &tempfile::TempDir) -> App {
        let store = GroupStore::open_in(dir.path()).unwrap();
        App::new(
            Arc::new(client),
            Arc::new(store),
            Config::default(),
            Theme::default(),
        )
    }

    fn container(id: &str, state: &str) -> Container {
        Container {
            id: id.to_string(),
            name: format!("svc-{}", id),
            state: state.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_compose_start_skips_running_containers() {
        let mut client = MockResourceClient::new();
        client
            .expect_start_container()
            .withf(|id| id == "b")
            .times(1)
            .returning(|_| Ok(()));
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(client, &dir);

        let project = ComposeProject {
            name: "shop".into(),
            working_dir: None,
            services: vec![ComposeService {
                name: "web".into(),
                containers: vec![container("a", "running"), container("b", "exited")],
            }],
        };
        match app.compose_batch(&project, 's').run().await {
            Some(Event::OperationFinished { result, .. }) => {
                assert_eq!(result, Ok("Project shop started".to_string()));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_group_batch_names_failures() {
        let mut client = MockResourceClient::new();
        client.expect_start_container().returning(|id| {
            if id == "bbb" {
                Err(ClientError::Stream("no such container".into()))
            } else {
                Ok(())
            }
        });
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(client, &dir);
        let group = app
            .store
            .create("web", "", vec!["aaa".into(), "bbb".into(), "ccc".into()])
            .unwrap();

        match app.group_batch(&group, true).run().await {
            Some(Event::OperationFinished { result, refresh }) => {
                insta::assert_snapshot!(result.unwrap_err(), @"group operation failed: [bbb: stream error: no such container]");
                assert!(refresh.contains(&Refresh::Containers));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_container_delete_drops_group_membership() {
        let mut client = MockResourceClient::new();
        client
            .expect_remove_container()
            .withf(|id, force| id == "aaa" && *force)
            .times(1)
            .returning(|_, _| Ok(()));
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(client, &dir);
        let group = app
            .store
            .create("web", "", vec!["aaa".into(), "bbb".into()])
            .unwrap();

        let modal = ModalState::confirm(
            "remove?",
            PendingAction::DeleteContainer {
                id: "aaa".into(),
                name: "api".into(),
            },
        );
        let mut commands = app.run_pending(modal);
        assert_eq!(commands.len(), 1);
        let event = commands.remove(0).run().await;
        assert!(matches!(
            event,
            Some(Event::OperationFinished { result: Ok(_), .. })
        ));
        assert_eq!(app.store.get(&group.id).unwrap().container_ids, vec!["bbb"]);
    }
}
