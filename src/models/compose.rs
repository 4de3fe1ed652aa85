//! Compose projects, derived from container labels

use super::container::{COMPOSE_WORKING_DIR_LABEL, Container};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComposeProject {
    pub name: String,
    pub working_dir: Option<String>,
    pub services: Vec<ComposeService>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComposeService {
    pub name: String,
    /// More than one when the service is scaled
    pub containers: Vec<Container>,
}

impl ComposeProject {
    pub fn container_ids(&self) -> Vec<String> {
        self.services
            .iter()
            .flat_map(|s| s.containers.iter().map(|c| c.id.clone()))
            .collect()
    }

    pub fn container_count(&self) -> usize {
        self.services.iter().map(|s| s.containers.len()).sum()
    }

    pub fn running_count(&self) -> usize {
        self.services.iter().map(ComposeService::running_count).sum()
    }

    pub fn all_running(&self) -> bool {
        let total = self.container_count();
        total > 0 && self.running_count() == total
    }

    pub fn service(&self, name: &str) -> Option<&ComposeService> {
        self.services.iter().find(|s| s.name == name)
    }
}

impl ComposeService {
    pub fn running_count(&self) -> usize {
        self.containers.iter().filter(|c| c.is_running()).count()
    }

    pub fn is_scaled(&self) -> bool {
        self.containers.len() > 1
    }
}

/// Group labelled containers into projects sorted by name.
/// Services keep the order in which they were first seen.
pub fn group_compose_projects(containers: Vec<Container>) -> Vec<ComposeProject> {
    let mut projects: BTreeMap<String, ComposeProject> = BTreeMap::new();

    for container in containers {
        let Some(project_name) = container.compose_project().map(str::to_string) else {
            continue;
        };
        let service_name = container.compose_service().unwrap_or_default().to_string();

        let project = projects
            .entry(project_name.clone())
            .or_insert_with(|| ComposeProject {
                name: project_name,
                working_dir: container.labels.get(COMPOSE_WORKING_DIR_LABEL).cloned(),
                services: Vec::new(),
            });

        match project.services.iter_mut().find(|s| s.name == service_name) {
            Some(service) => service.containers.push(container),
            None => project.services.push(ComposeService {
                name: service_name,
                containers: vec![container],
            }),
        }
    }

    projects.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::container::{COMPOSE_PROJECT_LABEL, COMPOSE_SERVICE_LABEL};

    fn labelled(id: &str, project: &str, service: &str, state: &str) -> Container {
        let mut container = Container {
            id: id.to_string(),
            state: state.to_string(),
            ..Default::default()
        };
        container
            .labels
            .insert(COMPOSE_PROJECT_LABEL.to_string(), project.to_string());
        container
            .labels
            .insert(COMPOSE_SERVICE_LABEL.to_string(), service.to_string());
        container
    }

    #[test]
    fn test_groups_by_project_and_service() {
        let containers = vec![
            labelled("1", "web", "app", "running"),
            labelled("2", "api", "db", "exited"),
            labelled("3", "web", "app", "running"),
            labelled("4", "web", "cache", "exited"),
            Container {
                id: "5".into(),
                ..Default::default()
            },
        ];

        let projects = group_compose_projects(containers);
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].name, "api");
        let web = &projects[1];
        assert_eq!(web.services.len(), 2);
        assert!(web.service("app").is_some_and(ComposeService::is_scaled));
        assert_eq!(web.running_count(), 2);
        assert!(!web.all_running());
        assert_eq!(web.container_ids(), vec!["1", "3", "4"]);
    }
}
