//! Network types

const SYSTEM_NETWORKS: [&str; 3] = ["bridge", "host", "none"];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Network {
    pub id: String,
    pub name: String,
    /// bridge, host, overlay, macvlan...
    pub driver: String,
    pub scope: String,
    pub internal: bool,
    pub attachable: bool,
    /// Ids of attached containers
    pub containers: Vec<String>,
    pub subnet: Option<String>,
    pub gateway: Option<String>,
}

impl Network {
    pub fn short_id(&self) -> &str {
        super::short_id(&self.id)
    }

    /// Default networks the daemon refuses to delete
    pub fn is_system(&self) -> bool {
        SYSTEM_NETWORKS.contains(&self.name.as_str())
    }

    pub fn has_container(&self, container_id: &str) -> bool {
        self.containers.iter().any(|id| id == container_id)
    }
}
