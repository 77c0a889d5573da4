use serde::{Deserialize, Serialize};

/// Lifecycle states a registered instance can advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceStatus {
    Up,
    Down,
    Starting,
    OutOfService,
}

/// The document a service publishes about itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInstance {
    pub instance_id: String,
    pub app: String,
    pub host_name: String,
    pub port: u16,
    pub status: InstanceStatus,
    pub health_check_url: String,
}

impl ServiceInstance {
    /// Build the instance document for an app serving on `host_name:port`.
    ///
    /// The instance ID follows the `host:app:port` convention so a restarted
    /// service reclaims its previous registration instead of piling up
    /// duplicates.
    pub fn new(app: &str, host_name: &str, port: u16) -> Self {
        Self {
            instance_id: format!("{}:{}:{}", host_name, app, port),
            app: app.to_string(),
            host_name: host_name.to_string(),
            port,
            status: InstanceStatus::Up,
            health_check_url: format!("http://{}:{}/health", host_name, port),
        }
    }
}
