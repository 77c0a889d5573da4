//! Client library for the service registry.
//!
//! Services announce themselves to the registry at startup so other services
//! can discover live instances by application name. This module owns the
//! whole exchange: initial registration with exponential backoff, periodic
//! lease renewal, re-registration when the registry evicts an instance, and
//! deregistration at shutdown. A service only calls [`Registration::spawn`]
//! once and keeps serving regardless of registry health.

mod client;
mod instance;
mod lease;

pub use client::RegistryClient;
pub use instance::{InstanceStatus, ServiceInstance};
pub use lease::Registration;

use serde::Deserialize;
use thiserror::Error;

/// Connection settings for the registry, plus the identity this service
/// advertises.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrySettings {
    /// Base URL of the registry REST API, e.g. `http://localhost:8761/eureka`.
    pub base_url: String,
    /// Application name registered with the registry.
    pub app_name: String,
    /// Host name advertised to other services.
    pub host_name: String,
    /// Registration can be switched off for local runs and tests.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_heartbeat_interval_secs() -> u64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    5
}

/// Errors from registry calls.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The registry no longer knows this instance; the lease has to be
    /// re-established with a fresh registration.
    #[error("registry lease expired")]
    LeaseExpired,

    #[error("registry rejected {operation}: HTTP {status}")]
    Rejected {
        operation: &'static str,
        status: reqwest::StatusCode,
    },
}

impl RegistryError {
    /// Whether retrying the same call can succeed.
    ///
    /// Connection failures, timeouts and 5xx answers are transient. An
    /// expired lease needs a new registration, not a retry, and other
    /// rejections would only repeat.
    pub fn is_transient(&self) -> bool {
        match self {
            RegistryError::Transport(_) => true,
            RegistryError::LeaseExpired => false,
            RegistryError::Rejected { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
        }
    }
}
