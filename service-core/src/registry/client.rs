use reqwest::{Client, StatusCode};
use std::time::Duration;

use super::{RegistryError, RegistrySettings, ServiceInstance};
use crate::observability::propagate_trace;

/// HTTP client for the registry's REST API.
///
/// Paths follow the Eureka layout: an app owns a collection of instances,
/// `POST /apps/{app}` adds one, `PUT` and `DELETE /apps/{app}/{instance_id}`
/// renew and cancel its lease.
#[derive(Clone)]
pub struct RegistryClient {
    http: Client,
    settings: RegistrySettings,
}

impl RegistryClient {
    pub fn new(settings: RegistrySettings) -> Self {
        Self {
            http: Client::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &RegistrySettings {
        &self.settings
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.request_timeout_secs)
    }

    fn app_url(&self, instance: &ServiceInstance) -> String {
        format!(
            "{}/apps/{}",
            self.settings.base_url.trim_end_matches('/'),
            instance.app
        )
    }

    fn instance_url(&self, instance: &ServiceInstance) -> String {
        format!("{}/{}", self.app_url(instance), instance.instance_id)
    }

    /// Announce the instance to the registry.
    pub async fn register(&self, instance: &ServiceInstance) -> Result<(), RegistryError> {
        let request = self
            .http
            .post(self.app_url(instance))
            .json(instance)
            .timeout(self.request_timeout());

        let response = propagate_trace(request).send().await?;
        Self::expect_success("register", response.status())
    }

    /// Renew the instance lease.
    ///
    /// A 404 means the registry evicted the instance; the caller must
    /// register again.
    pub async fn renew(&self, instance: &ServiceInstance) -> Result<(), RegistryError> {
        let request = self
            .http
            .put(self.instance_url(instance))
            .timeout(self.request_timeout());

        let response = propagate_trace(request).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(RegistryError::LeaseExpired);
        }

        Self::expect_success("renew", response.status())
    }

    /// Remove the instance from the registry.
    pub async fn deregister(&self, instance: &ServiceInstance) -> Result<(), RegistryError> {
        let request = self
            .http
            .delete(self.instance_url(instance))
            .timeout(self.request_timeout());

        let response = propagate_trace(request).send().await?;
        Self::expect_success("deregister", response.status())
    }

    fn expect_success(operation: &'static str, status: StatusCode) -> Result<(), RegistryError> {
        if status.is_success() {
            Ok(())
        } else {
            Err(RegistryError::Rejected { operation, status })
        }
    }
}
