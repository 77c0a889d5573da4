use backoff::ExponentialBackoff;
use backoff::future::retry;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{RegistryClient, RegistryError, ServiceInstance};

/// Handle to the background task that keeps a registration alive.
///
/// Dropping the handle leaves the task running; call [`Registration::shutdown`]
/// to stop renewing and deregister the instance.
pub struct Registration {
    shutdown_token: CancellationToken,
    task: JoinHandle<()>,
}

impl Registration {
    /// Register `instance` with the registry and renew its lease until
    /// shutdown.
    ///
    /// The task never fails the caller: a registry outage is logged and
    /// retried in the background while the service keeps serving traffic.
    pub fn spawn(client: RegistryClient, instance: ServiceInstance) -> Self {
        let shutdown_token = CancellationToken::new();
        let task = tokio::spawn(run_lease(client, instance, shutdown_token.clone()));

        Self {
            shutdown_token,
            task,
        }
    }

    /// Stop renewing and remove the instance from the registry.
    pub async fn shutdown(self) {
        self.shutdown_token.cancel();
        let _ = self.task.await;
    }
}

async fn run_lease(client: RegistryClient, instance: ServiceInstance, shutdown: CancellationToken) {
    let registered = tokio::select! {
        _ = shutdown.cancelled() => {
            tracing::info!(app = %instance.app, "Registration cancelled before completing");
            return;
        }
        registered = register_with_backoff(&client, &instance) => registered,
    };

    if !registered {
        return;
    }

    let mut interval =
        tokio::time::interval(Duration::from_secs(client.settings().heartbeat_interval_secs));
    // The first tick completes immediately and we just registered
    interval.tick().await;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = interval.tick() => renew_once(&client, &instance).await,
        }
    }

    match client.deregister(&instance).await {
        Ok(()) => {
            tracing::info!(instance_id = %instance.instance_id, "Deregistered from registry")
        }
        Err(e) => tracing::warn!(
            instance_id = %instance.instance_id,
            error = %e,
            "Failed to deregister from registry"
        ),
    }
}

async fn register_with_backoff(client: &RegistryClient, instance: &ServiceInstance) -> bool {
    let backoff = ExponentialBackoff {
        max_elapsed_time: Some(Duration::from_secs(300)),
        ..Default::default()
    };

    let result = retry(backoff, || async {
        client.register(instance).await.map_err(|e| {
            if e.is_transient() {
                tracing::warn!(app = %instance.app, error = %e, "Registration failed, will retry");
                backoff::Error::transient(e)
            } else {
                backoff::Error::permanent(e)
            }
        })
    })
    .await;

    match result {
        Ok(()) => {
            tracing::info!(
                app = %instance.app,
                instance_id = %instance.instance_id,
                "Registered with service registry"
            );
            metrics::counter!("registry_registrations_total").increment(1);
            true
        }
        Err(e) => {
            tracing::error!(app = %instance.app, error = %e, "Giving up on registration");
            false
        }
    }
}

async fn renew_once(client: &RegistryClient, instance: &ServiceInstance) {
    match client.renew(instance).await {
        Ok(()) => {
            metrics::counter!("registry_heartbeats_total", "status" => "ok").increment(1);
        }
        Err(RegistryError::LeaseExpired) => {
            tracing::warn!(
                instance_id = %instance.instance_id,
                "Registry lost our lease, re-registering"
            );
            metrics::counter!("registry_heartbeats_total", "status" => "expired").increment(1);

            if let Err(e) = client.register(instance).await {
                tracing::warn!(
                    instance_id = %instance.instance_id,
                    error = %e,
                    "Re-registration failed"
                );
            }
        }
        Err(e) => {
            tracing::warn!(
                instance_id = %instance.instance_id,
                error = %e,
                "Registry heartbeat failed"
            );
            metrics::counter!("registry_heartbeats_total", "status" => "error").increment(1);
        }
    }
}
