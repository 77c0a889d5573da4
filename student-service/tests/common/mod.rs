use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::Router;
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::routing::{post, put};
use serde_json::Value;
use student_service::config::StudentConfig;
use student_service::startup::Application;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    shutdown_token: CancellationToken,
    server: JoinHandle<()>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn the app on a random port, registration disabled unless the test
    /// switches it back on.
    pub async fn spawn_with(customize: impl FnOnce(&mut StudentConfig)) -> Self {
        let mut config = StudentConfig::load().expect("Failed to load configuration");
        config.common.port = 0; // Random port for testing
        config.registry.enabled = false;
        customize(&mut config);

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let shutdown_token = app.shutdown_token();
        let address = format!("http://127.0.0.1:{}", port);

        let server = tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            shutdown_token,
            server,
        }
    }

    /// Trigger graceful shutdown and wait for it to finish, deregistration
    /// included.
    pub async fn stop(self) {
        self.shutdown_token.cancel();
        let _ = self.server.await;
    }
}

/// A request recorded by the mock registry.
#[derive(Debug, Clone)]
pub struct RegistryCall {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Clone)]
struct MockRegistryState {
    calls: Arc<Mutex<Vec<RegistryCall>>>,
    expire_leases: Arc<AtomicBool>,
}

/// In-process stand-in for the service registry that records every call.
pub struct MockRegistry {
    pub url: String,
    state: MockRegistryState,
}

impl MockRegistry {
    pub async fn spawn() -> Self {
        let state = MockRegistryState {
            calls: Arc::new(Mutex::new(Vec::new())),
            expire_leases: Arc::new(AtomicBool::new(false)),
        };

        let router = Router::new()
            .route("/apps/:app", post(register))
            .route("/apps/:app/:instance", put(renew).delete(deregister))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock registry listener");
        let port = listener
            .local_addr()
            .expect("Failed to read mock registry addr")
            .port();

        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        MockRegistry {
            url: format!("http://127.0.0.1:{}", port),
            state,
        }
    }

    /// When set, renewals answer 404 until switched off again.
    pub fn expire_leases(&self, expire: bool) {
        self.state.expire_leases.store(expire, Ordering::SeqCst);
    }

    pub async fn calls(&self) -> Vec<RegistryCall> {
        self.state.calls.lock().await.clone()
    }

    /// Poll until `predicate` holds for the recorded calls or `timeout` runs
    /// out.
    pub async fn wait_for(
        &self,
        timeout: Duration,
        predicate: impl Fn(&[RegistryCall]) -> bool,
    ) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if predicate(&self.calls().await) {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
}

async fn register(
    State(state): State<MockRegistryState>,
    Path(app): Path<String>,
    Json(body): Json<Value>,
) -> StatusCode {
    state.calls.lock().await.push(RegistryCall {
        method: "POST".to_string(),
        path: format!("/apps/{}", app),
        body: Some(body),
    });
    StatusCode::NO_CONTENT
}

async fn renew(
    State(state): State<MockRegistryState>,
    Path((app, instance)): Path<(String, String)>,
) -> StatusCode {
    state.calls.lock().await.push(RegistryCall {
        method: "PUT".to_string(),
        path: format!("/apps/{}/{}", app, instance),
        body: None,
    });

    if state.expire_leases.load(Ordering::SeqCst) {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    }
}

async fn deregister(
    State(state): State<MockRegistryState>,
    Path((app, instance)): Path<(String, String)>,
) -> StatusCode {
    state.calls.lock().await.push(RegistryCall {
        method: "DELETE".to_string(),
        path: format!("/apps/{}/{}", app, instance),
        body: None,
    });
    StatusCode::OK
}
