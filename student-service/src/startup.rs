use crate::config::StudentConfig;
use crate::handlers;
use axum::middleware::from_fn;
use axum::{Router, routing::get};
use service_core::error::AppError;
use service_core::middleware::metrics::metrics_middleware;
use service_core::middleware::tracing::request_id_middleware;
use service_core::observability::REQUEST_ID_HEADER;
use service_core::registry::{Registration, RegistryClient, ServiceInstance};
use std::future::IntoFuture;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    registration: Option<Registration>,
    shutdown_token: CancellationToken,
}

impl Application {
    /// Bind the listener, assemble the router and announce the instance to
    /// the registry.
    pub async fn build(config: StudentConfig) -> Result<Self, AppError> {
        let app = build_router();

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        // Advertise the bound port, not the configured one, so port 0 ends
        // up registering the real endpoint.
        let registration = if config.registry.enabled {
            let instance =
                ServiceInstance::new(&config.registry.app_name, &config.registry.host_name, port);
            let client = RegistryClient::new(config.registry.clone());
            Some(Registration::spawn(client, instance))
        } else {
            tracing::info!("Service registry disabled, not registering");
            None
        };

        let shutdown_token = CancellationToken::new();
        let server = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_token.clone().cancelled_owned());

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            registration,
            shutdown_token,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Token that stops the server when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Serve until the shutdown token fires, then drop the registry lease.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let result = self.server.await;

        if let Some(registration) = self.registration {
            registration.shutdown().await;
        }

        result
    }
}

fn build_router() -> Router {
    Router::new()
        .route("/student/studentName/:name", get(handlers::echo_student_name))
        .route(
            "/student/getStudentDetails/:name",
            get(handlers::get_student_details),
        )
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Outermost so the span and metrics below see the stamped header
        .layer(from_fn(request_id_middleware))
}
