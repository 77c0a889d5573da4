use service_core::observability::init_tracing;
use student_service::config::StudentConfig;
use student_service::services::metrics::init_metrics;
use student_service::startup::Application;
use tokio::signal;

/// Resolves once the process receives Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler");

        tokio::select! {
            result = signal::ctrl_c() => result.expect("Failed to listen for Ctrl+C"),
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    signal::ctrl_c()
        .await
        .expect("Failed to listen for Ctrl+C");

    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing; span export only happens when a collector is set
    let otlp_endpoint = std::env::var("OTLP_ENDPOINT").ok();
    init_tracing("student-service", "info", otlp_endpoint.as_deref());

    // Initialize metrics
    init_metrics();

    let config = StudentConfig::load().map_err(|e| {
        tracing::error!("Configuration is invalid: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    let shutdown_token = app.shutdown_token();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown_token.cancel();
    });

    app.run_until_stopped().await
}
