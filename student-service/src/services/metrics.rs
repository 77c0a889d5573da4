//! Prometheus metrics recorder for the service.
//!
//! The request middleware records counters and latency histograms through the
//! `metrics` facade; this module owns the recorder they land in and renders
//! the scrape output.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

static RECORDER: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder.
///
/// Call once at startup before any metrics are recorded. Repeat calls are
/// no-ops so test binaries can share one recorder across spawned apps.
pub fn init_metrics() {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = RECORDER.set(handle);
        }
        Err(e) => tracing::debug!("Prometheus recorder already installed: {}", e),
    }
}

/// Render everything recorded so far in Prometheus text format.
pub fn render_metrics() -> String {
    match RECORDER.get() {
        Some(handle) => handle.render(),
        None => "# Metrics recorder not initialized".to_string(),
    }
}
