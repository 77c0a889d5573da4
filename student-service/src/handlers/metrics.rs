use axum::response::IntoResponse;

/// Prometheus scrape endpoint.
pub async fn metrics() -> impl IntoResponse {
    crate::services::metrics::render_metrics()
}
