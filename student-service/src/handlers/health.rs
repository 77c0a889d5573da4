use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "student-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness gate. The registry is advisory and must never block traffic, so
/// a bound listener is all readiness means here.
pub async fn readiness_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ready" })))
}
