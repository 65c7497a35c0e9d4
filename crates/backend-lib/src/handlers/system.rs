//! Service banner and health check.
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use postboard_common::{HealthReport, MessageResponse};
use std::sync::Arc;

use crate::storage::Storage;
use crate::AppState;

/// `GET /`
pub async fn index() -> Json<MessageResponse> {
    Json(MessageResponse::new("Postboard API"))
}

/// `GET /health`
pub async fn health<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> (StatusCode, Json<HealthReport>) {
    let (status, database) = match state.storage.health_check().await {
        Ok(()) => (StatusCode::OK, "connected"),
        Err(e) => {
            tracing::error!(error = %e, "storage health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "disconnected")
        },
    };

    let report = HealthReport {
        status: if status.is_success() { "ok" } else { "error" }.to_string(),
        timestamp: Utc::now(),
        environment: state.settings.environment.as_str().to_string(),
        database: database.to_string(),
    };
    (status, Json(report))
}
