//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use summitmate_common::HealthStatus;

use crate::AppState;

/// GET /api/v1/health — liveness probe.
///
/// Always answers `200` with the service status and version; the request
/// itself is never inspected.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is alive", body = HealthStatus)
    )
)]
pub async fn check(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    tracing::debug!("health check requested");
    Json(HealthStatus::ok(state.version.clone()))
}
