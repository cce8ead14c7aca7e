use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use spendwise_storage_sqlite::get_connection;

#[derive(Serialize, utoipa::ToSchema)]
pub(crate) struct HealthcheckResponse {
    pub status: String,
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/api/v1/health/status",
    responses((status = 200, description = "Service is running", body = HealthcheckResponse))
)]
pub(crate) async fn status() -> Json<HealthcheckResponse> {
    Json(HealthcheckResponse {
        status: "ok".to_string(),
    })
}

/// Readiness probe; checks out a database connection.
#[utoipa::path(
    get,
    path = "/api/v1/health/ready",
    responses(
        (status = 200, description = "Database is reachable", body = HealthcheckResponse),
        (status = 500, description = "Database connection failed")
    )
)]
pub(crate) async fn ready(State(state): State<Arc<AppState>>) -> ApiResult<Json<HealthcheckResponse>> {
    get_connection(&state.pool)?;
    Ok(Json(HealthcheckResponse {
        status: "ready".to_string(),
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health/status", get(status))
        .route("/health/ready", get(ready))
}
