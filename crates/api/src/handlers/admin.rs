//! Handlers for the `/admin` resource (metrics and dev reset).

use axum::extract::State;
use axum::Json;
use chirpy_core::error::CoreError;
use chirpy_db::repositories::UserRepo;
use serde::Serialize;

use crate::config::Platform;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Response body for `GET /admin/metrics`.
#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub file_server_hits: u64,
}

/// Response body for `POST /admin/reset`.
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub status: &'static str,
    pub users_deleted: u64,
}

/// GET /admin/metrics
pub async fn metrics(State(state): State<AppState>) -> Json<MetricsResponse> {
    Json(MetricsResponse {
        file_server_hits: state.metrics.hits(),
    })
}

/// POST /admin/reset
///
/// Delete every user (their chirps cascade) and zero the hit counter.
/// Only available when `PLATFORM=dev`; returns 403 otherwise.
pub async fn reset(State(state): State<AppState>) -> AppResult<Json<ResetResponse>> {
    if state.config.platform != Platform::Dev {
        return Err(AppError::Core(CoreError::Forbidden(
            "Reset is only allowed in dev".into(),
        )));
    }

    let users_deleted = UserRepo::delete_all(&state.pool).await?;
    state.metrics.reset();
    tracing::warn!(users_deleted, "Database reset");

    Ok(Json(ResetResponse {
        status: "All users deleted",
        users_deleted,
    }))
}
