//! Health API Handlers

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /api/health - 存活检查 + 数据库探活
pub async fn health(State(state): State<ServerState>) -> AppResult<Json<HealthResponse>> {
    state
        .db
        .health()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}
