//! Guest API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{Guest, GuestUpdate};
use crate::db::repository::{GuestRepository, RepoError};
use crate::utils::{AppError, AppResult};

/// Query params for listing guests
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    pub search: Option<String>,
}

fn default_limit() -> i64 {
    50
}

/// GET /api/guests - 获取客史列表（支持姓名/证件号搜索）
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Guest>>> {
    let repo = GuestRepository::new(state.db.clone());
    let guests = repo
        .find_all(query.search, query.limit, query.offset)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(guests))
}

/// GET /api/guests/:id - 获取单个客史
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Guest>> {
    let repo = GuestRepository::new(state.db.clone());
    let guest = repo
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Guest {} not found", id)))?;
    Ok(Json(guest))
}

/// PUT /api/guests/:id - 更新联系方式 / 追加备注
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<GuestUpdate>,
) -> AppResult<Json<Guest>> {
    let repo = GuestRepository::new(state.db.clone());
    let guest = repo.update(&id, payload).await.map_err(|e| match e {
        RepoError::NotFound(msg) => AppError::not_found(msg),
        other => AppError::database(other.to_string()),
    })?;
    Ok(Json(guest))
}
