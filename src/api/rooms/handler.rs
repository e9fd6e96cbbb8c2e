//! Room API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{Room, RoomCreate, RoomStatus, RoomStatusUpdate, RoomUpdate};
use crate::db::repository::{RepoError, RoomRepository};
use crate::utils::{AppError, AppResult};

/// Query params for listing rooms
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<RoomStatus>,
    pub floor: Option<i32>,
}

/// GET /api/rooms - 获取客房列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Room>>> {
    let repo = RoomRepository::new(state.db.clone());
    let rooms = repo
        .find_all(query.status, query.floor)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(rooms))
}

/// GET /api/rooms/:id - 获取单个客房
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Room>> {
    let repo = RoomRepository::new(state.db.clone());
    let room = repo
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Room {} not found", id)))?;
    Ok(Json(room))
}

/// POST /api/rooms - 创建客房
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RoomCreate>,
) -> AppResult<Json<Room>> {
    if payload.room_number.trim().is_empty() {
        return Err(AppError::validation("Room number is required"));
    }
    let repo = RoomRepository::new(state.db.clone());
    let room = repo.create(payload).await.map_err(|e| match e {
        RepoError::Duplicate(msg) => AppError::Conflict(msg),
        other => AppError::database(other.to_string()),
    })?;
    Ok(Json(room))
}

/// PUT /api/rooms/:id - 更新客房
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<RoomUpdate>,
) -> AppResult<Json<Room>> {
    let repo = RoomRepository::new(state.db.clone());
    let room = repo.update(&id, payload).await.map_err(|e| match e {
        RepoError::NotFound(msg) => AppError::not_found(msg),
        RepoError::Duplicate(msg) => AppError::Conflict(msg),
        other => AppError::database(other.to_string()),
    })?;
    Ok(Json(room))
}

/// PUT /api/rooms/:id/status - 房态变更 (前台：仅限保洁完成 Maintenance → Available)
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<RoomStatusUpdate>,
) -> AppResult<Json<Room>> {
    let room = state
        .engine
        .set_room_status(&id, payload.status, false)
        .await?;
    Ok(Json(room))
}

/// PUT /api/rooms/:id/status/override - 房态变更 (管理员，不受限制)
pub async fn override_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<RoomStatusUpdate>,
) -> AppResult<Json<Room>> {
    let room = state
        .engine
        .set_room_status(&id, payload.status, true)
        .await?;
    Ok(Json(room))
}

/// DELETE /api/rooms/:id - 删除客房 (软删除)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = RoomRepository::new(state.db.clone());
    let result = repo
        .delete(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(result))
}
