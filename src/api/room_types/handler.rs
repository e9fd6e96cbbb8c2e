//! Room Type API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{RoomType, RoomTypeCreate, RoomTypeUpdate};
use crate::db::repository::{RepoError, RoomTypeRepository};
use crate::utils::{AppError, AppResult};

/// GET /api/room-types - 获取房型列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<RoomType>>> {
    let repo = RoomTypeRepository::new(state.db.clone());
    let types = repo
        .find_all()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(types))
}

/// GET /api/room-types/:id - 获取单个房型
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<RoomType>> {
    let repo = RoomTypeRepository::new(state.db.clone());
    let room_type = repo
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Room type {} not found", id)))?;
    Ok(Json(room_type))
}

/// POST /api/room-types - 创建房型
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RoomTypeCreate>,
) -> AppResult<Json<RoomType>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Room type name is required"));
    }
    let repo = RoomTypeRepository::new(state.db.clone());
    let room_type = repo.create(payload).await.map_err(|e| match e {
        RepoError::Duplicate(msg) => AppError::Conflict(msg),
        other => AppError::database(other.to_string()),
    })?;
    Ok(Json(room_type))
}

/// PUT /api/room-types/:id - 更新房型
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<RoomTypeUpdate>,
) -> AppResult<Json<RoomType>> {
    let repo = RoomTypeRepository::new(state.db.clone());
    let room_type = repo.update(&id, payload).await.map_err(|e| match e {
        RepoError::NotFound(msg) => AppError::not_found(msg),
        RepoError::Duplicate(msg) => AppError::Conflict(msg),
        other => AppError::database(other.to_string()),
    })?;
    Ok(Json(room_type))
}

/// DELETE /api/room-types/:id - 删除房型 (软删除)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = RoomTypeRepository::new(state.db.clone());
    let result = repo
        .delete(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(result))
}

/// Query params for the rate lookup
#[derive(Debug, Deserialize)]
pub struct RateQuery {
    pub duration: u8,
}

#[derive(Debug, Serialize)]
pub struct RateResponse {
    pub duration: u8,
    pub rate: f64,
}

/// GET /api/room-types/:id/rate?duration=3 - 按时长查价
///
/// 价格查表仅供客户端参考，预订金额仍由调用方提交。
pub async fn rate(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<RateQuery>,
) -> AppResult<Json<RateResponse>> {
    let repo = RoomTypeRepository::new(state.db.clone());
    let room_type = repo
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Room type {} not found", id)))?;

    let rate = room_type.pricing.rate_for(query.duration).ok_or_else(|| {
        AppError::validation("Invalid duration: stays are 3, 8, 12 or 24 hours")
    })?;

    Ok(Json(RateResponse {
        duration: query.duration,
        rate,
    }))
}
