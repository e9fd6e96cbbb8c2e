//! Booking API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use surrealdb::RecordId;

use crate::bookings::BookingCommand;
use crate::core::ServerState;
use crate::db::models::{
    Booking, BookingCreate, BookingStatus, BookingUpdate, CancelRequest, NoShowRequest,
};
use crate::db::repository::{BookingFilter, BookingRepository};
use crate::utils::time::{day_end_millis, day_start_millis, parse_date};
use crate::utils::{AppError, AppResult};

/// Query params for listing bookings
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    pub status: Option<BookingStatus>,
    pub room: Option<String>,
    /// YYYY-MM-DD window bounds; both required for the overlap filter
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Matches booking number or guest name
    pub search: Option<String>,
}

fn default_limit() -> i64 {
    50
}

/// GET /api/bookings - 获取预订列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Booking>>> {
    let room = match &query.room {
        Some(raw) => Some(
            raw.parse::<RecordId>()
                .map_err(|_| AppError::validation(format!("Invalid room ID: {}", raw)))?,
        ),
        None => None,
    };
    let (from, to) = match (&query.start_date, &query.end_date) {
        (Some(start), Some(end)) => {
            let start = parse_date(start)?;
            let end = parse_date(end)?;
            (Some(day_start_millis(start)), Some(day_end_millis(end)))
        }
        _ => (None, None),
    };

    let repo = BookingRepository::new(state.db.clone());
    let bookings = repo
        .find_all(BookingFilter {
            status: query.status,
            room,
            from,
            to,
            search: query.search,
            limit: query.limit,
            offset: query.offset,
        })
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(bookings))
}

/// GET /api/bookings/:id - 获取单个预订
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    let repo = BookingRepository::new(state.db.clone());
    let booking = repo
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Booking {} not found", id)))?;
    Ok(Json(booking))
}

/// POST /api/bookings - 创建预订
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<BookingCreate>,
) -> AppResult<Json<Booking>> {
    let booking = state
        .engine
        .execute(BookingCommand::Create(Box::new(payload)))
        .await?;
    Ok(Json(booking))
}

/// PUT /api/bookings/:id - 字段更新（不触发状态机）
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<BookingUpdate>,
) -> AppResult<Json<Booking>> {
    let booking = state
        .engine
        .execute(BookingCommand::PatchFields {
            id,
            patch: Box::new(payload),
        })
        .await?;
    Ok(Json(booking))
}

/// POST /api/bookings/:id/check-in - 入住
pub async fn check_in(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    let booking = state.engine.execute(BookingCommand::CheckIn { id }).await?;
    Ok(Json(booking))
}

/// POST /api/bookings/:id/check-out - 退房
pub async fn check_out(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    let booking = state
        .engine
        .execute(BookingCommand::CheckOut { id })
        .await?;
    Ok(Json(booking))
}

/// POST /api/bookings/:id/cancel - 取消预订
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Option<Json<CancelRequest>>,
) -> AppResult<Json<Booking>> {
    let reason = payload.and_then(|Json(p)| p.reason);
    let booking = state
        .engine
        .execute(BookingCommand::Cancel { id, reason })
        .await?;
    Ok(Json(booking))
}

/// POST /api/bookings/:id/no-show - 标记未到店
pub async fn no_show(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Option<Json<NoShowRequest>>,
) -> AppResult<Json<Booking>> {
    let notes = payload.and_then(|Json(p)| p.notes);
    let booking = state
        .engine
        .execute(BookingCommand::MarkNoShow { id, notes })
        .await?;
    Ok(Json(booking))
}

/// DELETE /api/bookings/:id - 软删除（等同取消）
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    let booking = state
        .engine
        .execute(BookingCommand::Cancel {
            id,
            reason: Some("Deleted by staff".to_string()),
        })
        .await?;
    Ok(Json(booking))
}
