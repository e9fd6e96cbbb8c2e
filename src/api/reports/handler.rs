//! Report API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{DashboardReport, RevenueDay};
use crate::db::repository::ReportRepository;
use crate::utils::time::{day_end_millis, day_start_millis, parse_date};
use crate::utils::{AppError, AppResult};

/// GET /api/reports/dashboard - 前台仪表盘
pub async fn dashboard(State(state): State<ServerState>) -> AppResult<Json<DashboardReport>> {
    let today = Utc::now().date_naive();
    let repo = ReportRepository::new(state.db.clone());
    let report = repo
        .dashboard(day_start_millis(today), day_end_millis(today))
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(report))
}

/// Query params for the revenue report
#[derive(Debug, Deserialize)]
pub struct RevenueQuery {
    pub start_date: String,
    pub end_date: String,
}

/// GET /api/reports/revenue?start_date=&end_date= - 按日收款汇总
pub async fn revenue(
    State(state): State<ServerState>,
    Query(query): Query<RevenueQuery>,
) -> AppResult<Json<Vec<RevenueDay>>> {
    let start = parse_date(&query.start_date)?;
    let end = parse_date(&query.end_date)?;
    if end < start {
        return Err(AppError::validation("end_date must not precede start_date"));
    }

    let repo = ReportRepository::new(state.db.clone());
    let days = repo
        .revenue_by_day(day_start_millis(start), day_end_millis(end))
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(days))
}
