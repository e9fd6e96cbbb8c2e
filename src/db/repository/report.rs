//! Report Repository
//!
//! Read-only aggregations for dashboards. No invariants of its own.

use super::{BaseRepository, RepoResult};
use crate::db::models::{BookingStatus, DashboardReport, RevenueDay, RoomStatusCount};
use crate::utils::time::millis_to_date_string;
use serde::Deserialize;
use std::collections::BTreeMap;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Debug, Deserialize)]
struct CountRow {
    total: i64,
}

#[derive(Debug, Deserialize)]
struct SumRow {
    revenue: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PaidRow {
    created_at: i64,
    paid_amount: f64,
}

#[derive(Clone)]
pub struct ReportRepository {
    base: BaseRepository,
}

impl ReportRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Front-desk dashboard: room状态分布 + 当日到离店 + 在住数 + 当日收款
    ///
    /// `day_start`/`day_end` bound "today" in Unix millis (half-open).
    pub async fn dashboard(&self, day_start: i64, day_end: i64) -> RepoResult<DashboardReport> {
        let rooms_by_status: Vec<RoomStatusCount> = self
            .base
            .db()
            .query("SELECT status, count() AS total FROM room WHERE is_active = true GROUP BY status")
            .await?
            .take(0)?;

        let arrivals_today = self
            .count_bookings(
                "booking_status = $status AND check_in_date >= $start AND check_in_date < $end",
                BookingStatus::Confirmed,
                day_start,
                day_end,
            )
            .await?;

        let departures_today = self
            .count_bookings(
                "booking_status = $status AND check_out_date >= $start AND check_out_date < $end",
                BookingStatus::CheckedIn,
                day_start,
                day_end,
            )
            .await?;

        let in_house: Vec<CountRow> = self
            .base
            .db()
            .query("SELECT count() AS total FROM booking WHERE booking_status = $status GROUP ALL")
            .bind(("status", BookingStatus::CheckedIn))
            .await?
            .take(0)?;

        let revenue: Vec<SumRow> = self
            .base
            .db()
            .query(
                "SELECT math::sum(paid_amount) AS revenue FROM booking \
                 WHERE created_at >= $start AND created_at < $end GROUP ALL",
            )
            .bind(("start", day_start))
            .bind(("end", day_end))
            .await?
            .take(0)?;

        Ok(DashboardReport {
            rooms_by_status,
            arrivals_today,
            departures_today,
            in_house: in_house.first().map(|r| r.total).unwrap_or(0),
            revenue_today: revenue.first().and_then(|r| r.revenue).unwrap_or(0.0),
        })
    }

    async fn count_bookings(
        &self,
        condition: &str,
        status: BookingStatus,
        start: i64,
        end: i64,
    ) -> RepoResult<i64> {
        let sql = format!("SELECT count() AS total FROM booking WHERE {condition} GROUP ALL");
        let rows: Vec<CountRow> = self
            .base
            .db()
            .query(sql)
            .bind(("status", status))
            .bind(("start", start))
            .bind(("end", end))
            .await?
            .take(0)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    /// Paid totals per calendar day over [start, end)
    ///
    /// Day bucketing happens here rather than in SurrealQL; report volumes
    /// are small enough that fetching the rows is fine.
    pub async fn revenue_by_day(&self, start: i64, end: i64) -> RepoResult<Vec<RevenueDay>> {
        let rows: Vec<PaidRow> = self
            .base
            .db()
            .query(
                "SELECT created_at, paid_amount FROM booking \
                 WHERE created_at >= $start AND created_at < $end",
            )
            .bind(("start", start))
            .bind(("end", end))
            .await?
            .take(0)?;

        let mut days: BTreeMap<String, (f64, i64)> = BTreeMap::new();
        for row in rows {
            let date = millis_to_date_string(row.created_at);
            let entry = days.entry(date).or_insert((0.0, 0));
            entry.0 += row.paid_amount;
            entry.1 += 1;
        }

        Ok(days
            .into_iter()
            .map(|(date, (revenue, bookings))| RevenueDay {
                date,
                revenue,
                bookings,
            })
            .collect())
    }
}
