//! Booking Repository
//!
//! 预订的存取与冲突扫描。预订永不物理删除，取消只是状态变更。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Booking, BookingStatus};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "booking";

/// Statuses that hold a room (block conflicting bookings)
pub const ACTIVE_STATUSES: [BookingStatus; 2] =
    [BookingStatus::Confirmed, BookingStatus::CheckedIn];

/// List query filter, assembled by the handler layer
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub room: Option<RecordId>,
    /// Window overlap filter, Unix millis
    pub from: Option<i64>,
    pub to: Option<i64>,
    /// Matches booking number, guest first/last name (case-insensitive)
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Clone)]
pub struct BookingRepository {
    base: BaseRepository,
}

impl BookingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find booking by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Booking>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let booking: Option<Booking> = self.base.db().select(thing).await?;
        Ok(booking)
    }

    /// List bookings with filters, newest first
    pub async fn find_all(&self, filter: BookingFilter) -> RepoResult<Vec<Booking>> {
        let mut clauses: Vec<&str> = Vec::new();
        if filter.status.is_some() {
            clauses.push("booking_status = $status");
        }
        if filter.room.is_some() {
            clauses.push("room = $room");
        }
        if filter.from.is_some() && filter.to.is_some() {
            clauses.push("check_in_date <= $to AND check_out_date >= $from");
        }
        if filter.search.is_some() {
            clauses.push(
                "(string::contains(string::lowercase(booking_number), $q) \
                 OR string::contains(string::lowercase(first_name), $q) \
                 OR string::contains(string::lowercase(last_name), $q))",
            );
        }

        let mut sql = String::from("SELECT * FROM booking");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC LIMIT $limit START $offset");

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("limit", filter.limit.max(1)))
            .bind(("offset", filter.offset.max(0)));
        if let Some(status) = filter.status {
            query = query.bind(("status", status));
        }
        if let Some(room) = filter.room {
            query = query.bind(("room", room));
        }
        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            query = query.bind(("from", from)).bind(("to", to));
        }
        if let Some(q) = filter.search {
            query = query.bind(("q", q.to_lowercase()));
        }

        let bookings: Vec<Booking> = query.await?.take(0)?;
        Ok(bookings)
    }

    /// Scan for bookings that hold the room over an overlapping window
    ///
    /// Inclusive-boundary overlap test: an existing booking conflicts when
    /// `existing.check_in_date <= new_check_out AND
    ///  existing.check_out_date >= new_check_in`. Back-to-back bookings
    /// sharing an exact boundary instant are conflicts.
    pub async fn find_conflicts(
        &self,
        room: &RecordId,
        new_check_in: i64,
        new_check_out: i64,
        exclude: Option<&RecordId>,
    ) -> RepoResult<Vec<Booking>> {
        let mut sql = String::from(
            "SELECT * FROM booking WHERE room = $room \
             AND booking_status IN $active \
             AND check_in_date <= $new_out AND check_out_date >= $new_in",
        );
        if exclude.is_some() {
            sql.push_str(" AND id != $exclude");
        }

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("room", room.clone()))
            .bind(("active", ACTIVE_STATUSES.to_vec()))
            .bind(("new_out", new_check_out))
            .bind(("new_in", new_check_in));
        if let Some(exclude) = exclude {
            query = query.bind(("exclude", exclude.clone()));
        }

        let conflicts: Vec<Booking> = query.await?.take(0)?;
        Ok(conflicts)
    }

    /// Insert a new booking
    pub async fn create(&self, booking: Booking) -> RepoResult<Booking> {
        let created: Option<Booking> = self.base.db().create(TABLE).content(booking).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create booking".to_string()))
    }

    /// Persist a mutated booking document
    pub async fn save(&self, booking: Booking) -> RepoResult<Booking> {
        let thing = booking
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Booking has no id".to_string()))?;

        // id stays out of the document body on update
        let mut doc = booking;
        doc.id = None;

        let saved: Option<Booking> = self.base.db().update(thing).content(doc).await?;
        saved.ok_or_else(|| RepoError::Database("Failed to save booking".to_string()))
    }
}
