//! Booking Engine
//!
//! Single command-processing authority for the booking lifecycle. Owns the
//! injected repositories (resolved once at startup, no runtime
//! re-resolution) and a per-room lock registry.
//!
//! # Locking
//!
//! Every status-affecting operation takes the room's async lock before
//! reading and releases it after the write lands. The conflict scan and the
//! booking insert therefore run as one serialized unit per room — two
//! concurrent creations cannot both pass the availability check. Transition
//! targets are re-read under the lock before the guard runs.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use tokio::sync::Mutex;
use tracing::{info, warn};
use validator::Validate;

use super::command::BookingCommand;
use super::conflict;
use super::derive;
use super::error::BookingError;
use super::transitions;
use crate::db::models::{
    ALLOWED_DURATIONS, Booking, BookingCreate, BookingStatus, BookingUpdate, Guest, PaymentStatus,
    Room, RoomStatus,
};
use crate::db::repository::{BookingRepository, GuestRepository, RoomRepository};
use crate::utils::time::{millis_to_date_string, now_millis};
use crate::utils::validation::{is_non_negative_amount, is_positive_amount, validation_message};

pub struct BookingEngine {
    bookings: BookingRepository,
    rooms: RoomRepository,
    guests: GuestRepository,
    /// Per-room serialization of conflict-check + write
    room_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl BookingEngine {
    pub fn new(
        bookings: BookingRepository,
        rooms: RoomRepository,
        guests: GuestRepository,
    ) -> Self {
        Self {
            bookings,
            rooms,
            guests,
            room_locks: DashMap::new(),
        }
    }

    /// Build the engine with all repositories over one database handle
    pub fn with_db(db: Surreal<Db>) -> Self {
        Self::new(
            BookingRepository::new(db.clone()),
            RoomRepository::new(db.clone()),
            GuestRepository::new(db),
        )
    }

    /// Process one command
    pub async fn execute(&self, cmd: BookingCommand) -> Result<Booking, BookingError> {
        match cmd {
            BookingCommand::Create(data) => self.create(*data).await,
            BookingCommand::CheckIn { id } => self.check_in(&id).await,
            BookingCommand::CheckOut { id } => self.check_out(&id).await,
            BookingCommand::Cancel { id, reason } => self.cancel(&id, reason).await,
            BookingCommand::MarkNoShow { id, notes } => self.mark_no_show(&id, notes).await,
            BookingCommand::PatchFields { id, patch } => self.patch(&id, *patch).await,
        }
    }

    // ========== Create ==========

    async fn create(&self, data: BookingCreate) -> Result<Booking, BookingError> {
        data.validate()
            .map_err(|e| BookingError::Validation(validation_message(&e)))?;
        if !ALLOWED_DURATIONS.contains(&data.duration) {
            return Err(BookingError::Validation(
                "Invalid duration: stays are 3, 8, 12 or 24 hours".to_string(),
            ));
        }
        if !is_positive_amount(data.total_amount) {
            return Err(BookingError::Validation("Invalid total amount".to_string()));
        }
        if !is_non_negative_amount(data.paid_amount) {
            return Err(BookingError::Validation("Invalid paid amount".to_string()));
        }

        let initial = data.booking_status.unwrap_or(BookingStatus::Confirmed);
        if !matches!(
            initial,
            BookingStatus::Confirmed | BookingStatus::CheckedIn
        ) {
            return Err(BookingError::Validation(
                "New bookings must start as confirmed or checked in".to_string(),
            ));
        }

        let room_id = data.room.clone();
        let check_out = derive::check_out_for(data.check_in_date, data.duration);

        // Conflict scan and insert are one serialized unit per room
        let lock = self.lock_for(&room_id);
        let _guard = lock.lock().await;

        conflict::assert_room_bookable(
            &self.rooms,
            &self.bookings,
            &room_id,
            data.check_in_date,
            check_out,
            None,
        )
        .await?;

        let now = now_millis();
        let mut booking = Booking {
            id: None,
            booking_number: derive::generate_booking_number(Utc::now()),
            first_name: data.first_name,
            last_name: data.last_name,
            phone: data.phone,
            id_type: data.id_type,
            id_number: data.id_number,
            room: data.room,
            check_in_date: data.check_in_date,
            check_out_date: check_out,
            actual_check_in: (initial == BookingStatus::CheckedIn).then_some(now),
            actual_check_out: None,
            duration: data.duration,
            total_amount: data.total_amount,
            paid_amount: data.paid_amount,
            balance: 0.0,
            payment_status: PaymentStatus::Pending,
            booking_status: initial,
            cancellation_reason: None,
            cancellation_date: None,
            created_by: data.created_by,
            created_at: now,
            updated_at: now,
        };
        derive::apply_financials(&mut booking);

        let created = self.bookings.create(booking).await?;

        // A confirmed booking holds the room from creation, not from check-in
        self.rooms
            .set_status(&room_id, transitions::room_status_for(initial))
            .await?;

        info!(
            booking_number = %created.booking_number,
            room = %room_id,
            status = ?created.booking_status,
            "Booking created"
        );

        // Best-effort: a failed directory upsert never rolls the booking back
        if let Err(e) = self.register_guest(&created).await {
            warn!(error = %e, booking_number = %created.booking_number,
                "Guest directory upsert failed; booking stands");
        }

        Ok(created)
    }

    // ========== Transitions ==========

    async fn check_in(&self, id: &str) -> Result<Booking, BookingError> {
        let probe = self.load(id).await?;
        let lock = self.lock_for(&probe.room);
        let _guard = lock.lock().await;

        let mut booking = self.load(id).await?;
        transitions::guard_check_in(booking.booking_status)?;

        booking.booking_status = BookingStatus::CheckedIn;
        if booking.actual_check_in.is_none() {
            booking.actual_check_in = Some(now_millis());
        }
        booking.updated_at = now_millis();

        let room = booking.room.clone();
        let saved = self.bookings.save(booking).await?;
        self.rooms
            .set_status(&room, transitions::room_status_for(BookingStatus::CheckedIn))
            .await?;

        info!(booking_number = %saved.booking_number, "Guest checked in");
        Ok(saved)
    }

    async fn check_out(&self, id: &str) -> Result<Booking, BookingError> {
        let probe = self.load(id).await?;
        let lock = self.lock_for(&probe.room);
        let _guard = lock.lock().await;

        let mut booking = self.load(id).await?;
        transitions::guard_check_out(booking.booking_status)?;

        booking.booking_status = BookingStatus::CheckedOut;
        if booking.actual_check_out.is_none() {
            booking.actual_check_out = Some(now_millis());
        }
        booking.updated_at = now_millis();

        let room = booking.room.clone();
        let saved = self.bookings.save(booking).await?;
        // Turnover: the room needs cleaning before it can be sold again
        self.rooms
            .set_status(&room, transitions::room_status_for(BookingStatus::CheckedOut))
            .await?;

        info!(booking_number = %saved.booking_number, "Guest checked out");
        Ok(saved)
    }

    async fn cancel(&self, id: &str, reason: Option<String>) -> Result<Booking, BookingError> {
        let probe = self.load(id).await?;
        let lock = self.lock_for(&probe.room);
        let _guard = lock.lock().await;

        let mut booking = self.load(id).await?;
        transitions::guard_cancel(booking.booking_status)?;

        booking.booking_status = BookingStatus::Cancelled;
        booking.cancellation_date = Some(now_millis());
        booking.cancellation_reason = reason;
        booking.updated_at = now_millis();

        let room = booking.room.clone();
        let saved = self.bookings.save(booking).await?;
        self.rooms
            .set_status(&room, transitions::room_status_for(BookingStatus::Cancelled))
            .await?;

        info!(booking_number = %saved.booking_number, "Booking cancelled");
        Ok(saved)
    }

    async fn mark_no_show(
        &self,
        id: &str,
        notes: Option<String>,
    ) -> Result<Booking, BookingError> {
        let probe = self.load(id).await?;
        let lock = self.lock_for(&probe.room);
        let _guard = lock.lock().await;

        let mut booking = self.load(id).await?;
        transitions::guard_no_show(booking.booking_status)?;

        booking.booking_status = BookingStatus::NoShow;
        booking.cancellation_date = Some(now_millis());
        booking.cancellation_reason = Some("No show".to_string());
        booking.updated_at = now_millis();

        let room = booking.room.clone();
        let saved = self.bookings.save(booking).await?;
        self.rooms
            .set_status(&room, transitions::room_status_for(BookingStatus::NoShow))
            .await?;

        info!(booking_number = %saved.booking_number, "Booking marked as no-show");

        if let Err(e) = self.annotate_guest_no_show(&saved, notes.as_deref()).await {
            warn!(error = %e, booking_number = %saved.booking_number,
                "Guest no-show annotation failed; booking stands");
        }

        Ok(saved)
    }

    // ========== Generic field patch ==========

    async fn patch(&self, id: &str, patch: BookingUpdate) -> Result<Booking, BookingError> {
        if patch.booking_status.is_some() {
            return Err(BookingError::Validation(
                "Booking status cannot be changed through a field update; \
                 use the check-in, check-out, cancel or no-show operations"
                    .to_string(),
            ));
        }
        if patch.room.is_some() {
            return Err(BookingError::Validation(
                "Bookings cannot be moved to another room; cancel and rebook".to_string(),
            ));
        }

        let probe = self.load(id).await?;
        let lock = self.lock_for(&probe.room);
        let _guard = lock.lock().await;

        let mut booking = self.load(id).await?;

        if patch.check_in_date.is_some() || patch.duration.is_some() {
            if booking.booking_status != BookingStatus::Confirmed {
                return Err(BookingError::Validation(
                    "Dates can only be changed while the booking is confirmed".to_string(),
                ));
            }
            let duration = patch.duration.unwrap_or(booking.duration);
            if !ALLOWED_DURATIONS.contains(&duration) {
                return Err(BookingError::Validation(
                    "Invalid duration: stays are 3, 8, 12 or 24 hours".to_string(),
                ));
            }
            let check_in = patch.check_in_date.unwrap_or(booking.check_in_date);
            let check_out = derive::check_out_for(check_in, duration);
            let own_id = booking
                .id
                .clone()
                .ok_or_else(|| BookingError::Database("Booking record missing id".to_string()))?;
            conflict::assert_window_free(&self.bookings, &booking.room, check_in, check_out, &own_id)
                .await?;
            booking.check_in_date = check_in;
            booking.check_out_date = check_out;
            booking.duration = duration;
        }

        if let Some(v) = patch.first_name {
            booking.first_name = v;
        }
        if let Some(v) = patch.last_name {
            booking.last_name = v;
        }
        if let Some(v) = patch.phone {
            booking.phone = v;
        }
        if let Some(v) = patch.id_type {
            booking.id_type = v;
        }
        if let Some(v) = patch.id_number {
            booking.id_number = v;
        }
        if let Some(total) = patch.total_amount {
            if !is_positive_amount(total) {
                return Err(BookingError::Validation("Invalid total amount".to_string()));
            }
            booking.total_amount = total;
        }
        if let Some(paid) = patch.paid_amount {
            if !is_non_negative_amount(paid) {
                return Err(BookingError::Validation("Invalid paid amount".to_string()));
            }
            booking.paid_amount = paid;
        }

        derive::apply_financials(&mut booking);
        booking.updated_at = now_millis();

        Ok(self.bookings.save(booking).await?)
    }

    // ========== Room status (operator actions) ==========

    /// Direct room-status change
    ///
    /// The staff route only completes turnover (Maintenance → Available);
    /// the admin override sets any status. Both serialize on the room lock
    /// so they cannot interleave with booking transitions.
    pub async fn set_room_status(
        &self,
        id: &str,
        requested: RoomStatus,
        admin_override: bool,
    ) -> Result<Room, BookingError> {
        let probe = self
            .rooms
            .find_by_id(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Room {} not found", id)))?;
        let thing = probe
            .id
            .clone()
            .ok_or_else(|| BookingError::Database("Room record missing id".to_string()))?;

        let lock = self.lock_for(&thing);
        let _guard = lock.lock().await;

        let room = self
            .rooms
            .find_by_id(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Room {} not found", id)))?;
        if !admin_override {
            transitions::guard_staff_room_status(room.status, requested)?;
        }

        info!(room = %thing, from = ?room.status, to = ?requested, admin_override, "Room status set");
        Ok(self.rooms.set_status(&thing, requested).await?)
    }

    // ========== Internals ==========

    async fn load(&self, id: &str) -> Result<Booking, BookingError> {
        self.bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Booking {} not found", id)))
    }

    fn lock_for(&self, room: &RecordId) -> Arc<Mutex<()>> {
        self.room_locks
            .entry(room.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone()
    }

    /// Insert the guest into the directory if the identity is new
    async fn register_guest(&self, booking: &Booking) -> Result<(), BookingError> {
        let existing = self
            .guests
            .find_by_identity(&booking.first_name, &booking.last_name, &booking.id_number)
            .await?;
        if existing.is_none() {
            self.guests
                .create(Guest {
                    id: None,
                    first_name: booking.first_name.clone(),
                    last_name: booking.last_name.clone(),
                    phone: booking.phone.clone(),
                    id_type: booking.id_type,
                    id_number: booking.id_number.clone(),
                    notes: None,
                    created_at: now_millis(),
                })
                .await?;
        }
        Ok(())
    }

    /// Append (or create with) a no-show note on the guest record
    async fn annotate_guest_no_show(
        &self,
        booking: &Booking,
        extra: Option<&str>,
    ) -> Result<(), BookingError> {
        let mut note = format!(
            "No-show for booking {} on {}.",
            booking.booking_number,
            millis_to_date_string(booking.check_in_date)
        );
        if let Some(extra) = extra
            && !extra.is_empty()
        {
            note.push_str(&format!(" Additional notes: {}", extra));
        }

        match self
            .guests
            .find_by_identity(&booking.first_name, &booking.last_name, &booking.id_number)
            .await?
        {
            Some(guest) => {
                let gid = guest
                    .id
                    .ok_or_else(|| BookingError::Database("Guest record missing id".to_string()))?;
                self.guests.append_note(&gid, &note).await?;
            }
            None => {
                self.guests
                    .create(Guest {
                        id: None,
                        first_name: booking.first_name.clone(),
                        last_name: booking.last_name.clone(),
                        phone: booking.phone.clone(),
                        id_type: booking.id_type,
                        id_number: booking.id_number.clone(),
                        notes: Some(note),
                        created_at: now_millis(),
                    })
                    .await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::{IdType, Pricing, RoomCreate, RoomTypeCreate};
    use crate::db::repository::RoomTypeRepository;

    // A fixed future instant keeps windows stable across the suite
    const T0: i64 = 1_900_000_000_000;
    const H: i64 = 3_600_000;

    struct Fixture {
        engine: BookingEngine,
        db: Surreal<Db>,
        room: RecordId,
    }

    async fn fixture() -> Fixture {
        let db = DbService::memory().await.unwrap().db;
        let engine = BookingEngine::with_db(db.clone());
        let room = seed_room(&db, "101").await;
        Fixture { engine, db, room }
    }

    async fn seed_room(db: &Surreal<Db>, number: &str) -> RecordId {
        let types = RoomTypeRepository::new(db.clone());
        let room_type = match types.find_by_name("Standard").await.unwrap() {
            Some(rt) => rt,
            None => types
                .create(RoomTypeCreate {
                    name: "Standard".to_string(),
                    base_capacity: Some(2),
                    pricing: Pricing {
                        hourly3: 50.0,
                        hourly8: 90.0,
                        hourly12: 120.0,
                        daily: 180.0,
                    },
                    penalty: Some(25.0),
                })
                .await
                .unwrap(),
        };
        let rooms = RoomRepository::new(db.clone());
        let room = rooms
            .create(RoomCreate {
                room_number: number.to_string(),
                room_type: room_type.id.unwrap(),
                floor: Some(1),
            })
            .await
            .unwrap();
        room.id.unwrap()
    }

    fn payload(room: &RecordId, check_in: i64) -> BookingCreate {
        BookingCreate {
            room: room.clone(),
            first_name: "Ana".to_string(),
            last_name: "Silva".to_string(),
            phone: "555-0101".to_string(),
            id_type: IdType::Passport,
            id_number: "X1234567".to_string(),
            check_in_date: check_in,
            duration: 3,
            total_amount: 150.0,
            paid_amount: 0.0,
            booking_status: None,
            created_by: "employee:reception".to_string(),
        }
    }

    async fn create(fx: &Fixture, check_in: i64) -> Booking {
        fx.engine
            .execute(BookingCommand::Create(Box::new(payload(&fx.room, check_in))))
            .await
            .unwrap()
    }

    async fn room_status(fx: &Fixture) -> RoomStatus {
        RoomRepository::new(fx.db.clone())
            .find_by_id(&fx.room.to_string())
            .await
            .unwrap()
            .unwrap()
            .status
    }

    fn booking_id(b: &Booking) -> String {
        b.id.as_ref().unwrap().to_string()
    }

    #[tokio::test]
    async fn create_confirmed_occupies_room_and_derives_fields() {
        let fx = fixture().await;
        let booking = create(&fx, T0).await;

        assert_eq!(booking.booking_status, BookingStatus::Confirmed);
        assert!(booking.booking_number.starts_with("BK-"));
        assert_eq!(booking.check_out_date, T0 + 3 * H);
        assert_eq!(booking.balance, 150.0);
        assert_eq!(booking.payment_status, PaymentStatus::Pending);
        assert!(booking.actual_check_in.is_none());

        // confirmed creation occupies the room immediately
        assert_eq!(room_status(&fx).await, RoomStatus::Occupied);

        // guest landed in the directory
        let guests = GuestRepository::new(fx.db.clone());
        let guest = guests
            .find_by_identity("Ana", "Silva", "X1234567")
            .await
            .unwrap();
        assert!(guest.is_some());
    }

    #[tokio::test]
    async fn create_checked_in_stamps_arrival() {
        let fx = fixture().await;
        let mut data = payload(&fx.room, T0);
        data.booking_status = Some(BookingStatus::CheckedIn);
        let booking = fx
            .engine
            .execute(BookingCommand::Create(Box::new(data)))
            .await
            .unwrap();

        assert_eq!(booking.booking_status, BookingStatus::CheckedIn);
        assert!(booking.actual_check_in.is_some());
        assert_eq!(room_status(&fx).await, RoomStatus::Occupied);
    }

    #[tokio::test]
    async fn create_rejects_zero_total() {
        let fx = fixture().await;
        let mut data = payload(&fx.room, T0);
        data.total_amount = 0.0;
        let err = fx
            .engine
            .execute(BookingCommand::Create(Box::new(data)))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));
        assert_eq!(err.to_string(), "Invalid total amount");
    }

    #[tokio::test]
    async fn create_rejects_unknown_duration() {
        let fx = fixture().await;
        let mut data = payload(&fx.room, T0);
        data.duration = 5;
        let err = fx
            .engine
            .execute(BookingCommand::Create(Box::new(data)))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));
    }

    #[tokio::test]
    async fn create_on_occupied_room_fails() {
        let fx = fixture().await;
        create(&fx, T0).await;

        // room is now Occupied; the status gate fires before the date scan
        let err = fx
            .engine
            .execute(BookingCommand::Create(Box::new(payload(&fx.room, T0 + 100 * H))))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::RoomUnavailable(_)));
        assert_eq!(err.to_string(), "Room is not available");
    }

    #[tokio::test]
    async fn overlapping_window_is_rejected_even_when_room_reads_available() {
        let fx = fixture().await;
        create(&fx, T0).await;

        // an operator forces the room back to Available; the date scan still blocks
        fx.engine
            .set_room_status(&fx.room.to_string(), RoomStatus::Available, true)
            .await
            .unwrap();

        let err = fx
            .engine
            .execute(BookingCommand::Create(Box::new(payload(&fx.room, T0 + H))))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::RoomUnavailable(_)));
        assert_eq!(err.to_string(), "Room is already booked for the selected dates");
    }

    #[tokio::test]
    async fn exact_boundary_counts_as_conflict() {
        let fx = fixture().await;
        let first = create(&fx, T0).await;
        fx.engine
            .set_room_status(&fx.room.to_string(), RoomStatus::Available, true)
            .await
            .unwrap();

        // back-to-back: starts exactly at the first booking's checkout instant
        let err = fx
            .engine
            .execute(BookingCommand::Create(Box::new(payload(
                &fx.room,
                first.check_out_date,
            ))))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::RoomUnavailable(_)));
    }

    #[tokio::test]
    async fn disjoint_window_is_accepted() {
        let fx = fixture().await;
        create(&fx, T0).await;
        fx.engine
            .set_room_status(&fx.room.to_string(), RoomStatus::Available, true)
            .await
            .unwrap();

        // a clearly separate window books fine
        let second = fx
            .engine
            .execute(BookingCommand::Create(Box::new(payload(&fx.room, T0 + 100 * H))))
            .await
            .unwrap();
        assert_eq!(second.booking_status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn check_in_flow() {
        let fx = fixture().await;
        let booking = create(&fx, T0).await;

        let checked_in = fx
            .engine
            .execute(BookingCommand::CheckIn {
                id: booking_id(&booking),
            })
            .await
            .unwrap();

        assert_eq!(checked_in.booking_status, BookingStatus::CheckedIn);
        assert!(checked_in.actual_check_in.is_some());
        // planned checkout never moves with the actual arrival
        assert_eq!(checked_in.check_out_date, booking.check_out_date);
        assert_eq!(room_status(&fx).await, RoomStatus::Occupied);
    }

    #[tokio::test]
    async fn repeated_check_in_fails_and_keeps_first_timestamp() {
        let fx = fixture().await;
        let booking = create(&fx, T0).await;
        let id = booking_id(&booking);

        let first = fx
            .engine
            .execute(BookingCommand::CheckIn { id: id.clone() })
            .await
            .unwrap();
        let stamped = first.actual_check_in;
        assert!(stamped.is_some());

        let err = fx
            .engine
            .execute(BookingCommand::CheckIn { id: id.clone() })
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::InvalidTransition(_)));

        let reloaded = BookingRepository::new(fx.db.clone())
            .find_by_id(&id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.actual_check_in, stamped);
        assert_eq!(reloaded.booking_status, BookingStatus::CheckedIn);
    }

    #[tokio::test]
    async fn check_out_sends_room_to_maintenance() {
        let fx = fixture().await;
        let booking = create(&fx, T0).await;
        let id = booking_id(&booking);

        fx.engine
            .execute(BookingCommand::CheckIn { id: id.clone() })
            .await
            .unwrap();
        let checked_out = fx
            .engine
            .execute(BookingCommand::CheckOut { id })
            .await
            .unwrap();

        assert_eq!(checked_out.booking_status, BookingStatus::CheckedOut);
        assert!(checked_out.actual_check_out.is_some());
        // turnover, not straight back to Available
        assert_eq!(room_status(&fx).await, RoomStatus::Maintenance);
    }

    #[tokio::test]
    async fn check_out_requires_checked_in() {
        let fx = fixture().await;
        let booking = create(&fx, T0).await;

        let err = fx
            .engine
            .execute(BookingCommand::CheckOut {
                id: booking_id(&booking),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::InvalidTransition(_)));
        assert_eq!(err.to_string(), "Booking must be checked in to check out");
    }

    #[tokio::test]
    async fn cancel_releases_room() {
        let fx = fixture().await;
        let booking = create(&fx, T0).await;
        let id = booking_id(&booking);

        let cancelled = fx
            .engine
            .execute(BookingCommand::Cancel {
                id: id.clone(),
                reason: Some("Guest called to cancel".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(cancelled.booking_status, BookingStatus::Cancelled);
        assert!(cancelled.cancellation_date.is_some());
        assert_eq!(
            cancelled.cancellation_reason.as_deref(),
            Some("Guest called to cancel")
        );
        assert_eq!(room_status(&fx).await, RoomStatus::Available);

        // cancelling again is rejected
        let err = fx
            .engine
            .execute(BookingCommand::Cancel { id, reason: None })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Booking is already cancelled");
    }

    #[tokio::test]
    async fn cancel_after_check_out_fails() {
        let fx = fixture().await;
        let booking = create(&fx, T0).await;
        let id = booking_id(&booking);

        fx.engine
            .execute(BookingCommand::CheckIn { id: id.clone() })
            .await
            .unwrap();
        fx.engine
            .execute(BookingCommand::CheckOut { id: id.clone() })
            .await
            .unwrap();

        let err = fx
            .engine
            .execute(BookingCommand::Cancel { id, reason: None })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Booking is already checked out");
        // room stays in turnover
        assert_eq!(room_status(&fx).await, RoomStatus::Maintenance);
    }

    #[tokio::test]
    async fn no_show_releases_room_and_annotates_guest() {
        let fx = fixture().await;
        let booking = create(&fx, T0).await;

        let marked = fx
            .engine
            .execute(BookingCommand::MarkNoShow {
                id: booking_id(&booking),
                notes: Some("late".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(marked.booking_status, BookingStatus::NoShow);
        assert_eq!(room_status(&fx).await, RoomStatus::Available);

        let guest = GuestRepository::new(fx.db.clone())
            .find_by_identity("Ana", "Silva", "X1234567")
            .await
            .unwrap()
            .unwrap();
        let notes = guest.notes.unwrap();
        assert!(notes.contains(&format!("No-show for booking {}", marked.booking_number)));
        assert!(notes.contains("Additional notes: late"));
    }

    #[tokio::test]
    async fn no_show_rejected_after_check_in() {
        let fx = fixture().await;
        let booking = create(&fx, T0).await;
        let id = booking_id(&booking);

        fx.engine
            .execute(BookingCommand::CheckIn { id: id.clone() })
            .await
            .unwrap();
        let err = fx
            .engine
            .execute(BookingCommand::MarkNoShow { id, notes: None })
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot mark a checked-in booking as no-show"
        );
    }

    #[tokio::test]
    async fn patch_rejects_status_and_room_changes() {
        let fx = fixture().await;
        let booking = create(&fx, T0).await;

        let err = fx
            .engine
            .execute(BookingCommand::PatchFields {
                id: booking_id(&booking),
                patch: Box::new(BookingUpdate {
                    booking_status: Some(BookingStatus::Cancelled),
                    ..Default::default()
                }),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));

        let err = fx
            .engine
            .execute(BookingCommand::PatchFields {
                id: booking_id(&booking),
                patch: Box::new(BookingUpdate {
                    room: Some(RecordId::from_table_key("room", "elsewhere")),
                    ..Default::default()
                }),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));
    }

    #[tokio::test]
    async fn patch_rederives_financials() {
        let fx = fixture().await;
        let booking = create(&fx, T0).await;
        let id = booking_id(&booking);

        let partial = fx
            .engine
            .execute(BookingCommand::PatchFields {
                id: id.clone(),
                patch: Box::new(BookingUpdate {
                    paid_amount: Some(50.0),
                    ..Default::default()
                }),
            })
            .await
            .unwrap();
        assert_eq!(partial.balance, 100.0);
        assert_eq!(partial.payment_status, PaymentStatus::Partial);

        let paid = fx
            .engine
            .execute(BookingCommand::PatchFields {
                id,
                patch: Box::new(BookingUpdate {
                    paid_amount: Some(150.0),
                    ..Default::default()
                }),
            })
            .await
            .unwrap();
        assert_eq!(paid.balance, 0.0);
        assert_eq!(paid.payment_status, PaymentStatus::Paid);
    }

    #[tokio::test]
    async fn patch_date_change_revalidates_conflicts() {
        let fx = fixture().await;
        let first = create(&fx, T0).await;
        fx.engine
            .set_room_status(&fx.room.to_string(), RoomStatus::Available, true)
            .await
            .unwrap();
        let second = create(&fx, T0 + 100 * H).await;

        // moving the second booking into the first one's window must fail
        let err = fx
            .engine
            .execute(BookingCommand::PatchFields {
                id: booking_id(&second),
                patch: Box::new(BookingUpdate {
                    check_in_date: Some(first.check_in_date + H),
                    ..Default::default()
                }),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::RoomUnavailable(_)));

        // moving it elsewhere is fine, and the checkout is recomputed
        let moved = fx
            .engine
            .execute(BookingCommand::PatchFields {
                id: booking_id(&second),
                patch: Box::new(BookingUpdate {
                    check_in_date: Some(T0 + 200 * H),
                    duration: Some(8),
                    ..Default::default()
                }),
            })
            .await
            .unwrap();
        assert_eq!(moved.check_out_date, T0 + 200 * H + 8 * H);
    }

    #[tokio::test]
    async fn staff_room_status_only_completes_turnover() {
        let fx = fixture().await;
        let booking = create(&fx, T0).await;
        let id = booking_id(&booking);

        // Occupied → Available without override is refused
        let err = fx
            .engine
            .set_room_status(&fx.room.to_string(), RoomStatus::Available, false)
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::InvalidTransition(_)));

        fx.engine
            .execute(BookingCommand::CheckIn { id: id.clone() })
            .await
            .unwrap();
        fx.engine
            .execute(BookingCommand::CheckOut { id })
            .await
            .unwrap();
        assert_eq!(room_status(&fx).await, RoomStatus::Maintenance);

        // turnover completion is the one staff-permitted change
        let room = fx
            .engine
            .set_room_status(&fx.room.to_string(), RoomStatus::Available, false)
            .await
            .unwrap();
        assert_eq!(room.status, RoomStatus::Available);
    }

    #[tokio::test]
    async fn guest_directory_deduplicates_by_identity() {
        let fx = fixture().await;
        create(&fx, T0).await;

        // same guest books a second room; the directory keeps one record
        let second_room = seed_room(&fx.db, "102").await;
        let mut data = payload(&second_room, T0);
        data.check_in_date = T0 + 50 * H;
        fx.engine
            .execute(BookingCommand::Create(Box::new(data)))
            .await
            .unwrap();

        let guests = GuestRepository::new(fx.db.clone())
            .find_all(Some("silva".to_string()), 50, 0)
            .await
            .unwrap();
        assert_eq!(guests.len(), 1);
    }
}
