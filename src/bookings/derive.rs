//! Derived booking fields
//!
//! Pure functions invoked explicitly by every mutation path, so the
//! derivation is testable without a persistence round-trip. Monetary math
//! runs through `Decimal` and lands back in `f64` for storage.

use crate::db::models::{Booking, PaymentStatus};
use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::prelude::*;

/// One hour in Unix millis
pub const MS_PER_HOUR: i64 = 3_600_000;

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Checkout time is fixed from the planned check-in, never from the actual one
pub fn check_out_for(check_in: i64, duration_hours: u8) -> i64 {
    check_in + i64::from(duration_hours) * MS_PER_HOUR
}

/// Payment status from paid vs total
///
/// paid == 0 → Pending; 0 < paid < total → Partial; paid >= total → Paid.
pub fn payment_status_for(total_amount: f64, paid_amount: f64) -> PaymentStatus {
    if paid_amount <= 0.0 {
        PaymentStatus::Pending
    } else if paid_amount < total_amount {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Paid
    }
}

/// Recompute `balance` and `payment_status` in place
pub fn apply_financials(booking: &mut Booking) {
    let total = Decimal::from_f64_retain(booking.total_amount).unwrap_or_default();
    let paid = Decimal::from_f64_retain(booking.paid_amount).unwrap_or_default();
    booking.balance = (total - paid)
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(booking.total_amount - booking.paid_amount);
    booking.payment_status = payment_status_for(booking.total_amount, booking.paid_amount);
}

/// Display label `BK-YYYYMMDD-NNN` (NNN random, zero-padded)
///
/// Not guaranteed globally unique; the record id is the identity.
pub fn generate_booking_number(now: DateTime<Utc>) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1000);
    format!("BK-{}-{:03}", now.format("%Y%m%d"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{BookingStatus, IdType};
    use surrealdb::RecordId;

    fn sample_booking(total: f64, paid: f64) -> Booking {
        Booking {
            id: None,
            booking_number: "BK-20260315-042".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Silva".to_string(),
            phone: "555-0101".to_string(),
            id_type: IdType::Passport,
            id_number: "X1234567".to_string(),
            room: RecordId::from_table_key("room", "r101"),
            check_in_date: 1_700_000_000_000,
            check_out_date: check_out_for(1_700_000_000_000, 3),
            actual_check_in: None,
            actual_check_out: None,
            duration: 3,
            total_amount: total,
            paid_amount: paid,
            balance: 0.0,
            payment_status: PaymentStatus::Pending,
            booking_status: BookingStatus::Confirmed,
            cancellation_reason: None,
            cancellation_date: None,
            created_by: "employee:test".to_string(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn balance_invariant_after_apply() {
        let mut b = sample_booking(150.0, 40.0);
        apply_financials(&mut b);
        assert_eq!(b.balance, 110.0);

        b.paid_amount = 150.0;
        apply_financials(&mut b);
        assert_eq!(b.balance, 0.0);
    }

    #[test]
    fn balance_rounds_to_cents() {
        let mut b = sample_booking(100.0, 33.333);
        apply_financials(&mut b);
        assert_eq!(b.balance, 66.67);
    }

    #[test]
    fn payment_status_boundaries() {
        assert_eq!(payment_status_for(150.0, 0.0), PaymentStatus::Pending);
        assert_eq!(payment_status_for(150.0, 0.01), PaymentStatus::Partial);
        assert_eq!(payment_status_for(150.0, 149.99), PaymentStatus::Partial);
        // equal-to-total boundary is Paid
        assert_eq!(payment_status_for(150.0, 150.0), PaymentStatus::Paid);
        assert_eq!(payment_status_for(150.0, 200.0), PaymentStatus::Paid);
    }

    #[test]
    fn checkout_fixed_from_planned_checkin() {
        let check_in = 1_700_000_000_000;
        assert_eq!(check_out_for(check_in, 3), check_in + 3 * MS_PER_HOUR);
        assert_eq!(check_out_for(check_in, 8), check_in + 8 * MS_PER_HOUR);
        assert_eq!(check_out_for(check_in, 12), check_in + 12 * MS_PER_HOUR);
        assert_eq!(check_out_for(check_in, 24), check_in + 24 * MS_PER_HOUR);
    }

    #[test]
    fn booking_number_format() {
        let now = DateTime::parse_from_rfc3339("2026-03-15T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        for _ in 0..50 {
            let number = generate_booking_number(now);
            assert!(number.starts_with("BK-20260315-"));
            let suffix = number.rsplit('-').next().unwrap();
            assert_eq!(suffix.len(), 3);
            assert!(suffix.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
