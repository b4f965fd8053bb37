//! Documents a known data-integrity gap: nothing prevents a reservation's
//! consumed total from exceeding its reserved total. The gap is deliberate
//! and these tests pin the current behavior down instead of assuming the
//! ceiling holds. If a ceiling is ever introduced, the assertions flip and
//! this file becomes its regression test.

use chrono::Utc;
use moldline_api::entities::inventory_reservation::{
    status_after_consume, Model, ReservationStatus,
};
use rust_decimal_macros::dec;
use uuid::Uuid;

#[test]
fn consuming_past_reserved_is_accepted_and_closes_the_reservation() {
    // A draw of 130kg against a 100kg hold is not rejected anywhere in the
    // consume path; the reservation simply closes with a negative remainder.
    let status = status_after_consume(dec!(100), dec!(130));
    assert_eq!(status, ReservationStatus::Closed);
}

#[test]
fn over_consumed_reservation_reports_negative_remainder() {
    let reservation = Model {
        id: Uuid::new_v4(),
        production_pointing_id: Uuid::new_v4(),
        raw_material_id: Uuid::new_v4(),
        reserved_kg: dec!(100),
        consumed_kg: dec!(130),
        status: ReservationStatus::Closed,
        created_at: Utc::now(),
        updated_at: None,
    };
    assert_eq!(reservation.remaining_kg(), dec!(-30));
}
