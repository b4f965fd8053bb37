//! Property checks on the pure arithmetic and transition functions.

use moldline_api::entities::inventory_reservation::{status_after_consume, ReservationStatus};
use moldline_api::services::block_productions::{theoretical_weight_kg, volume_m3};
use moldline_api::services::molded_productions::{total_weight_considered, weight_considered_unit};
use proptest::prelude::*;
use rust_decimal::Decimal;

proptest! {
    #[test]
    fn reservation_closes_exactly_when_consumed_reaches_reserved(
        reserved_cents in 1i64..10_000_000,
        consumed_cents in 0i64..20_000_000,
    ) {
        let reserved = Decimal::new(reserved_cents, 2);
        let consumed = Decimal::new(consumed_cents, 2);
        let status = status_after_consume(reserved, consumed);
        if consumed >= reserved {
            prop_assert_eq!(status, ReservationStatus::Closed);
        } else {
            prop_assert_eq!(status, ReservationStatus::Active);
        }
    }

    #[test]
    fn loss_factor_never_increases_unit_weight(
        weight_cents in 1i64..10_000_000,
        package_quantity in 1i32..10_000,
        loss_bp in 0i64..10_000,
    ) {
        let package_weight = Decimal::new(weight_cents, 2);
        let loss_factor = Decimal::new(loss_bp, 4); // [0, 1)
        let plain = weight_considered_unit(package_weight, package_quantity, false, Decimal::ZERO)
            .unwrap();
        let lossy = weight_considered_unit(package_weight, package_quantity, true, loss_factor)
            .unwrap();
        prop_assert!(lossy <= plain);
        prop_assert!(lossy > Decimal::ZERO);
    }

    #[test]
    fn batch_total_is_quantity_times_unit(
        weight_cents in 1i64..1_000_000,
        package_quantity in 1i32..1_000,
        quantity in 1i32..100_000,
    ) {
        let package_weight = Decimal::new(weight_cents, 2);
        let unit = weight_considered_unit(package_weight, package_quantity, false, Decimal::ZERO)
            .unwrap();
        let total = total_weight_considered(quantity, unit);
        prop_assert_eq!(total, Decimal::from(quantity) * unit);
    }

    #[test]
    fn block_volume_is_positive_and_density_scales_weight(
        length in 1i32..5_000,
        width in 1i32..5_000,
        height in 1i32..5_000,
        density_tenths in 1i64..10_000,
    ) {
        let volume = volume_m3(length, width, height);
        prop_assert!(volume > Decimal::ZERO);

        let density = Decimal::new(density_tenths, 1);
        let weight = theoretical_weight_kg(volume, density);
        prop_assert_eq!(weight, volume * density);
    }
}
