//! Derived-weight arithmetic for molded production batches.

use moldline_api::services::molded_productions::{total_weight_considered, weight_considered_unit};
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn reference_batch_yields_expected_totals() {
    // 100 pieces, 50kg packages of 10, 20% loss factor.
    let unit = weight_considered_unit(dec!(50), 10, true, dec!(0.2)).unwrap();
    assert_eq!(unit, dec!(4.0));

    let total = total_weight_considered(100, unit);
    assert_eq!(total, dec!(400.0));
}

#[rstest]
#[case(dec!(50), 10, false, Decimal::ZERO, dec!(5))]
#[case(dec!(50), 10, true, dec!(0.2), dec!(4.0))]
#[case(dec!(12), 4, true, dec!(0.5), dec!(1.5))]
#[case(dec!(9), 3, true, Decimal::ZERO, dec!(3))]
fn unit_weight_cases(
    #[case] package_weight: Decimal,
    #[case] package_quantity: i32,
    #[case] loss_enabled: bool,
    #[case] loss_factor: Decimal,
    #[case] expected: Decimal,
) {
    let unit =
        weight_considered_unit(package_weight, package_quantity, loss_enabled, loss_factor)
            .unwrap();
    assert_eq!(unit, expected);
}

#[rstest]
#[case(dec!(50), 0, false, Decimal::ZERO)]
#[case(dec!(50), -3, false, Decimal::ZERO)]
#[case(Decimal::ZERO, 10, false, Decimal::ZERO)]
#[case(dec!(50), 10, true, dec!(1))]
#[case(dec!(50), 10, true, dec!(-0.1))]
fn invalid_inputs_are_rejected(
    #[case] package_weight: Decimal,
    #[case] package_quantity: i32,
    #[case] loss_enabled: bool,
    #[case] loss_factor: Decimal,
) {
    assert!(
        weight_considered_unit(package_weight, package_quantity, loss_enabled, loss_factor)
            .is_err()
    );
}
