//! Custom Test Assertions
//!
//! Provides assertion helpers for billing results that give more meaningful
//! messages than plain `assert_eq!`.

use core_kernel::Money;
use domain_billing::{ReferenceNumber, UnitRecord};
use rust_decimal::Decimal;

/// Asserts that a Money value equals an expected decimal amount
pub fn assert_amount(actual: Money, expected: Decimal, what: &str) {
    assert_eq!(
        actual.amount(),
        expected,
        "{what}: expected {expected}, got {}",
        actual.amount()
    );
}

/// Asserts that a unit was billed with the given grand total
pub fn assert_billed_total(unit: &UnitRecord, expected: Decimal) {
    let billing = unit
        .billing
        .as_ref()
        .unwrap_or_else(|| panic!("unit {} was not billed", unit.name));
    assert_amount(billing.total, expected, &format!("total of {}", unit.name));
}

/// Asserts that references are strictly increasing, and therefore distinct
pub fn assert_strictly_increasing(references: &[ReferenceNumber]) {
    for pair in references.windows(2) {
        assert!(
            pair[0] < pair[1],
            "references not strictly increasing: {} then {}",
            pair[0],
            pair[1]
        );
    }
}
