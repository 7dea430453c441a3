//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating billing inputs that respect
//! the domain's invariants.

use core_kernel::{Money, Rate};
use domain_billing::{AdditionalCost, ReferenceNumber};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for reference numbers of realistic length, check digit arbitrary
pub fn reference_strategy() -> impl Strategy<Value = ReferenceNumber> {
    (1u64..10_000_000_000u64, 0u32..10u32).prop_map(|(base, check)| {
        ReferenceNumber::parse(&format!("{base}{check}")).expect("generated digits are valid")
    })
}

/// Strategy for positive pre-tax amounts in cents
pub fn cost_strategy() -> impl Strategy<Value = Money> {
    (1i64..10_000_000i64).prop_map(Money::from_cents)
}

/// Strategy for VAT percentages between 0% and 30% with one decimal
pub fn vat_strategy() -> impl Strategy<Value = Rate> {
    (0i64..=300i64).prop_map(|n| Rate::from_percentage(Decimal::new(n, 1)))
}

/// Strategy for additional costs
pub fn additional_cost_strategy() -> impl Strategy<Value = AdditionalCost> {
    (cost_strategy(), vat_strategy()).prop_map(|(cost, vat)| AdditionalCost::new("Shared cost", cost, vat))
}

/// Strategy for the number of members sharing costs
pub fn member_count_strategy() -> impl Strategy<Value = u32> {
    1u32..60u32
}
