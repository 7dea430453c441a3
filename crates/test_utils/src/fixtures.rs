//! Pre-built Test Fixtures
//!
//! Provides ready-to-use billing data. The values match the worked example
//! used throughout the tests: 24 % VAT, a 30,00 monthly fee per metered unit,
//! 2,50 per cubic metre and a 100,00 insurance shared by two members.

use chrono::NaiveDate;
use core_kernel::{Money, Rate};
use domain_billing::{AdditionalCost, CommonVariables, ReferenceNumber};
use rust_decimal_macros::dec;

/// Fixture for billing parameters
pub struct BillingFixtures;

impl BillingFixtures {
    /// Standard VAT (24%)
    pub fn vat() -> Rate {
        Rate::from_percentage(dec!(24))
    }

    /// Run parameters of the worked example
    pub fn common_variables() -> CommonVariables {
        CommonVariables {
            vat: Self::vat(),
            monthly_fee: Money::new(dec!(30.00)),
            water_price: Money::new(dec!(2.50)),
        }
    }

    /// Insurance of 100,00 with 24% VAT
    pub fn insurance() -> AdditionalCost {
        AdditionalCost::new("Insurance", Money::new(dec!(100.00)), Self::vat())
    }

    /// Tax-free cost that does not split evenly between three members
    pub fn snow_removal() -> AdditionalCost {
        AdditionalCost::new("Snow removal", Money::new(dec!(100.00)), Rate::from_percentage(dec!(0)))
    }

    /// Highest reference number issued before the run
    pub fn last_reference() -> ReferenceNumber {
        ReferenceNumber::parse("123443").expect("fixture reference is valid")
    }
}

/// Fixture for reading dates
pub struct DateFixtures;

impl DateFixtures {
    /// Date of the previous reading (15 Jan 2024)
    pub fn previous_reading() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    /// Date of the stored current reading, two months later
    pub fn current_reading() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    /// Date of a fresh reading, two months after the stored one
    pub fn new_reading() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 14).unwrap()
    }

    /// Billing date stamped by test runs
    pub fn billing_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }
}
