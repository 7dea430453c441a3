//! Money types with precise decimal arithmetic
//!
//! This module provides a representation of monetary values using
//! rust_decimal, so that fee and tax calculations never touch floating point.
//! The ledger is single-currency (euro); amounts keep full precision in memory
//! and are rounded to cents only at the points where billing rules ask for it.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::str::FromStr;
use thiserror::Error;

/// Number of fraction digits used for invoiced amounts
pub const CENT_PLACES: u32 = 2;

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Overflow during calculation")]
    Overflow,
}

/// A monetary amount
///
/// Arithmetic keeps the full decimal precision. Use [`Money::round_to_cents`]
/// to apply the billing rounding rule (half away from zero, two decimals).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money {
    amount: Decimal,
}

impl Money {
    /// Creates a new Money value without rounding
    pub fn new(amount: Decimal) -> Self {
        Self { amount }
    }

    /// Creates Money from an integer amount in cents
    pub fn from_cents(cents: i64) -> Self {
        Self::new(Decimal::new(cents, CENT_PLACES))
    }

    /// Creates a zero amount
    pub fn zero() -> Self {
        Self { amount: dec!(0) }
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Rounds to whole cents, midpoints away from zero
    pub fn round_to_cents(&self) -> Self {
        Self::new(
            self.amount
                .round_dp_with_strategy(CENT_PLACES, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Multiplies by a scalar, e.g. a number of months or cubic metres
    pub fn multiply(&self, factor: Decimal) -> Self {
        Self::new(self.amount * factor)
    }

    /// Checked multiplication that reports overflow instead of panicking
    pub fn checked_multiply(&self, factor: Decimal) -> Result<Self, MoneyError> {
        self.amount
            .checked_mul(factor)
            .map(Self::new)
            .ok_or(MoneyError::Overflow)
    }

    /// Divides by a scalar
    pub fn divide(&self, divisor: Decimal) -> Result<Self, MoneyError> {
        if divisor.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        self.amount
            .checked_div(divisor)
            .map(Self::new)
            .ok_or(MoneyError::Overflow)
    }

    /// Splits the amount into `parts` equal shares and returns one share
    /// rounded to cents.
    ///
    /// Unlike an exact allocation, the rounding residue is not handed to any
    /// particular share: `parts` shares may add up to the original amount
    /// give or take `(parts - 1)` cents.
    pub fn share_of(&self, parts: u32) -> Result<Self, MoneyError> {
        if parts == 0 {
            return Err(MoneyError::DivisionByZero);
        }
        Ok(self.divide(Decimal::from(parts))?.round_to_cents())
    }

    /// Formats the amount with exactly two fraction digits and a comma
    /// separator, e.g. `167,40`
    pub fn to_locale_string(&self) -> String {
        let mut rounded = self.round_to_cents().amount;
        rounded.rescale(CENT_PLACES);
        rounded.to_string().replacen('.', ",", 1)
    }

    /// Parses an amount written with either a comma or a dot as the
    /// fraction separator
    pub fn parse_locale(text: &str) -> Result<Self, MoneyError> {
        parse_decimal(text).map(Self::new)
    }
}

/// Parses a decimal written with either a comma or a dot separator
pub fn parse_decimal(text: &str) -> Result<Decimal, MoneyError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(MoneyError::InvalidAmount("empty value".to_string()));
    }
    Decimal::from_str(&trimmed.replacen(',', ".", 1))
        .map_err(|e| MoneyError::InvalidAmount(format!("{trimmed}: {e}")))
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_locale_string())
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_locale(s)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.amount + other.amount)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.amount += other.amount;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.amount - other.amount)
    }
}

impl Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, factor: Decimal) -> Self {
        self.multiply(factor)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// A tax rate such as VAT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// The rate as a fraction (e.g., 0.24 for 24%)
    value: Decimal,
}

impl Rate {
    /// Creates a rate from a percentage (e.g., 24 for 24%)
    pub fn from_percentage(percentage: Decimal) -> Self {
        Self {
            value: percentage / dec!(100),
        }
    }

    /// Parses a percentage written with a comma or dot separator
    pub fn parse_percentage(text: &str) -> Result<Self, MoneyError> {
        parse_decimal(text).map(Self::from_percentage)
    }

    /// Returns the rate as a fraction
    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    /// Returns the rate as a percentage
    pub fn as_percentage(&self) -> Decimal {
        self.value * dec!(100)
    }

    /// Applies this rate to a money amount, without rounding
    pub fn apply(&self, money: &Money) -> Money {
        money.multiply(self.value)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().normalize())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn shares_stay_within_rounding_slack(
            cents in 1i64..100_000_000i64,
            parts in 1u32..200u32
        ) {
            let cost = Money::from_cents(cents);
            let share = cost.share_of(parts).unwrap();
            let total = share.multiply(Decimal::from(parts));

            let slack = Decimal::new(i64::from(parts - 1), CENT_PLACES);
            prop_assert!((total.amount() - cost.amount()).abs() <= slack);
        }

        #[test]
        fn locale_string_round_trips_cents(cents in -1_000_000_000i64..1_000_000_000i64) {
            let money = Money::from_cents(cents);
            let parsed = Money::parse_locale(&money.to_locale_string()).unwrap();
            prop_assert_eq!(parsed, money);
        }
    }
}
