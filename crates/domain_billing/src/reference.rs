//! Payment reference numbers
//!
//! A reference number is a string of digits whose last digit is a check
//! digit. The check digit is computed over the base digits from right to
//! left with the repeating weights 7, 3, 1 and is the distance of the
//! weighted sum to the next multiple of ten.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::BillingError;

const WEIGHTS: [u32; 3] = [7, 3, 1];

/// A payment reference number with its trailing check digit
///
/// Ordering compares the numeric value of the base digits, so `"1000"` sorts
/// after `"998"` even though it is smaller as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReferenceNumber {
    digits: String,
    base: u64,
}

impl ReferenceNumber {
    /// Parses a reference number
    ///
    /// # Errors
    ///
    /// Returns `InvalidReference` if the text is shorter than two characters,
    /// contains anything but ASCII digits, or its base does not fit in 64 bits.
    /// The check digit itself is not verified; see [`ReferenceNumber::has_valid_check_digit`].
    pub fn parse(text: &str) -> Result<Self, BillingError> {
        let digits = text.trim();
        if digits.len() < 2 {
            return Err(BillingError::invalid_reference(digits, "needs a base and a check digit"));
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BillingError::invalid_reference(digits, "not a digit string"));
        }

        let base = digits[..digits.len() - 1]
            .parse::<u64>()
            .map_err(|e| BillingError::invalid_reference(digits, e.to_string()))?;

        Ok(Self {
            digits: digits.to_string(),
            base,
        })
    }

    /// Builds the reference number for a base value
    pub fn from_base(base: u64) -> Self {
        let base_digits = base.to_string();
        let check = check_digit(&base_digits);
        Self {
            digits: format!("{base_digits}{check}"),
            base,
        }
    }

    /// Returns the next reference number in the sequence
    ///
    /// The old check digit is dropped, the base is incremented by one and a
    /// new check digit is appended.
    ///
    /// # Errors
    ///
    /// Returns `InvalidReference` if the base cannot be incremented.
    pub fn next(&self) -> Result<Self, BillingError> {
        let base = self
            .base
            .checked_add(1)
            .ok_or_else(|| BillingError::invalid_reference(&self.digits, "sequence exhausted"))?;
        Ok(Self::from_base(base))
    }

    /// Returns the numeric value without the check digit
    pub fn base(&self) -> u64 {
        self.base
    }

    pub fn as_str(&self) -> &str {
        &self.digits
    }

    /// Returns true if the trailing digit matches the computed check digit
    pub fn has_valid_check_digit(&self) -> bool {
        let (base_digits, check) = self.digits.split_at(self.digits.len() - 1);
        check_digit(base_digits).to_string() == check
    }
}

/// Computes the check digit for a string of base digits
pub fn check_digit(base_digits: &str) -> u32 {
    let sum: u32 = base_digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(position, b)| u32::from(b - b'0') * WEIGHTS[position % WEIGHTS.len()])
        .sum();
    (10 - sum % 10) % 10
}

impl Ord for ReferenceNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.base
            .cmp(&other.base)
            .then_with(|| self.digits.cmp(&other.digits))
    }
}

impl PartialOrd for ReferenceNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ReferenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}

impl FromStr for ReferenceNumber {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ReferenceNumber {
    type Error = BillingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ReferenceNumber> for String {
    fn from(reference: ReferenceNumber) -> String {
        reference.digits
    }
}
