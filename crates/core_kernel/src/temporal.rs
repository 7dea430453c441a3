//! Billing date handling
//!
//! The ledger writes dates as day.month.year without zero padding
//! (`2.1.2024`). Billing periods are counted in calendar months.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Format used when writing dates back to the ledger
pub const LEDGER_DATE_FORMAT: &str = "%-d.%-m.%Y";

/// Format used when reading ledger dates; accepts padded and unpadded parts
const LEDGER_DATE_INPUT_FORMAT: &str = "%d.%m.%Y";

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid date '{value}': {reason}")]
    InvalidDate {
        value: String,
        reason: String,
    },
}

/// Parses a ledger date such as `2.1.2024` or `02.01.2024`
pub fn parse_ledger_date(text: &str) -> Result<NaiveDate, TemporalError> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, LEDGER_DATE_INPUT_FORMAT).map_err(|e| {
        TemporalError::InvalidDate {
            value: trimmed.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Formats a date the way the ledger stores it
pub fn format_ledger_date(date: NaiveDate) -> String {
    date.format(LEDGER_DATE_FORMAT).to_string()
}

/// Month span between two readings
///
/// `billed` is the calendar-month difference taken modulo 12, which is what
/// invoices are charged for. `actual` also accounts for the year and is only
/// used to detect spans the billed value cannot represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSpan {
    pub billed: u32,
    pub actual: i32,
}

impl MonthSpan {
    /// Computes the span from the previous reading date to the current one
    pub fn between(previous: NaiveDate, current: NaiveDate) -> Self {
        let raw = current.month() as i32 - previous.month() as i32;
        let billed = raw.rem_euclid(12) as u32;
        let actual = (current.year() - previous.year()) * 12 + raw;

        Self { billed, actual }
    }

    /// Returns true if the billed months differ from the real span
    pub fn is_ambiguous(&self) -> bool {
        self.billed as i32 != self.actual
    }
}
