//! Meter row layout and conversion
//!
//! A meter row carries the member's contact details followed by the reading
//! and billing columns. Only the reading and billing columns are owned by
//! the billing run; everything else is copied through untouched.

use std::fmt::Display;

use domain_billing::{
    BillingAmounts, CounterReading, ReferenceNumber, TaxedAmount, UnitKind, UnitRecord,
};
use core_kernel::temporal::{format_ledger_date, parse_ledger_date};
use core_kernel::{MeterNumber, SiteNumber};

use crate::error::CsvError;

/// Number of columns in a meter row
pub const COLUMN_COUNT: usize = 31;

/// Meter row column indices, 0-based
pub mod columns {
    pub const NAME: usize = 0;
    pub const BANK_ACCOUNT: usize = 1;
    pub const PHONE: usize = 2;
    pub const EMAIL: usize = 3;
    pub const STREET_ADDRESS: usize = 4;
    pub const POSTAL_CODE: usize = 5;
    pub const CITY: usize = 6;
    pub const PROPERTY_ID: usize = 7;
    pub const TENANTS: usize = 8;
    pub const PERMANENT_RESIDENCY: usize = 9;
    pub const JOIN_DATE: usize = 10;
    pub const LEAVE_DATE: usize = 11;
    pub const SITE: usize = 12;
    pub const METER: usize = 13;
    pub const PREVIOUS_COUNTER: usize = 14;
    pub const PREVIOUS_DATE: usize = 15;
    pub const COUNTER: usize = 16;
    pub const DATE: usize = 17;
    /// Customer tag shown by the reading source
    pub const CHECK: usize = 18;
    pub const CONSUMPTION: usize = 19;
    pub const WATER_FEE_WITHOUT_TAX: usize = 20;
    pub const WATER_TAX: usize = 21;
    pub const WATER_FEE_WITH_TAX: usize = 22;
    pub const MONTHS: usize = 23;
    pub const BASIC_FEE_WITHOUT_TAX: usize = 24;
    pub const BASIC_FEE_TAX: usize = 25;
    pub const BASIC_FEE_WITH_TAX: usize = 26;
    pub const EXTRA_DESCRIPTION: usize = 27;
    pub const EXTRA_COST: usize = 28;
    pub const TOTAL: usize = 29;
    pub const REFERENCE: usize = 30;
}

use columns::*;

/// Separator between multiple additional cost descriptions
pub const DESCRIPTION_SEPARATOR: &str = "; ";

/// Pads `fields` with empty strings up to `len` columns
pub(crate) fn pad(fields: &mut Vec<String>, len: usize) {
    if fields.len() < len {
        fields.resize(len, String::new());
    }
}

/// Parses a required field
pub(crate) fn parse_field<T, E: Display>(
    fields: &[String],
    row: usize,
    column: usize,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> Result<T, CsvError> {
    let text = fields.get(column).map_or("", |f| f.trim());
    parse(text).map_err(|e| CsvError::field(row, column, text, e))
}

/// Parses a field that may be left blank
pub(crate) fn parse_optional<T, E: Display>(
    fields: &[String],
    row: usize,
    column: usize,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> Result<Option<T>, CsvError> {
    let blank = fields.get(column).map_or(true, |f| f.trim().is_empty());
    if blank {
        return Ok(None);
    }
    parse_field(fields, row, column, parse).map(Some)
}

fn parse_integer(text: &str) -> Result<i64, std::num::ParseIntError> {
    text.parse()
}

/// Reads a counter and its date; a blank counter means no reading
fn parse_reading(
    fields: &[String],
    row: usize,
    counter_column: usize,
    date_column: usize,
) -> Result<Option<CounterReading>, CsvError> {
    let Some(counter) = parse_optional(fields, row, counter_column, parse_integer)? else {
        return Ok(None);
    };
    let date = parse_field(fields, row, date_column, parse_ledger_date)?;
    Ok(Some(CounterReading { counter, date }))
}

/// Converts a padded meter row into a unit record
pub(crate) fn parse_unit(fields: &[String], row: usize, kind: UnitKind) -> Result<UnitRecord, CsvError> {
    let mut unit = UnitRecord::new(fields[NAME].trim(), kind);
    unit.site = SiteNumber::new(fields[SITE].as_str());
    unit.meter = MeterNumber::new(fields[METER].as_str());
    unit.previous = parse_reading(fields, row, PREVIOUS_COUNTER, PREVIOUS_DATE)?;
    unit.current = parse_reading(fields, row, COUNTER, DATE)?;
    unit.observer = fields[CHECK].trim().to_string();
    unit.consumption = parse_optional(fields, row, CONSUMPTION, parse_integer)?;
    unit.reference = parse_optional(fields, row, REFERENCE, ReferenceNumber::parse)?;
    Ok(unit)
}

fn write_reading(fields: &mut [String], counter_column: usize, date_column: usize, reading: CounterReading) {
    fields[counter_column] = reading.counter.to_string();
    fields[date_column] = format_ledger_date(reading.date);
}

fn write_taxed(fields: &mut [String], [base, tax, total]: [usize; 3], amount: Option<TaxedAmount>) {
    match amount {
        Some(amount) => {
            fields[base] = amount.base.to_locale_string();
            fields[tax] = amount.tax.to_locale_string();
            fields[total] = amount.total.to_locale_string();
        }
        None => {
            fields[base].clear();
            fields[tax].clear();
            fields[total].clear();
        }
    }
}

fn write_billing(fields: &mut [String], billing: &BillingAmounts) {
    write_taxed(
        fields,
        [WATER_FEE_WITHOUT_TAX, WATER_TAX, WATER_FEE_WITH_TAX],
        billing.consumption_fee,
    );
    fields[MONTHS] = billing.billed_months.map(|m| m.to_string()).unwrap_or_default();
    write_taxed(
        fields,
        [BASIC_FEE_WITHOUT_TAX, BASIC_FEE_TAX, BASIC_FEE_WITH_TAX],
        billing.fixed_fee,
    );
    fields[EXTRA_DESCRIPTION] = billing.extra_descriptions.join(DESCRIPTION_SEPARATOR);
    fields[EXTRA_COST] = billing.extra_costs.to_locale_string();
    fields[TOTAL] = billing.total.to_locale_string();
}

/// Writes the unit's typed values over the raw row
///
/// Readings and billing absent from the unit leave the raw columns as read.
pub(crate) fn overlay_unit(fields: &mut Vec<String>, unit: &UnitRecord) {
    pad(fields, COLUMN_COUNT);

    if let Some(previous) = unit.previous {
        write_reading(fields, PREVIOUS_COUNTER, PREVIOUS_DATE, previous);
    }
    if let Some(current) = unit.current {
        write_reading(fields, COUNTER, DATE, current);
    }
    fields[CHECK] = unit.observer.clone();
    if let Some(consumption) = unit.consumption {
        fields[CONSUMPTION] = consumption.to_string();
    }
    if let Some(billing) = &unit.billing {
        write_billing(fields, billing);
    }
    if let Some(reference) = &unit.reference {
        fields[REFERENCE] = reference.to_string();
    }
}
