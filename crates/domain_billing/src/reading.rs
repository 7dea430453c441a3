//! Merging fresh meter readings into unit records
//!
//! [`ReadingMerger::merge`] advances a unit by one observation.
//! [`ReadingMerger::elapsed_months`] counts the months the fixed fee is
//! billed for and warns about unusual spans; the fee allocator calls it for
//! every unit with a consumption.

use tracing::{debug, warn};

use core_kernel::MonthSpan;

use crate::error::BillingError;
use crate::unit::{CounterReading, MeterReading, UnitRecord};

/// Spans longer than this are suspicious for a periodic billing run
const MAX_EXPECTED_MONTHS: u32 = 3;

/// Result of merging a reading into a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingDelta {
    /// New counter minus the counter it replaces; may be negative
    pub consumption: i64,
    pub months: MonthSpan,
}

/// Advances a unit's readings by one observation
pub struct ReadingMerger;

impl ReadingMerger {
    /// Merges `reading` into `unit`
    ///
    /// The stored current reading becomes the previous one, the observation
    /// becomes current and the difference is recorded as the unit's
    /// consumption. A negative difference (meter replaced or rolled back) is
    /// kept as is.
    ///
    /// # Errors
    ///
    /// Returns `MissingReading` if the unit has no stored counter to compare
    /// against. The unit is left unchanged in that case.
    pub fn merge(unit: &mut UnitRecord, reading: &MeterReading) -> Result<ReadingDelta, BillingError> {
        let stored = unit
            .current
            .ok_or(BillingError::MissingReading("previous counter"))?;

        let consumption = reading.counter - stored.counter;
        let months = MonthSpan::between(stored.date, reading.date);

        unit.previous = Some(stored);
        unit.current = Some(CounterReading {
            counter: reading.counter,
            date: reading.date,
        });
        unit.observer = reading.customer.clone();
        unit.consumption = Some(consumption);

        debug!(
            unit = %unit.name,
            counter = reading.counter,
            consumption,
            months = months.billed,
            "Merged meter reading"
        );

        Ok(ReadingDelta { consumption, months })
    }

    /// Months to charge the fixed fee for, from the unit's stored readings
    ///
    /// Only the calendar months are compared, so a span of fourteen months
    /// bills as two. Such spans are logged but the billed value is kept.
    ///
    /// # Errors
    ///
    /// Returns `MissingReading` if either reading date is absent.
    pub fn elapsed_months(unit: &UnitRecord) -> Result<MonthSpan, BillingError> {
        let previous = unit
            .previous
            .ok_or(BillingError::MissingReading("previous reading date"))?;
        let current = unit
            .current
            .ok_or(BillingError::MissingReading("reading date"))?;

        let span = MonthSpan::between(previous.date, current.date);
        if span.is_ambiguous() || span.billed > MAX_EXPECTED_MONTHS {
            warn!(
                unit = %unit.name,
                previous = %previous.date,
                current = %current.date,
                billed_months = span.billed,
                actual_months = span.actual,
                "Unusual billing period length"
            );
        }

        Ok(span)
    }
}
