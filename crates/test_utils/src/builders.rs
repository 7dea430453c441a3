//! Test Data Builders
//!
//! Provides a builder for unit records with sensible defaults, so tests only
//! spell out the fields they care about.

use chrono::NaiveDate;
use core_kernel::{MeterNumber, SiteNumber};
use domain_billing::{CounterReading, ReferenceNumber, UnitKind, UnitRecord};

use crate::fixtures::DateFixtures;

/// Builder for constructing unit records
pub struct UnitRecordBuilder {
    record: UnitRecord,
}

impl UnitRecordBuilder {
    /// A billable member without meter or readings
    pub fn member(name: impl Into<String>) -> Self {
        Self {
            record: UnitRecord::new(name, UnitKind::Member),
        }
    }

    /// The property's main meter row
    pub fn main_meter() -> Self {
        Self {
            record: UnitRecord::new("Main meter", UnitKind::MainMeter),
        }
    }

    /// Assigns a site and meter number
    pub fn with_meter(mut self, site: &str, meter: &str) -> Self {
        self.record.site = SiteNumber::new(site);
        self.record.meter = MeterNumber::new(meter);
        self
    }

    /// Sets the stored current counter
    pub fn with_counter(mut self, counter: i64, date: NaiveDate) -> Self {
        self.record.current = Some(CounterReading { counter, date });
        self
    }

    /// Sets the stored previous counter
    pub fn with_previous_counter(mut self, counter: i64, date: NaiveDate) -> Self {
        self.record.previous = Some(CounterReading { counter, date });
        self
    }

    /// Stores a full period: previous and current counters on the fixture
    /// dates, with the difference as consumption
    pub fn with_period_consumption(self, previous_counter: i64, consumption: i64) -> Self {
        let mut builder = self
            .with_previous_counter(previous_counter, DateFixtures::previous_reading())
            .with_counter(previous_counter + consumption, DateFixtures::current_reading());
        builder.record.consumption = Some(consumption);
        builder
    }

    /// Sets the unit's existing reference number
    pub fn with_reference(mut self, reference: &str) -> Self {
        self.record.reference = Some(ReferenceNumber::parse(reference).expect("valid reference in test"));
        self
    }

    pub fn build(self) -> UnitRecord {
        self.record
    }
}
