//! Test doubles for the billing ports

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::NaiveDate;
use core_kernel::{MeterNumber, PortError, SiteNumber};
use domain_billing::{BillingDataset, BillingError, CommonVariables, MeterReader, MeterReading, UnitRecord};

/// Dataset held entirely in memory
#[derive(Debug, Clone)]
pub struct InMemoryDataset {
    pub units: Vec<UnitRecord>,
    pub common: CommonVariables,
    pub billing_date: Option<NaiveDate>,
}

impl InMemoryDataset {
    pub fn new(units: Vec<UnitRecord>, common: CommonVariables) -> Self {
        Self {
            units,
            common,
            billing_date: None,
        }
    }

    /// Finds a unit by name
    pub fn unit(&self, name: &str) -> &UnitRecord {
        self.units
            .iter()
            .find(|u| u.name == name)
            .unwrap_or_else(|| panic!("no unit named {name}"))
    }
}

impl BillingDataset for InMemoryDataset {
    fn units(&self) -> &[UnitRecord] {
        &self.units
    }

    fn common_variables(&self) -> Result<CommonVariables, BillingError> {
        Ok(self.common)
    }

    fn replace_units(&mut self, units: Vec<UnitRecord>) {
        self.units = units;
    }

    fn set_billing_date(&mut self, date: NaiveDate) {
        self.billing_date = Some(date);
    }
}

/// Meter reader returning canned readings and recording every request
#[derive(Debug, Default)]
pub struct StubMeterReader {
    readings: HashMap<MeterNumber, MeterReading>,
    requests: RefCell<Vec<(SiteNumber, MeterNumber)>>,
}

impl StubMeterReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the reading returned for `meter`
    pub fn with_reading(mut self, meter: &str, counter: i64, date: NaiveDate) -> Self {
        self.readings.insert(
            MeterNumber::new(meter),
            MeterReading {
                counter,
                date,
                customer: format!("customer-{meter}"),
            },
        );
        self
    }

    /// Meters requested so far, in order
    pub fn requested_meters(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|(_, meter)| meter.to_string())
            .collect()
    }
}

impl MeterReader for StubMeterReader {
    fn read_meter(&self, site: &SiteNumber, meter: &MeterNumber) -> Result<MeterReading, PortError> {
        self.requests.borrow_mut().push((site.clone(), meter.clone()));
        self.readings
            .get(meter)
            .cloned()
            .ok_or_else(|| PortError::not_found("meter", meter))
    }
}
