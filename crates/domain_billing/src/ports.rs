//! Billing Domain Ports
//!
//! The engine needs two things from outside: the dataset it bills and a way
//! to read meters. Both are traits so the ledger file, the utility portal and
//! in-memory test doubles can be swapped freely.
//!
//! - **BillingDataset**: the ledger CSV file (infra_csv) or an in-memory
//!   dataset (test_utils)
//! - **MeterReader**: the utility's consumption portal (infra_portal) or a
//!   stub returning canned readings (test_utils)

use chrono::NaiveDate;

use core_kernel::{MeterNumber, PortError, SiteNumber};

use crate::error::BillingError;
use crate::unit::{CommonVariables, MeterReading, UnitRecord};

/// Source and sink of the unit records for one billing run
pub trait BillingDataset {
    /// Unit records in ledger order
    fn units(&self) -> &[UnitRecord];

    /// Run-wide billing parameters
    fn common_variables(&self) -> Result<CommonVariables, BillingError>;

    /// Replaces the unit records with the billed ones
    ///
    /// Called once, after every unit has been processed successfully.
    fn replace_units(&mut self, units: Vec<UnitRecord>);

    /// Stamps the date of the billing run
    fn set_billing_date(&mut self, date: NaiveDate);
}

/// Source of fresh meter readings
pub trait MeterReader {
    /// Reads the current counter of a meter at a site
    ///
    /// Blocks until the reading is available or the source gives up.
    fn read_meter(&self, site: &SiteNumber, meter: &MeterNumber) -> Result<MeterReading, PortError>;
}

impl<T: MeterReader + ?Sized> MeterReader for &T {
    fn read_meter(&self, site: &SiteNumber, meter: &MeterNumber) -> Result<MeterReading, PortError> {
        (**self).read_meter(site, meter)
    }
}

impl<T: MeterReader + ?Sized> MeterReader for Box<T> {
    fn read_meter(&self, site: &SiteNumber, meter: &MeterNumber) -> Result<MeterReading, PortError> {
        (**self).read_meter(site, meter)
    }
}
