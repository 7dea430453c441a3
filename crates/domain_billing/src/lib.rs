//! Billing Domain - Periodic Water Billing
//!
//! This crate recomputes the invoices of a multi-unit property from its
//! meter ledger. One billing run:
//!
//! 1. finds the highest payment reference already issued,
//! 2. splits the run's additional costs evenly between members,
//! 3. optionally merges a fresh meter reading into every metered unit,
//! 4. bills every member (fixed fee, consumption fee, additional costs, VAT)
//!    under a new, strictly increasing reference number,
//! 5. stamps the billing date.
//!
//! The main meter row takes part in reading updates but is never billed.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::{BillingUpdateEngine, UpdateOptions};
//!
//! let engine = BillingUpdateEngine::new(portal_reader, UpdateOptions::default());
//! let summary = engine.update(&mut ledger, &additional_costs)?;
//! ```

pub mod unit;
pub mod reference;
pub mod allocation;
pub mod reading;
pub mod ports;
pub mod engine;
pub mod error;

pub use unit::{
    AdditionalCost, BillingAmounts, CommonVariables, CounterReading, MeterReading, TaxedAmount,
    UnitKind, UnitRecord,
};
pub use reference::ReferenceNumber;
pub use allocation::FeeAllocator;
pub use reading::{ReadingDelta, ReadingMerger};
pub use ports::{BillingDataset, MeterReader};
pub use engine::{BillingUpdateEngine, RunSummary, UpdateOptions};
pub use error::BillingError;
