//! Core Kernel - Foundational types for the water billing ledger
//!
//! This crate provides the building blocks shared by the billing engine and
//! its adapters:
//! - Money with fixed two-decimal rounding and the ledger's comma formatting
//! - VAT rates expressed as percentages
//! - Meter and site identifiers
//! - Billing date handling and month spans
//! - The error type used at every port boundary

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use money::{Money, MoneyError, Rate};
pub use temporal::{TemporalError, MonthSpan};
pub use identifiers::{MeterNumber, SiteNumber};
pub use ports::PortError;
pub use error::CoreError;
