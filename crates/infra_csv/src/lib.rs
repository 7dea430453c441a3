//! Infrastructure CSV Layer
//!
//! This crate provides the file formats of the water billing tool:
//!
//! - [`LedgerFile`]: the meter ledger, which is both the input and the
//!   output of a billing run. It implements
//!   [`BillingDataset`](domain_billing::BillingDataset).
//! - [`read_additional_costs`]: the list of costs shared by all members.
//!
//! Amounts are written with a comma as the fraction separator and dates as
//! `d.m.yyyy`, matching the spreadsheet the ledger is maintained in.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_csv::{LedgerFile, read_additional_costs_from_path};
//!
//! let mut ledger = LedgerFile::from_path("ledger.csv")?;
//! let costs = read_additional_costs_from_path("costs.csv")?;
//! engine.update(&mut ledger, &costs)?;
//! ledger.write(std::io::stdout())?;
//! ```

pub mod error;
pub mod row;
pub mod ledger;
pub mod additional_costs;

pub use error::CsvError;
pub use ledger::{LedgerFile, SEPARATOR};
pub use row::{columns, COLUMN_COUNT};
pub use additional_costs::{read_additional_costs, read_additional_costs_from_path};
