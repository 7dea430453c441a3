//! Infrastructure Portal Layer
//!
//! Fresh meter readings come from the water utility's consumption portal,
//! a server-rendered site without an API. [`PortalMeterReader`] logs in with
//! the meter and site numbers, opens the counter page and extracts the latest
//! reading. It implements [`MeterReader`](domain_billing::MeterReader).
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_portal::{PortalConfig, PortalMeterReader};
//!
//! let reader = PortalMeterReader::new(PortalConfig::default());
//! let reading = reader.read(&"77".into(), &"1001".into())?;
//! ```

pub mod config;
pub mod error;
pub mod page;
pub mod reader;

pub use config::PortalConfig;
pub use error::PortalError;
pub use page::PageParser;
pub use reader::PortalMeterReader;
