//! Billing domain errors

use core_kernel::{MeterNumber, MoneyError, PortError};
use thiserror::Error;

/// Errors that can occur during a billing run
///
/// Every variant is fatal to the run: the engine never commits a partially
/// billed dataset.
#[derive(Debug, Error)]
pub enum BillingError {
    /// Reference number is not a digit string with a check digit
    #[error("Invalid reference number '{value}': {reason}")]
    InvalidReference {
        value: String,
        reason: String,
    },

    /// No reference number to continue the sequence from
    #[error("No existing reference number to continue from and no reference seed configured")]
    NoReferenceSeed,

    /// A reading field needed for the calculation is absent
    #[error("Missing {0}")]
    MissingReading(&'static str),

    /// Shared cost cannot be divided because nobody shares it
    #[error("No eligible members to divide the {0} between")]
    NoEligibleMembers(&'static str),

    /// The meter reading source failed
    #[error("Read meter {meter} for {unit}: {source}")]
    MeterRead {
        unit: String,
        meter: MeterNumber,
        #[source]
        source: PortError,
    },

    /// Calculation error
    #[error("Calculation error: {0}")]
    Money(#[from] MoneyError),

    /// Failure while processing a single unit
    #[error("{unit}: {source}")]
    Unit {
        unit: String,
        #[source]
        source: Box<BillingError>,
    },
}

impl BillingError {
    /// Attaches the name of the unit being processed
    pub fn for_unit(self, unit: impl Into<String>) -> Self {
        match self {
            already @ (BillingError::Unit { .. } | BillingError::MeterRead { .. }) => already,
            other => BillingError::Unit {
                unit: unit.into(),
                source: Box::new(other),
            },
        }
    }

    pub fn invalid_reference(value: impl Into<String>, reason: impl Into<String>) -> Self {
        BillingError::InvalidReference {
            value: value.into(),
            reason: reason.into(),
        }
    }
}
