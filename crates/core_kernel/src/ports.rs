//! Ports and Adapters Infrastructure
//!
//! The billing engine talks to the outside world through port traits defined
//! in `domain_billing`: a dataset provider and a meter reading source.
//! Adapters (the ledger CSV file, the utility's web portal, in-memory test
//! doubles) implement those traits and report failures with [`PortError`].
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            BillingUpdateEngine               │
//! └──────────────────────────────────────────────┘
//!               │                    │
//!               ▼                    ▼
//!       BillingDataset          MeterReader
//!               ▲                    ▲
//!     ┌─────────┴───────┐   ┌───────┴─────────┐
//!     │  Ledger CSV     │   │  Portal session  │
//!     │  (infra_csv)    │   │  (infra_portal)  │
//!     └─────────────────┘   └──────────────────┘
//! ```

use std::fmt;
use thiserror::Error;

/// Error type for port operations
///
/// Provides a unified error type that all port implementations must use,
/// so the engine can attach its own context without knowing the adapter.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation timed out
    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
    },

    /// The external system answered with something we could not interpret
    #[error("Transformation error: {message}")]
    Transformation {
        message: String,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a Connection error that keeps the underlying cause
    pub fn connection_with(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        PortError::Connection {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a Transformation error
    pub fn transformation(message: impl Into<String>) -> Self {
        PortError::Transformation {
            message: message.into(),
        }
    }

    /// Returns true if this error indicates a transient failure that may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. } | PortError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_error_not_found() {
        let error = PortError::not_found("Meter", "12345");
        assert!(!error.is_transient());
        assert!(error.to_string().contains("Meter"));
        assert!(error.to_string().contains("12345"));
    }

    #[test]
    fn test_port_error_transient() {
        let timeout = PortError::Timeout {
            operation: "read_meter".to_string(),
            duration_ms: 5000,
        };
        assert!(timeout.is_transient());
        assert!(PortError::connection("reset by peer").is_transient());
        assert!(!PortError::transformation("no counter cell").is_transient());
    }
}
