//! Portal error types

use std::time::Duration;

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur while reading a meter from the portal
#[derive(Debug, Error)]
pub enum PortalError {
    /// The request could not be sent or the response not received
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A step of the login flow answered with something other than 200 OK
    #[error("{step} returned HTTP {status}")]
    Status { step: &'static str, status: u16 },

    /// The page did not have the expected structure
    #[error("Unexpected page content: {0}")]
    Page(String),

    /// A value on the page could not be parsed
    #[error("Invalid {what} '{value}'")]
    Parse { what: &'static str, value: String },
}

impl PortalError {
    /// Converts to the port error reported to the billing engine
    ///
    /// `timeout` is the configured request timeout, reported when the
    /// request timed out.
    pub fn into_port_error(self, timeout: Duration) -> PortError {
        match self {
            PortalError::Http(source) if source.is_timeout() => PortError::Timeout {
                operation: "meter portal request".to_string(),
                duration_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            },
            PortalError::Http(source) => PortError::connection_with("meter portal request failed", source),
            PortalError::Status { .. } => PortError::connection(self.to_string()),
            PortalError::Page(_) | PortalError::Parse { .. } => PortError::transformation(self.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_is_a_connection_failure() {
        let error = PortalError::Status {
            step: "login page",
            status: 503,
        };
        let port = error.into_port_error(Duration::from_secs(30));

        assert!(matches!(port, PortError::Connection { .. }));
        assert!(port.to_string().contains("login page returned HTTP 503"));
    }

    #[test]
    fn test_page_errors_are_transformation_failures() {
        let page = PortalError::Page("found 0 counter links".to_string());
        let parse = PortalError::Parse {
            what: "counter",
            value: "x".to_string(),
        };

        assert!(matches!(
            page.into_port_error(Duration::from_secs(1)),
            PortError::Transformation { .. }
        ));
        assert!(matches!(
            parse.into_port_error(Duration::from_secs(1)),
            PortError::Transformation { .. }
        ));
    }
}
