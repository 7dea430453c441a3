//! CSV error types
//!
//! Every value in the ledger is parsed when the file is loaded, so a
//! malformed field is reported with its position before any billing starts.

use thiserror::Error;

use domain_billing::BillingError;

/// Errors that can occur while reading or writing the CSV files
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to open or write the file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The file ended before a required row
    #[error("Missing {0} row")]
    MissingRow(&'static str),

    /// A field could not be parsed
    ///
    /// `row` and `column` are 1-based, as shown by spreadsheet programs.
    #[error("Row {row}, column {column}: invalid value '{value}': {reason}")]
    Field {
        row: usize,
        column: usize,
        value: String,
        reason: String,
    },

    /// The ledger content is inconsistent for billing
    #[error(transparent)]
    Billing(#[from] BillingError),
}

impl CsvError {
    /// Creates a field error from a 0-based column index
    pub fn field(row: usize, column_index: usize, value: &str, reason: impl std::fmt::Display) -> Self {
        CsvError::Field {
            row,
            column: column_index + 1,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Checks if this error points at a specific field
    pub fn is_field_error(&self) -> bool {
        matches!(self, CsvError::Field { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_reports_one_based_column() {
        let error = CsvError::field(3, 16, "abc", "invalid digit found in string");

        match &error {
            CsvError::Field { row, column, value, .. } => {
                assert_eq!(*row, 3);
                assert_eq!(*column, 17);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(error.is_field_error());
        assert!(error.to_string().contains("column 17"));
    }

    #[test]
    fn test_missing_row_message() {
        assert_eq!(CsvError::MissingRow("separator").to_string(), "Missing separator row");
    }
}
