//! Additional costs shared by all members
//!
//! One header row, then one cost per row: description, cost without tax,
//! VAT percentage. Decimals may use a comma or a dot. The header row is
//! required; a header with no rows below it is an empty list.

use std::fs::File;
use std::io;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use core_kernel::{Money, Rate};
use domain_billing::AdditionalCost;

use crate::error::CsvError;
use crate::row::{pad, parse_field};

const DESCRIPTION: usize = 0;
const COST: usize = 1;
const VAT: usize = 2;

/// Reads the additional costs list
///
/// # Errors
///
/// Returns `MissingRow` for an input without a header row, and a field
/// error for an unreadable cost or VAT.
pub fn read_additional_costs<R: io::Read>(reader: R) -> Result<Vec<AdditionalCost>, CsvError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    if rdr.headers()?.is_empty() {
        return Err(CsvError::MissingRow("additional costs header"));
    }
    let mut costs = Vec::new();

    for record in rdr.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line() as usize);
        let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
        pad(&mut fields, VAT + 1);

        let cost = parse_field(&fields, line, COST, Money::parse_locale)?;
        let vat = parse_field(&fields, line, VAT, Rate::parse_percentage)?;
        costs.push(AdditionalCost::new(fields[DESCRIPTION].trim(), cost, vat));
    }

    debug!(count = costs.len(), "Loaded additional costs");
    Ok(costs)
}

/// Reads the additional costs list from a file
pub fn read_additional_costs_from_path(path: impl AsRef<Path>) -> Result<Vec<AdditionalCost>, CsvError> {
    let file = File::open(path)?;
    read_additional_costs(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reads_comma_and_dot_decimals() {
        let input = "description,cost,vat\nInsurance,\"100,00\",24\nSnow removal,80.50,0\n";
        let costs = read_additional_costs(input.as_bytes()).unwrap();

        assert_eq!(costs.len(), 2);
        assert_eq!(costs[0].description, "Insurance");
        assert_eq!(costs[0].cost.amount(), dec!(100.00));
        assert_eq!(costs[0].vat, Rate::from_percentage(dec!(24)));
        assert_eq!(costs[1].cost.amount(), dec!(80.50));
        assert_eq!(costs[1].vat.as_percentage(), dec!(0));
    }

    #[test]
    fn test_header_only_yields_no_costs() {
        let costs = read_additional_costs("description,cost,vat\n".as_bytes()).unwrap();
        assert!(costs.is_empty());
    }

    #[test]
    fn test_empty_input_is_missing_header() {
        let error = read_additional_costs("".as_bytes()).unwrap_err();

        assert!(matches!(error, CsvError::MissingRow(_)));
        assert_eq!(error.to_string(), "Missing additional costs header row");
    }

    #[test]
    fn test_invalid_cost_reports_position() {
        let input = "description,cost,vat\nInsurance,lots,24\n";
        let error = read_additional_costs(input.as_bytes()).unwrap_err();

        match error {
            CsvError::Field { row, column, value, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, 2);
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_missing_vat_column_is_an_error() {
        let input = "description,cost,vat\nInsurance,100\n";
        let error = read_additional_costs(input.as_bytes()).unwrap_err();
        assert!(matches!(error, CsvError::Field { column: 3, .. }));
    }
}
