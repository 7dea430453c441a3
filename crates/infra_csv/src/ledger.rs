//! The meter ledger file
//!
//! ```text
//! header
//! meter row          <- first row is the main meter
//! meter row ...
//! ###
//! <label>, billing date (d.m.yyyy)
//! <label>, payment time in days
//! <label>, main meter monthly fee, VAT 0 %
//! <label>, water price per m3, VAT 0 %
//! <label>, VAT %
//! <label>, message printed on the invoices
//! ```
//!
//! The raw fields of every row are kept, so columns the billing run does not
//! own are written back exactly as they were read.

use std::fs::File;
use std::io;
use std::path::Path;

use chrono::{Days, NaiveDate};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tracing::debug;

use core_kernel::temporal::{format_ledger_date, parse_ledger_date};
use core_kernel::{Money, Rate};
use domain_billing::{BillingDataset, BillingError, CommonVariables, UnitKind, UnitRecord};

use crate::error::CsvError;
use crate::row::{overlay_unit, pad, parse_field, parse_optional, parse_unit, COLUMN_COUNT};

/// First field of the row that ends the meter rows
pub const SEPARATOR: &str = "###";

/// Names of the parameter rows following the separator, in file order
const PARAMETER_ROWS: [&str; 6] = [
    "billing date",
    "payment time",
    "main meter fee",
    "water price",
    "VAT",
    "message",
];

const BILLING_DATE_ROW: usize = 0;
const PAYMENT_TIME_ROW: usize = 1;
const MAIN_METER_FEE_ROW: usize = 2;
const WATER_PRICE_ROW: usize = 3;
const VAT_ROW: usize = 4;
const MESSAGE_ROW: usize = 5;

/// Column holding the value of a parameter row
const VALUE_COLUMN: usize = 1;

/// A CSV record with the line it was read from
struct RawRecord {
    line: usize,
    fields: Vec<String>,
}

impl From<&StringRecord> for RawRecord {
    fn from(record: &StringRecord) -> Self {
        Self {
            line: record.position().map_or(0, |p| p.line() as usize),
            fields: record.iter().map(str::to_string).collect(),
        }
    }
}

fn next_record<I>(records: &mut I, what: &'static str) -> Result<RawRecord, CsvError>
where
    I: Iterator<Item = csv::Result<StringRecord>>,
{
    let record = records.next().ok_or(CsvError::MissingRow(what))??;
    Ok(RawRecord::from(&record))
}

/// The ledger file in typed form
#[derive(Debug, Clone)]
pub struct LedgerFile {
    header: Vec<String>,
    raw_rows: Vec<Vec<String>>,
    separator: Vec<String>,
    parameter_rows: Vec<Vec<String>>,
    units: Vec<UnitRecord>,
    billing_date: Option<NaiveDate>,
    payment_days: u32,
    main_meter_fee: Money,
    water_price: Money,
    vat: Rate,
}

impl LedgerFile {
    /// Reads and validates a ledger
    ///
    /// # Errors
    ///
    /// - `MissingRow` if the header, separator or a parameter row is absent
    /// - `Field` for the first malformed number, date or reference
    pub fn read<R: io::Read>(reader: R) -> Result<Self, CsvError> {
        let mut records = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader)
            .into_records();

        let header = next_record(&mut records, "header")?.fields;

        let mut raw_rows = Vec::new();
        let mut units = Vec::new();
        let separator = loop {
            let RawRecord { line, mut fields } = next_record(&mut records, "separator")?;
            if fields.first().map(|f| f.trim()) == Some(SEPARATOR) {
                break fields;
            }

            let kind = if units.is_empty() {
                UnitKind::MainMeter
            } else {
                UnitKind::Member
            };
            pad(&mut fields, COLUMN_COUNT);
            units.push(parse_unit(&fields, line, kind)?);
            raw_rows.push(fields);
        };

        let mut parameters = Vec::with_capacity(PARAMETER_ROWS.len());
        for name in PARAMETER_ROWS {
            let mut record = next_record(&mut records, name)?;
            pad(&mut record.fields, VALUE_COLUMN + 1);
            parameters.push(record);
        }

        let value = |row: usize| (&parameters[row].fields, parameters[row].line);

        let (fields, line) = value(BILLING_DATE_ROW);
        let billing_date = parse_optional(fields, line, VALUE_COLUMN, parse_ledger_date)?;
        let (fields, line) = value(PAYMENT_TIME_ROW);
        let payment_days = parse_field(fields, line, VALUE_COLUMN, |s| s.parse::<u32>())?;
        let (fields, line) = value(MAIN_METER_FEE_ROW);
        let main_meter_fee = parse_field(fields, line, VALUE_COLUMN, Money::parse_locale)?;
        let (fields, line) = value(WATER_PRICE_ROW);
        let water_price = parse_field(fields, line, VALUE_COLUMN, Money::parse_locale)?;
        let (fields, line) = value(VAT_ROW);
        let vat = parse_field(fields, line, VALUE_COLUMN, Rate::parse_percentage)?;

        debug!(
            units = units.len(),
            billing_date = ?billing_date,
            "Loaded ledger"
        );

        Ok(Self {
            header,
            raw_rows,
            separator,
            parameter_rows: parameters.into_iter().map(|r| r.fields).collect(),
            units,
            billing_date,
            payment_days,
            main_meter_fee,
            water_price,
            vat,
        })
    }

    /// Reads a ledger from a file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CsvError> {
        let file = File::open(path)?;
        Self::read(file)
    }

    /// Writes the ledger with the current unit records and billing date
    pub fn write<W: io::Write>(&self, writer: W) -> Result<(), CsvError> {
        let mut out = WriterBuilder::new().flexible(true).from_writer(writer);

        out.write_record(&self.header)?;
        for (index, unit) in self.units.iter().enumerate() {
            let mut fields = self.raw_rows.get(index).cloned().unwrap_or_default();
            overlay_unit(&mut fields, unit);
            out.write_record(&fields)?;
        }
        out.write_record(&self.separator)?;

        for (index, row) in self.parameter_rows.iter().enumerate() {
            match (index, self.billing_date) {
                (BILLING_DATE_ROW, Some(date)) => {
                    let mut row = row.clone();
                    row[VALUE_COLUMN] = format_ledger_date(date);
                    out.write_record(&row)?;
                }
                _ => out.write_record(row)?,
            }
        }

        out.flush()?;
        debug!(units = self.units.len(), "Wrote ledger");
        Ok(())
    }

    /// Writes the ledger to a file, replacing it
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<(), CsvError> {
        let file = File::create(path)?;
        self.write(file)
    }

    /// Date of the latest billing run, if the ledger has one
    pub fn billing_date(&self) -> Option<NaiveDate> {
        self.billing_date
    }

    /// Days the members have to pay an invoice
    pub fn payment_days(&self) -> u32 {
        self.payment_days
    }

    /// Billing date plus payment time
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.billing_date?
            .checked_add_days(Days::new(u64::from(self.payment_days)))
    }

    /// Message printed on the invoices
    pub fn message(&self) -> &str {
        self.parameter_rows[MESSAGE_ROW][VALUE_COLUMN].as_str()
    }

    /// Monthly fee of the main meter, without tax
    pub fn main_meter_fee(&self) -> Money {
        self.main_meter_fee
    }

    /// Number of units other than the main meter that have their own meter
    pub fn metered_units(&self) -> usize {
        self.units
            .iter()
            .filter(|u| !u.is_main_meter() && u.has_meter())
            .count()
    }
}

impl BillingDataset for LedgerFile {
    fn units(&self) -> &[UnitRecord] {
        &self.units
    }

    fn common_variables(&self) -> Result<CommonVariables, BillingError> {
        CommonVariables::from_main_meter_fee(
            self.vat,
            self.main_meter_fee,
            self.metered_units() as u32,
            self.water_price,
        )
    }

    fn replace_units(&mut self, units: Vec<UnitRecord>) {
        self.units = units;
    }

    fn set_billing_date(&mut self, date: NaiveDate) {
        self.billing_date = Some(date);
    }
}
