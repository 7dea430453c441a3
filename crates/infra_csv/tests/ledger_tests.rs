//! Integration tests for the ledger file

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use domain_billing::{BillingDataset, BillingError, BillingUpdateEngine, UnitKind, UpdateOptions};
use infra_csv::columns::*;
use infra_csv::{CsvError, LedgerFile, COLUMN_COUNT};
use test_utils::{BillingFixtures, DateFixtures, StubMeterReader};

const HEADER: &str = "Name,Bank account,Phone,Email,Street address,Postal code,City,Property id,\
Tenants,Permanent residency,Joined,Left,Site,Meter,Previous counter,Previous date,Counter,Date,\
Check,Consumption,Water,Water VAT,Water total,Months,Basic fee,Basic fee VAT,Basic fee total,\
Extra description,Extra cost,Total,Reference";

const PARAMETERS: [&str; 6] = [
    "Billing date,1.4.2024",
    "Payment time,14",
    "Main meter fee,\"60,00\"",
    "Water price,\"2,50\"",
    "VAT,24",
    "Message,Pay by the due date",
];

fn meter_row(values: &[(usize, &str)]) -> String {
    let mut fields = vec![String::new(); COLUMN_COUNT];
    for (column, value) in values {
        fields[*column] = value.to_string();
    }
    fields.join(",")
}

fn main_row() -> String {
    meter_row(&[
        (NAME, "Main meter"),
        (SITE, "77"),
        (METER, "1000"),
        (PREVIOUS_COUNTER, "5000"),
        (PREVIOUS_DATE, "1.1.2024"),
        (COUNTER, "5100"),
        (DATE, "1.3.2024"),
        (CONSUMPTION, "100"),
    ])
}

fn member_a(counter: &str) -> String {
    meter_row(&[
        (NAME, "A 1"),
        (BANK_ACCOUNT, "FI21 1234 5600 0007 85"),
        (SITE, "77"),
        (METER, "1001"),
        (PREVIOUS_COUNTER, "990"),
        (PREVIOUS_DATE, "15.1.2024"),
        (COUNTER, counter),
        (DATE, "15.3.2024"),
        (CHECK, "Virtanen"),
        (CONSUMPTION, "10"),
        (REFERENCE, "123443"),
    ])
}

fn member_b() -> String {
    meter_row(&[
        (NAME, "B 2"),
        (SITE, "77"),
        (METER, "1002"),
        (PREVIOUS_COUNTER, "480"),
        (PREVIOUS_DATE, "15.1.2024"),
        (COUNTER, "500"),
        (DATE, "15.3.2024"),
        (CONSUMPTION, "20"),
        (REFERENCE, "123420"),
    ])
}

fn ledger_text(rows: &[String], parameters: &[&str]) -> String {
    let mut lines = vec![HEADER.to_string()];
    lines.extend(rows.iter().cloned());
    lines.push("###".to_string());
    lines.extend(parameters.iter().map(|p| p.to_string()));
    lines.join("\n") + "\n"
}

/// Main meter, two metered members and an unmetered sauna on a short row
fn sample() -> String {
    ledger_text(
        &[main_row(), member_a("1000"), member_b(), "Sauna".to_string()],
        &PARAMETERS,
    )
}

fn load(text: &str) -> LedgerFile {
    LedgerFile::read(text.as_bytes()).unwrap()
}

fn written(ledger: &LedgerFile) -> Vec<u8> {
    let mut out = Vec::new();
    ledger.write(&mut out).unwrap();
    out
}

fn rows(output: &[u8]) -> Vec<Vec<String>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(output)
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

fn no_readings() -> UpdateOptions {
    UpdateOptions {
        update_readings: false,
        ..UpdateOptions::default()
    }
}

// ============================================================================
// Reading
// ============================================================================

mod reading {
    use super::*;

    #[test]
    fn test_reads_units_in_ledger_order() {
        let ledger = load(&sample());
        let units = ledger.units();

        assert_eq!(units.len(), 4);
        assert_eq!(units[0].kind, UnitKind::MainMeter);
        assert!(units[1..].iter().all(|u| u.kind == UnitKind::Member));

        let a = &units[1];
        assert_eq!(a.name, "A 1");
        assert_eq!(a.meter.as_str(), "1001");
        assert_eq!(a.current.unwrap().counter, 1000);
        assert_eq!(a.consumption, Some(10));
        assert_eq!(a.reference.as_ref().unwrap().as_str(), "123443");

        assert!(!units[3].has_meter());
        assert!(units[3].reference.is_none());
    }

    #[test]
    fn test_reads_parameter_rows() {
        let ledger = load(&sample());

        assert_eq!(ledger.billing_date(), NaiveDate::from_ymd_opt(2024, 4, 1));
        assert_eq!(ledger.payment_days(), 14);
        assert_eq!(ledger.due_date(), NaiveDate::from_ymd_opt(2024, 4, 15));
        assert_eq!(ledger.message(), "Pay by the due date");
        assert_eq!(ledger.main_meter_fee().amount(), dec!(60.00));
    }

    #[test]
    fn test_monthly_fee_is_split_between_metered_members() {
        let ledger = load(&sample());
        let common = ledger.common_variables().unwrap();

        assert_eq!(ledger.metered_units(), 2);
        assert_eq!(common.monthly_fee.amount(), dec!(30.00));
        assert_eq!(common.water_price.amount(), dec!(2.50));
        assert_eq!(common.vat, BillingFixtures::vat());
    }

    #[test]
    fn test_monthly_fee_without_metered_members_is_an_error() {
        let ledger = load(&ledger_text(&[main_row(), "Sauna".to_string()], &PARAMETERS));

        assert!(matches!(
            ledger.common_variables(),
            Err(BillingError::NoEligibleMembers(_))
        ));
    }

    #[test]
    fn test_blank_billing_date_is_allowed() {
        let mut parameters = PARAMETERS;
        parameters[0] = "Billing date,";
        let ledger = load(&ledger_text(&[main_row()], &parameters));

        assert!(ledger.billing_date().is_none());
        assert!(ledger.due_date().is_none());
    }

    #[test]
    fn test_malformed_counter_reports_row_and_column() {
        let text = ledger_text(&[main_row(), member_a("1O00")], &PARAMETERS);
        let error = LedgerFile::read(text.as_bytes()).unwrap_err();

        match error {
            CsvError::Field { row, column, value, .. } => {
                assert_eq!(row, 3);
                assert_eq!(column, COUNTER + 1);
                assert_eq!(value, "1O00");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_malformed_vat_is_an_error() {
        let mut parameters = PARAMETERS;
        parameters[4] = "VAT,lots";
        let error = LedgerFile::read(ledger_text(&[main_row()], &parameters).as_bytes()).unwrap_err();

        assert!(error.is_field_error());
    }

    #[test]
    fn test_missing_rows() {
        let no_separator = [HEADER.to_string(), main_row()].join("\n");
        assert!(matches!(
            LedgerFile::read(no_separator.as_bytes()),
            Err(CsvError::MissingRow("separator"))
        ));

        let no_message = ledger_text(&[main_row()], &PARAMETERS[..5]);
        assert!(matches!(
            LedgerFile::read(no_message.as_bytes()),
            Err(CsvError::MissingRow("message"))
        ));

        assert!(matches!(
            LedgerFile::read("".as_bytes()),
            Err(CsvError::MissingRow("header"))
        ));
    }
}

// ============================================================================
// Writing
// ============================================================================

mod writing {
    use super::*;

    #[test]
    fn test_unbilled_ledger_reads_back_the_same() {
        let ledger = load(&sample());
        let reread = LedgerFile::read(written(&ledger).as_slice()).unwrap();

        assert_eq!(reread.units(), ledger.units());
        assert_eq!(reread.billing_date(), ledger.billing_date());
        assert_eq!(reread.message(), ledger.message());
    }

    #[test]
    fn test_billing_run_writes_amounts_and_references() {
        let mut ledger = load(&sample());
        BillingUpdateEngine::new(StubMeterReader::new(), no_readings())
            .update_on(&mut ledger, &[BillingFixtures::insurance()], DateFixtures::billing_date())
            .unwrap();

        let out = rows(&written(&ledger));
        assert_eq!(out[0].join(","), HEADER);

        let main = &out[1];
        assert_eq!(main[TOTAL], "");
        assert_eq!(main[REFERENCE], "");

        let a = &out[2];
        assert_eq!(a[BANK_ACCOUNT], "FI21 1234 5600 0007 85");
        assert_eq!(a[WATER_FEE_WITHOUT_TAX], "25,00");
        assert_eq!(a[WATER_TAX], "6,00");
        assert_eq!(a[WATER_FEE_WITH_TAX], "31,00");
        assert_eq!(a[MONTHS], "2");
        assert_eq!(a[BASIC_FEE_WITHOUT_TAX], "60,00");
        assert_eq!(a[BASIC_FEE_WITH_TAX], "74,40");
        assert_eq!(a[EXTRA_DESCRIPTION], "Insurance");
        assert_eq!(a[EXTRA_COST], "41,33");
        assert_eq!(a[TOTAL], "146,73");
        assert_eq!(a[REFERENCE], "123453");

        assert_eq!(out[3][TOTAL], "177,73");
        assert_eq!(out[3][REFERENCE], "123463");

        let sauna = &out[4];
        assert_eq!(sauna.len(), COLUMN_COUNT);
        assert_eq!(sauna[WATER_FEE_WITH_TAX], "");
        assert_eq!(sauna[MONTHS], "");
        assert_eq!(sauna[TOTAL], "41,33");
        assert_eq!(sauna[REFERENCE], "123473");

        assert_eq!(out[5][0], "###");
        assert_eq!(out[6], vec!["Billing date", "20.5.2024"]);
        assert_eq!(out[8][1], "60,00");
    }

    #[test]
    fn test_reading_update_rotates_counters() {
        let mut ledger = load(&sample());
        let reader = StubMeterReader::new()
            .with_reading("1000", 5200, DateFixtures::new_reading())
            .with_reading("1001", 1012, DateFixtures::new_reading())
            .with_reading("1002", 525, DateFixtures::new_reading());

        let summary = BillingUpdateEngine::new(&reader, UpdateOptions::default())
            .update_on(&mut ledger, &[], DateFixtures::billing_date())
            .unwrap();
        assert_eq!(summary.meters_read, 3);

        let out = rows(&written(&ledger));
        let main = &out[1];
        assert_eq!(main[PREVIOUS_COUNTER], "5100");
        assert_eq!(main[COUNTER], "5200");
        assert_eq!(main[CONSUMPTION], "100");
        assert_eq!(main[TOTAL], "");

        let a = &out[2];
        assert_eq!(a[PREVIOUS_COUNTER], "1000");
        assert_eq!(a[PREVIOUS_DATE], "15.3.2024");
        assert_eq!(a[COUNTER], "1012");
        assert_eq!(a[DATE], "14.5.2024");
        assert_eq!(a[CHECK], "customer-1001");
        assert_eq!(a[CONSUMPTION], "12");
        assert_eq!(a[WATER_FEE_WITH_TAX], "37,20");
        assert_eq!(a[TOTAL], "111,60");
    }

    #[test]
    fn test_unknown_trailing_columns_are_preserved() {
        let extended = format!("{},note", member_a("1000"));
        let mut ledger = load(&ledger_text(&[main_row(), extended], &PARAMETERS));
        BillingUpdateEngine::new(StubMeterReader::new(), no_readings())
            .update_on(&mut ledger, &[], DateFixtures::billing_date())
            .unwrap();

        let out = rows(&written(&ledger));
        assert_eq!(out[2].len(), COLUMN_COUNT + 1);
        assert_eq!(out[2][COLUMN_COUNT], "note");
        // the only metered member carries the whole main meter fee
        assert_eq!(out[2][BASIC_FEE_WITH_TAX], "148,80");
        assert_eq!(out[2][TOTAL], "179,80");
    }

    #[test]
    fn test_failed_run_leaves_ledger_unchanged() {
        let mut ledger = load(&sample());
        let before = written(&ledger);
        let reader = StubMeterReader::new().with_reading("1000", 5200, DateFixtures::new_reading());

        let result = BillingUpdateEngine::new(reader, UpdateOptions::default()).update_on(
            &mut ledger,
            &[],
            DateFixtures::billing_date(),
        );

        assert!(matches!(result, Err(BillingError::MeterRead { .. })));
        assert_eq!(written(&ledger), before);
    }

    #[test]
    fn test_write_to_path_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.csv");
        let mut ledger = load(&sample());
        ledger.set_billing_date(DateFixtures::billing_date());

        ledger.write_to_path(&path).unwrap();
        let reread = LedgerFile::from_path(&path).unwrap();

        assert_eq!(reread.billing_date(), Some(DateFixtures::billing_date()));
        assert_eq!(reread.units(), ledger.units());
    }
}
