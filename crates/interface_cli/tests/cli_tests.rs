//! End-to-end tests of the command line wiring

use domain_billing::UpdateOptions;
use interface_cli::{bill, run, AppConfig, Args};
use test_utils::{BillingFixtures, StubMeterReader};

const LEDGER: &str = "\
Name,Bank account,Phone,Email,Street,Postal code,City,Property,Tenants,Resident,Joined,Left,Site,Meter,Prev counter,Prev date,Counter,Date,Check,Consumption,Water,Water VAT,Water total,Months,Basic,Basic VAT,Basic total,Extra description,Extra,Total,Reference
Main meter,,,,,,,,,,,,77,1000,5000,1.1.2024,5100,1.3.2024,,100,,,,,,,,,,,
A 1,,,,,,,,,,,,77,1001,990,15.1.2024,1000,15.3.2024,Virtanen,10,,,,,,,,,,,123443
###
Billing date,1.4.2024
Payment time,14
Main meter fee,\"30,00\"
Water price,\"2,50\"
VAT,24
Message,
";

fn no_readings() -> UpdateOptions {
    UpdateOptions {
        update_readings: false,
        ..UpdateOptions::default()
    }
}

mod billing {
    use super::*;

    #[test]
    fn test_bill_writes_updated_ledger() {
        let mut output = Vec::new();
        let summary = bill(
            StubMeterReader::new(),
            no_readings(),
            &[BillingFixtures::insurance()],
            LEDGER.as_bytes(),
            &mut output,
        )
        .unwrap();

        let text = String::from_utf8(output).unwrap();
        assert_eq!(summary.units_billed, 1);
        assert_eq!(summary.first_reference.unwrap().as_str(), "123453");
        // 74,40 fixed + 31,00 water + 124,00 insurance
        assert!(text.contains(",229,40,123453") || text.contains("\"229,40\",123453"));
        assert!(text.contains("Insurance"));
    }

    #[test]
    fn test_failed_run_writes_nothing() {
        let mut output = Vec::new();
        let result = bill(
            StubMeterReader::new(),
            UpdateOptions::default(),
            &[],
            LEDGER.as_bytes(),
            &mut output,
        );

        assert!(result.is_err());
        assert!(output.is_empty());
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("billing run failed"));
        assert!(message.contains("1000"));
    }

    #[test]
    fn test_malformed_ledger_is_reported() {
        let broken = LEDGER.replace("5100", "51x0");
        let result = bill(StubMeterReader::new(), no_readings(), &[], broken.as_bytes(), Vec::new());

        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("failed to read the ledger"));
        assert!(message.contains("51x0"));
    }
}

mod files {
    use super::*;

    #[test]
    fn test_run_reads_and_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ledger.csv");
        let costs = dir.path().join("costs.csv");
        let output = dir.path().join("out.csv");
        std::fs::write(&input, LEDGER).unwrap();
        std::fs::write(&costs, "description,cost,vat\nInsurance,100,24\n").unwrap();

        let args = Args {
            additional_costs: Some(costs),
            no_meter: true,
            input: Some(input),
            output: Some(output.clone()),
            ..Args::default()
        };
        let mut config = AppConfig::default();
        args.apply_to(&mut config);

        let summary = run(&args, &config).unwrap();

        assert_eq!(summary.units_billed, 1);
        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.contains("123453"));
        assert!(written.starts_with("Name,"));
    }

    #[test]
    fn test_missing_costs_file_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ledger.csv");
        let output = dir.path().join("out.csv");
        std::fs::write(&input, LEDGER).unwrap();

        let args = Args {
            additional_costs: Some(dir.path().join("missing.csv")),
            no_meter: true,
            input: Some(input),
            output: Some(output.clone()),
            ..Args::default()
        };

        let error = run(&args, &AppConfig::default()).unwrap_err();

        assert!(error.to_string().contains("failed to read additional costs"));
        assert!(!output.exists());
    }
}
