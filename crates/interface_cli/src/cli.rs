//! Command line arguments

use std::path::PathBuf;

use clap::Parser;

use crate::config::AppConfig;

/// Updates the water billing ledger with fresh meter readings and invoices
///
/// Reads the ledger CSV, bills every member and writes the updated ledger.
/// Nothing is written if any unit fails.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "water-billing", version)]
pub struct Args {
    /// Additional costs CSV shared by all members (description, cost, VAT %)
    #[arg(short = 'a', long = "additional-costs", value_name = "CSV")]
    pub additional_costs: Option<PathBuf>,

    /// Do not read meters; bill the consumption already in the ledger
    #[arg(long = "no-meter")]
    pub no_meter: bool,

    /// Log the run parameters
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Ledger CSV to read (default: stdin)
    #[arg(short = 'i', long, value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// Where to write the updated ledger (default: stdout)
    #[arg(short = 'o', long, value_name = "CSV")]
    pub output: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `domain_billing=debug`
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Reference number to continue from when the ledger has none
    #[arg(long, value_name = "REFERENCE")]
    pub reference_seed: Option<String>,
}

impl Args {
    /// Applies the flags on top of the configuration
    pub fn apply_to(&self, config: &mut AppConfig) {
        if self.no_meter {
            config.update_readings = false;
        }
        if self.verbose {
            config.verbose = true;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(seed) = &self.reference_seed {
            config.reference_seed = Some(seed.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_flags() {
        let args = Args::try_parse_from([
            "water-billing",
            "-a",
            "costs.csv",
            "--no-meter",
            "-v",
            "-i",
            "ledger.csv",
            "-o",
            "out.csv",
            "--log-level",
            "debug",
            "--reference-seed",
            "123443",
        ])
        .unwrap();

        assert_eq!(args.additional_costs, Some(PathBuf::from("costs.csv")));
        assert!(args.no_meter);
        assert!(args.verbose);
        assert_eq!(args.input, Some(PathBuf::from("ledger.csv")));
        assert_eq!(args.output, Some(PathBuf::from("out.csv")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_no_flags_keeps_configuration() {
        let args = Args::try_parse_from(["water-billing"]).unwrap();
        let mut config = AppConfig::default();
        args.apply_to(&mut config);

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_flags_override_configuration() {
        let args = Args::try_parse_from(["water-billing", "--no-meter", "--verbose", "--reference-seed", "42"]).unwrap();
        let mut config = AppConfig::default();
        args.apply_to(&mut config);

        assert!(!config.update_readings);
        assert!(config.verbose);
        assert_eq!(config.reference_seed.as_deref(), Some("42"));
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Args::try_parse_from(["water-billing", "--meter=false"]).is_err());
    }
}
