//! Water Billing - Command Line Binary
//!
//! # Usage
//!
//! ```bash
//! # Read meters, bill and write the updated ledger to stdout
//! water-billing -a costs.csv < ledger.csv > ledger-new.csv
//!
//! # Bill the consumption already in the ledger, without reading meters
//! water-billing --no-meter -i ledger.csv -o ledger-new.csv
//! ```
//!
//! # Environment Variables
//!
//! * `WATER_LOG_LEVEL` - Log filter when `RUST_LOG` is unset (default: info)
//! * `WATER_LOG_JSON` - Emit JSON log lines (default: false)
//! * `WATER_UPDATE_READINGS` - Read meters before billing (default: true)
//! * `WATER_VERBOSE` - Log the run parameters (default: false)
//! * `WATER_PORTAL_BASE_URL` - Consumption portal host
//! * `WATER_PORTAL_PLANT_ID`, `WATER_PORTAL_SECTOR_ID`, `WATER_PORTAL_LANGUAGE` - Login form values
//! * `WATER_HTTP_TIMEOUT_SECS` - Portal request timeout (default: 30)
//! * `WATER_REFERENCE_SEED` - Reference number to start from when the ledger has none
//!
//! Logs go to stderr; stdout carries the ledger.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use interface_cli::{run, AppConfig, Args};

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let mut config = AppConfig::from_env().context("invalid WATER_* environment variables")?;
    args.apply_to(&mut config);
    config.validate()?;

    init_tracing(&config.log_level, config.log_json);

    let summary = run(&args, &config)?;

    tracing::info!(
        billing_date = %summary.billing_date,
        units_billed = summary.units_billed,
        meters_read = summary.meters_read,
        first_reference = ?summary.first_reference.as_ref().map(ToString::to_string),
        last_reference = ?summary.last_reference.as_ref().map(ToString::to_string),
        invoiced_total = %summary.invoiced_total,
        "Ledger updated"
    );
    Ok(())
}

/// Initializes the tracing subscriber, writing to stderr
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
