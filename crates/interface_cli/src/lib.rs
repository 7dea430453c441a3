//! Water Billing Command Line Interface
//!
//! Wires the ledger file, the additional costs list and the consumption
//! portal into one billing run:
//!
//! ```text
//! ledger CSV ──► LedgerFile ──► BillingUpdateEngine ──► LedgerFile ──► ledger CSV
//!                                 ▲            ▲
//!               additional costs ─┘            └─ PortalMeterReader
//! ```
//!
//! The updated ledger is written only after the whole run succeeded, so a
//! failure never leaves a half-billed file behind.

pub mod cli;
pub mod config;

use std::fs::File;
use std::io::{self, Read, Write};

use anyhow::Context;
use tracing::info;

use domain_billing::{AdditionalCost, BillingUpdateEngine, MeterReader, RunSummary, UpdateOptions};
use infra_csv::{read_additional_costs_from_path, LedgerFile};
use infra_portal::PortalMeterReader;

pub use cli::Args;
pub use config::AppConfig;

/// Bills the ledger read from `input` and writes the result to `output`
///
/// # Errors
///
/// Fails if the ledger cannot be read, the run fails or the result cannot be
/// written. `output` receives nothing unless the run succeeded.
pub fn bill<R, I, O>(
    reader: R,
    options: UpdateOptions,
    additional_costs: &[AdditionalCost],
    input: I,
    output: O,
) -> anyhow::Result<RunSummary>
where
    R: MeterReader,
    I: Read,
    O: Write,
{
    let mut ledger = LedgerFile::read(input).context("failed to read the ledger")?;

    let summary = BillingUpdateEngine::new(reader, options)
        .update(&mut ledger, additional_costs)
        .context("billing run failed")?;

    ledger.write(output).context("failed to write the ledger")?;
    Ok(summary)
}

/// Runs the tool with parsed arguments and merged configuration
pub fn run(args: &Args, config: &AppConfig) -> anyhow::Result<RunSummary> {
    let additional_costs = match &args.additional_costs {
        Some(path) => read_additional_costs_from_path(path)
            .with_context(|| format!("failed to read additional costs from {}", path.display()))?,
        None => Vec::new(),
    };

    let options = config.update_options()?;
    let reader = PortalMeterReader::new(config.portal_config());

    info!(
        update_readings = options.update_readings,
        additional_costs = additional_costs.len(),
        "Starting billing run"
    );

    let input: Box<dyn Read> = match &args.input {
        Some(path) => Box::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        ),
        None => Box::new(io::stdin().lock()),
    };

    match &args.output {
        Some(path) => {
            // Staged in memory so the file is not truncated by a failed run
            let mut buffer = Vec::new();
            let summary = bill(reader, options, &additional_costs, input, &mut buffer)?;
            std::fs::write(path, buffer)
                .with_context(|| format!("failed to write {}", path.display()))?;
            Ok(summary)
        }
        None => bill(reader, options, &additional_costs, input, io::stdout().lock()),
    }
}
