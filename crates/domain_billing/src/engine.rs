//! The billing update run
//!
//! [`BillingUpdateEngine::update`] performs one complete, single-threaded
//! pass over a dataset. Work happens on a copy of the unit records; the
//! dataset only receives them once every unit has been read and billed, so a
//! failed run leaves it exactly as it was loaded.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use core_kernel::Money;

use crate::allocation::FeeAllocator;
use crate::error::BillingError;
use crate::ports::{BillingDataset, MeterReader};
use crate::reading::ReadingMerger;
use crate::reference::ReferenceNumber;
use crate::unit::{AdditionalCost, UnitRecord};

/// Options controlling a billing run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Read every metered unit's counter before billing
    pub update_readings: bool,
    /// Log the run parameters at info level instead of debug
    pub verbose: bool,
    /// Where to start the reference sequence when no unit has one yet
    pub reference_seed: Option<ReferenceNumber>,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            update_readings: true,
            verbose: false,
            reference_seed: None,
        }
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub billing_date: NaiveDate,
    pub meters_read: usize,
    pub units_billed: usize,
    pub first_reference: Option<ReferenceNumber>,
    pub last_reference: Option<ReferenceNumber>,
    /// Sum of the grand totals of all billed units
    pub invoiced_total: Money,
}

/// Orchestrates reading merge, fee allocation and reference assignment
pub struct BillingUpdateEngine<R> {
    reader: R,
    options: UpdateOptions,
}

impl<R: MeterReader> BillingUpdateEngine<R> {
    pub fn new(reader: R, options: UpdateOptions) -> Self {
        Self { reader, options }
    }

    pub fn options(&self) -> &UpdateOptions {
        &self.options
    }

    /// Bills the dataset as of today
    pub fn update<D>(
        &self,
        dataset: &mut D,
        additional_costs: &[AdditionalCost],
    ) -> Result<RunSummary, BillingError>
    where
        D: BillingDataset + ?Sized,
    {
        self.update_on(dataset, additional_costs, Local::now().date_naive())
    }

    /// Bills the dataset and stamps it with `billing_date`
    ///
    /// # Errors
    ///
    /// Any failure aborts the whole run and the dataset is not modified:
    /// - `MeterRead` if the reading source fails for a unit
    /// - `Unit` wrapping a missing reading or calculation error
    /// - `NoEligibleMembers` if additional costs exist but nobody shares them
    /// - `NoReferenceSeed` if there is no reference number to continue from
    pub fn update_on<D>(
        &self,
        dataset: &mut D,
        additional_costs: &[AdditionalCost],
        billing_date: NaiveDate,
    ) -> Result<RunSummary, BillingError>
    where
        D: BillingDataset + ?Sized,
    {
        let common = dataset.common_variables()?;
        let mut units: Vec<UnitRecord> = dataset.units().to_vec();

        let mut last_reference = highest_reference(&units).or_else(|| self.options.reference_seed.clone());

        let member_count = units.iter().filter(|u| !u.is_main_meter()).count() as u32;
        let shares = FeeAllocator::per_member_share(additional_costs, member_count)?;
        let allocator = FeeAllocator::new(&common, &shares);

        self.log_parameters(|| {
            format!(
                "vat={} monthly_fee={} water_price={} members={} shares={:?} last_reference={}",
                common.vat,
                common.monthly_fee,
                common.water_price,
                member_count,
                shares
                    .iter()
                    .map(|s| format!("{} {} (VAT {})", s.description, s.cost, s.vat))
                    .collect::<Vec<_>>(),
                last_reference.as_ref().map_or("-".to_string(), ToString::to_string),
            )
        });

        let mut summary = RunSummary {
            billing_date,
            meters_read: 0,
            units_billed: 0,
            first_reference: None,
            last_reference: None,
            invoiced_total: Money::zero(),
        };

        for unit in units.iter_mut() {
            if self.options.update_readings && unit.has_meter() {
                info!(unit = %unit.name, meter = %unit.meter, "Reading meter");

                let reading = self
                    .reader
                    .read_meter(&unit.site, &unit.meter)
                    .map_err(|source| BillingError::MeterRead {
                        unit: unit.name.clone(),
                        meter: unit.meter.clone(),
                        source,
                    })?;

                ReadingMerger::merge(unit, &reading).map_err(|e| e.for_unit(&unit.name))?;
                summary.meters_read += 1;
            }

            if unit.is_main_meter() {
                continue;
            }

            let reference = match &last_reference {
                Some(previous) => previous.next().map_err(|e| e.for_unit(&unit.name))?,
                None => return Err(BillingError::NoReferenceSeed),
            };

            let total = allocator
                .apply(unit, reference.clone())
                .map_err(|e| e.for_unit(&unit.name))?;

            summary.units_billed += 1;
            summary.invoiced_total += total;
            if summary.first_reference.is_none() {
                summary.first_reference = Some(reference.clone());
            }
            summary.last_reference = Some(reference.clone());
            last_reference = Some(reference);
        }

        dataset.replace_units(units);
        dataset.set_billing_date(billing_date);

        info!(
            billing_date = %billing_date,
            meters_read = summary.meters_read,
            units_billed = summary.units_billed,
            invoiced_total = %summary.invoiced_total,
            "Billing run complete"
        );

        Ok(summary)
    }

    fn log_parameters(&self, describe: impl FnOnce() -> String) {
        if self.options.verbose {
            info!(parameters = %describe(), "Billing run parameters");
        } else {
            debug!(parameters = %describe(), "Billing run parameters");
        }
    }
}

/// Highest reference number carried by any unit
fn highest_reference(units: &[UnitRecord]) -> Option<ReferenceNumber> {
    units.iter().filter_map(|u| u.reference.clone()).max()
}
