//! Fee allocation
//!
//! Computes what one unit owes for a billing period:
//!
//! - **Fixed fee**: the per-unit share of the main meter's monthly fee times
//!   the months elapsed since the previous reading.
//! - **Consumption fee**: cubic metres consumed times the water price.
//! - **Additional costs**: the unit's even share of each shared cost, taxed
//!   at that cost's own VAT rate.
//!
//! Fixed and consumption fees apply only to units with a recorded
//! consumption; every member pays its share of the additional costs. The tax
//! of a fee is taken from its exact base, and each component total is rounded
//! to cents before the grand total is summed. The grand total is not
//! re-rounded, so small per-component drift is accepted.

use rust_decimal::Decimal;
use tracing::debug;

use core_kernel::Money;

use crate::error::BillingError;
use crate::reading::ReadingMerger;
use crate::reference::ReferenceNumber;
use crate::unit::{AdditionalCost, BillingAmounts, CommonVariables, TaxedAmount, UnitRecord};

/// Allocates the run's fees to units
#[derive(Debug, Clone)]
pub struct FeeAllocator<'a> {
    common: &'a CommonVariables,
    shares: &'a [AdditionalCost],
}

impl<'a> FeeAllocator<'a> {
    /// Divides each shared cost between `member_count` members
    ///
    /// Each share is rounded to cents on its own; the rounding residue is not
    /// redistributed. Descriptions and VAT rates are kept. The input list is
    /// not modified.
    ///
    /// # Errors
    ///
    /// Returns `NoEligibleMembers` if there are costs to divide but no members.
    pub fn per_member_share(
        costs: &[AdditionalCost],
        member_count: u32,
    ) -> Result<Vec<AdditionalCost>, BillingError> {
        if member_count == 0 && !costs.is_empty() {
            return Err(BillingError::NoEligibleMembers("additional costs"));
        }

        costs
            .iter()
            .map(|c| -> Result<AdditionalCost, BillingError> {
                Ok(AdditionalCost {
                    description: c.description.clone(),
                    cost: c.cost.share_of(member_count)?,
                    vat: c.vat,
                })
            })
            .collect()
    }

    /// Creates an allocator from run parameters and per-member cost shares
    pub fn new(common: &'a CommonVariables, shares: &'a [AdditionalCost]) -> Self {
        Self { common, shares }
    }

    /// Computes the amounts owed by `unit` without modifying it
    ///
    /// # Errors
    ///
    /// Returns `MissingReading` if the unit has a consumption but lacks the
    /// reading dates needed to count months, or a calculation error on
    /// overflow.
    pub fn allocate(&self, unit: &UnitRecord) -> Result<BillingAmounts, BillingError> {
        let mut billed_months = None;
        let mut fixed_fee = None;
        let mut consumption_fee = None;

        if let Some(consumption) = unit.consumption {
            let months = ReadingMerger::elapsed_months(unit)?.billed;

            let fixed_base = self.common.monthly_fee.checked_multiply(Decimal::from(months))?;
            let water_base = self
                .common
                .water_price
                .checked_multiply(Decimal::from(consumption))?;

            billed_months = Some(months);
            fixed_fee = Some(TaxedAmount::with_rate(fixed_base, self.common.vat));
            consumption_fee = Some(TaxedAmount::with_rate(water_base, self.common.vat));
        }

        let extra_costs: Money = self.shares.iter().map(AdditionalCost::with_tax).sum();

        let total = fixed_fee.map_or(Money::zero(), |f| f.total)
            + consumption_fee.map_or(Money::zero(), |c| c.total)
            + extra_costs;

        Ok(BillingAmounts {
            billed_months,
            fixed_fee,
            consumption_fee,
            extra_costs,
            extra_descriptions: self.shares.iter().map(|c| c.description.clone()).collect(),
            total,
        })
    }

    /// Computes the unit's amounts and stores them with its new reference
    ///
    /// The unit is only modified if the calculation succeeds.
    pub fn apply(&self, unit: &mut UnitRecord, reference: ReferenceNumber) -> Result<Money, BillingError> {
        let amounts = self.allocate(unit)?;
        let total = amounts.total;

        debug!(
            unit = %unit.name,
            reference = %reference,
            total = %total,
            "Billed unit"
        );

        unit.billing = Some(amounts);
        unit.reference = Some(reference);
        Ok(total)
    }
}
