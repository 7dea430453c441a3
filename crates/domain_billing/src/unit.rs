//! Billing data model
//!
//! A [`UnitRecord`] is one row of the meter ledger in typed form. Fields are
//! validated when the dataset is loaded, so the engine never re-parses text.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{MeterNumber, Money, Rate, SiteNumber};

use crate::error::BillingError;
use crate::reference::ReferenceNumber;

/// Role of a ledger row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitKind {
    /// The property's aggregate meter; read but never billed
    MainMeter,
    /// A billable member
    Member,
}

/// A counter value as stored in the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterReading {
    pub counter: i64,
    pub date: NaiveDate,
}

/// A fresh observation from the meter reading source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterReading {
    /// Counter value in cubic metres
    pub counter: i64,
    /// Date the counter was read
    pub date: NaiveDate,
    /// Customer tag shown by the reading source
    pub customer: String,
}

/// A pre-tax amount with its VAT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxedAmount {
    pub base: Money,
    pub tax: Money,
    pub total: Money,
}

impl TaxedAmount {
    /// Derives the tax from the exact base and rounds base, tax and total
    /// to cents independently
    ///
    /// The total is therefore not always the sum of the rounded base and
    /// tax: 17,142857 at 24 % gives 17,14 + 4,11 but a total of 21,26.
    pub fn with_rate(base: Money, rate: Rate) -> Self {
        let tax = rate.apply(&base);
        Self {
            base: base.round_to_cents(),
            tax: tax.round_to_cents(),
            total: (base + tax).round_to_cents(),
        }
    }
}

/// Amounts invoiced to one unit in one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingAmounts {
    /// Months the fixed fee was charged for; absent for unmetered units
    pub billed_months: Option<u32>,
    pub fixed_fee: Option<TaxedAmount>,
    pub consumption_fee: Option<TaxedAmount>,
    /// Additional costs including each cost's own VAT
    pub extra_costs: Money,
    /// Descriptions of the additional costs, in input order
    pub extra_descriptions: Vec<String>,
    pub total: Money,
}

/// One billable entity of the property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub name: String,
    pub kind: UnitKind,
    pub site: SiteNumber,
    /// Empty when the unit has no meter of its own
    pub meter: MeterNumber,
    pub previous: Option<CounterReading>,
    pub current: Option<CounterReading>,
    /// Customer tag of the latest reading
    pub observer: String,
    /// Consumption recorded for this period, in cubic metres
    pub consumption: Option<i64>,
    pub billing: Option<BillingAmounts>,
    pub reference: Option<ReferenceNumber>,
}

impl UnitRecord {
    /// Creates a unit with no readings and no billing
    pub fn new(name: impl Into<String>, kind: UnitKind) -> Self {
        Self {
            name: name.into(),
            kind,
            site: SiteNumber::default(),
            meter: MeterNumber::default(),
            previous: None,
            current: None,
            observer: String::new(),
            consumption: None,
            billing: None,
            reference: None,
        }
    }

    pub fn is_main_meter(&self) -> bool {
        self.kind == UnitKind::MainMeter
    }

    /// Returns true if the unit has its own meter to read
    pub fn has_meter(&self) -> bool {
        !self.meter.is_empty()
    }
}

/// Run-wide billing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonVariables {
    pub vat: Rate,
    /// Fixed fee per metered unit and month, without tax
    pub monthly_fee: Money,
    /// Price per cubic metre, without tax
    pub water_price: Money,
}

impl CommonVariables {
    /// Derives the per-unit monthly fee from the main meter's monthly fee
    ///
    /// # Errors
    ///
    /// Returns `NoEligibleMembers` if no unit has a meter of its own.
    pub fn from_main_meter_fee(
        vat: Rate,
        main_meter_fee: Money,
        metered_units: u32,
        water_price: Money,
    ) -> Result<Self, BillingError> {
        if metered_units == 0 {
            return Err(BillingError::NoEligibleMembers("main meter fee"));
        }

        Ok(Self {
            vat,
            monthly_fee: main_meter_fee.divide(Decimal::from(metered_units))?,
            water_price,
        })
    }
}

/// A cost shared by all members, such as insurance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalCost {
    pub description: String,
    /// Amount without tax
    pub cost: Money,
    pub vat: Rate,
}

impl AdditionalCost {
    pub fn new(description: impl Into<String>, cost: Money, vat: Rate) -> Self {
        Self {
            description: description.into(),
            cost,
            vat,
        }
    }

    /// Cost plus its own VAT, rounded to cents
    pub fn with_tax(&self) -> Money {
        (self.cost + self.vat.apply(&self.cost)).round_to_cents()
    }
}
