use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use debtview_core::{BillingPeriod, CustomerId, EnergyQuantity, Money};

/// Read-only billed energy usage for one customer and period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyConsumptionRecord {
    customer_id: CustomerId,
    period: BillingPeriod,
    consumption: EnergyQuantity,
    amount_due: Money,
    reading_date: NaiveDate,
    /// Tariff tier code, passed through untouched.
    stratum: Option<String>,
}

impl EnergyConsumptionRecord {
    pub fn new(
        customer_id: CustomerId,
        period: BillingPeriod,
        consumption: EnergyQuantity,
        amount_due: Money,
        reading_date: NaiveDate,
        stratum: Option<String>,
    ) -> Self {
        Self {
            customer_id,
            period,
            consumption,
            amount_due,
            reading_date,
            stratum: stratum.filter(|s| !s.trim().is_empty()),
        }
    }

    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    pub fn period(&self) -> &BillingPeriod {
        &self.period
    }

    pub fn consumption(&self) -> EnergyQuantity {
        self.consumption
    }

    pub fn amount_due(&self) -> Money {
        self.amount_due
    }

    pub fn reading_date(&self) -> NaiveDate {
        self.reading_date
    }

    pub fn stratum(&self) -> Option<&str> {
        self.stratum.as_deref()
    }

    pub fn is_high_consumption(&self) -> bool {
        self.consumption.is_high()
    }

    pub fn is_low_consumption(&self) -> bool {
        self.consumption.is_low()
    }

    pub fn belongs_to_stratum(&self, stratum: &str) -> bool {
        self.stratum
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(stratum))
    }

    pub fn same_period_as(&self, other: &EnergyConsumptionRecord) -> bool {
        self.period == other.period
    }

    pub fn same_customer_as(&self, other: &EnergyConsumptionRecord) -> bool {
        self.customer_id == other.customer_id
    }
}
