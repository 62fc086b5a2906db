//! Aggregate statistics over a customer's billing records.

use serde::{Deserialize, Serialize};

use debtview_core::Money;

/// Combined debt above this many currency units is "significant" (strictly greater).
pub const SIGNIFICANT_DEBT_UNITS: i64 = 500_000;
/// Average water consumption (m³) above which usage is elevated.
pub const ELEVATED_WATER_AVERAGE: f64 = 30.0;
/// Average energy consumption (kWh) above which usage is elevated.
pub const ELEVATED_ENERGY_AVERAGE: f64 = 300.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtStatistics {
    pub total_invoices: usize,
    /// Invoices in the `OVERDUE` state.
    pub overdue_count: usize,
    /// Invoices in the `PENDING` state.
    pub pending_count: usize,
    pub average_water_consumption: f64,
    pub water_debt: Money,

    pub total_energy_records: usize,
    pub average_energy_consumption: f64,
    pub energy_debt: Money,
}

impl DebtStatistics {
    pub fn has_significant_debt(&self) -> bool {
        // A total past the Money range is far above the threshold.
        match self.water_debt.plus(self.energy_debt) {
            Ok(total) => total.is_greater_than(&Money::from_units(SIGNIFICANT_DEBT_UNITS)),
            Err(_) => !self.water_debt.is_negative(),
        }
    }

    pub fn has_elevated_water_consumption(&self) -> bool {
        self.average_water_consumption > ELEVATED_WATER_AVERAGE
    }

    pub fn has_elevated_energy_consumption(&self) -> bool {
        self.average_energy_consumption > ELEVATED_ENERGY_AVERAGE
    }

    /// Share of invoices in the `OVERDUE` state, in percent, rounded to two decimals.
    pub fn overdue_ratio_percent(&self) -> f64 {
        if self.total_invoices == 0 {
            return 0.0;
        }
        let raw = self.overdue_count as f64 * 100.0 / self.total_invoices as f64;
        (raw * 100.0).round() / 100.0
    }
}

pub(crate) fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = u32>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0u64, 0u64), |(s, c), v| (s + u64::from(v), c + 1));
    if count == 0 { 0.0 } else { sum as f64 / count as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(water: &str, energy: &str) -> DebtStatistics {
        DebtStatistics {
            total_invoices: 0,
            overdue_count: 0,
            pending_count: 0,
            average_water_consumption: 0.0,
            water_debt: Money::parse(water).unwrap(),
            total_energy_records: 0,
            average_energy_consumption: 0.0,
            energy_debt: Money::parse(energy).unwrap(),
        }
    }

    #[test]
    fn significant_debt_is_strictly_above_threshold() {
        assert!(!stats("200000.00", "300000.00").has_significant_debt());
        assert!(stats("200000.00", "300000.01").has_significant_debt());
    }

    #[test]
    fn significant_debt_when_combined_total_exceeds_money_range() {
        let max = Money::max().to_string();
        assert!(stats(&max, &max).has_significant_debt());
        let min = format!("-{max}");
        assert!(!stats(&min, &min).has_significant_debt());
    }

    #[test]
    fn overdue_ratio_rounds_to_two_decimals() {
        let mut s = stats("0", "0");
        assert_eq!(s.overdue_ratio_percent(), 0.0);
        s.total_invoices = 3;
        s.overdue_count = 1;
        assert_eq!(s.overdue_ratio_percent(), 33.33);
        s.overdue_count = 2;
        assert_eq!(s.overdue_ratio_percent(), 66.67);
    }

    #[test]
    fn elevated_consumption_thresholds_are_strict() {
        let mut s = stats("0", "0");
        s.average_water_consumption = 30.0;
        s.average_energy_consumption = 300.0;
        assert!(!s.has_elevated_water_consumption());
        assert!(!s.has_elevated_energy_consumption());
        s.average_water_consumption = 30.5;
        s.average_energy_consumption = 300.1;
        assert!(s.has_elevated_water_consumption());
        assert!(s.has_elevated_energy_consumption());
    }

    #[test]
    fn mean_of_nothing_is_zero() {
        assert_eq!(mean(Vec::<u32>::new()), 0.0);
        assert_eq!(mean([10, 20, 45]), 25.0);
    }
}
