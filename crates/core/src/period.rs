//! Billing period (`YYYYMM`).

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// A monthly billing period, stored as its canonical `YYYYMM` text.
///
/// Years are constrained to `2020..=2030` and months to `1..=12`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BillingPeriod(String);

impl BillingPeriod {
    pub const MIN_YEAR: u16 = 2020;
    pub const MAX_YEAR: u16 = 2030;

    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.len() != 6 || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::validation(format!(
                "billing period must have format YYYYMM (got {value:?})"
            )));
        }

        let (year, month) = split(&value);
        if !(Self::MIN_YEAR..=Self::MAX_YEAR).contains(&year) {
            return Err(DomainError::validation(format!(
                "billing period year must be between {} and {} (got {year})",
                Self::MIN_YEAR,
                Self::MAX_YEAR
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(DomainError::validation(format!(
                "billing period month must be between 1 and 12 (got {month})"
            )));
        }

        Ok(Self(value))
    }

    pub fn year(&self) -> u16 {
        split(&self.0).0
    }

    pub fn month(&self) -> u8 {
        split(&self.0).1
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Caller guarantees six ASCII digits.
fn split(value: &str) -> (u16, u8) {
    let digits = value.as_bytes();
    let num = |range: core::ops::Range<usize>| {
        digits[range]
            .iter()
            .fold(0u16, |acc, d| acc * 10 + u16::from(d - b'0'))
    };
    (num(0..4), num(4..6) as u8)
}

impl ValueObject for BillingPeriod {}

impl core::fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BillingPeriod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for BillingPeriod {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BillingPeriod> for String {
    fn from(value: BillingPeriod) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn exposes_year_and_month() {
        let p = BillingPeriod::new("202501").unwrap();
        assert_eq!(p.year(), 2025);
        assert_eq!(p.month(), 1);
        assert_eq!(p.to_string(), "202501");
    }

    #[test]
    fn rejects_malformed_and_out_of_range_periods() {
        for bad in ["20191", "202513", "2025AB", "201912", "203101", "202500", "", "2025011"] {
            match BillingPeriod::new(bad) {
                Err(DomainError::Validation(_)) => {}
                other => panic!("expected validation error for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(BillingPeriod::new("202001").is_ok());
        assert!(BillingPeriod::new("203012").is_ok());
    }

    proptest! {
        #[test]
        fn valid_year_month_pairs_round_trip(year in 2020u16..=2030, month in 1u8..=12) {
            let text = format!("{year:04}{month:02}");
            let p = BillingPeriod::new(text.clone()).unwrap();
            prop_assert_eq!(p.year(), year);
            prop_assert_eq!(p.month(), month);
            prop_assert_eq!(p.as_str(), text.as_str());
        }
    }
}
