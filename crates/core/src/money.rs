//! Monetary amounts at a fixed 2-digit scale.

use core::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// A money amount, always normalised to exactly two fractional digits
/// (rounding half-up, i.e. midpoints away from zero).
///
/// Magnitudes stay below [`Money::LIMIT_UNITS`], which keeps every amount
/// exact at scale 2. Construction and arithmetic outside that range fail with
/// [`DomainError::Validation`] instead of losing the scale or overflowing.
/// Ordering and equality are numeric.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub const SCALE: u32 = 2;
    /// Exclusive bound on the whole-unit magnitude. Any `i64` count of units
    /// or cents fits below it.
    pub const LIMIT_UNITS: u64 = 10_000_000_000_000_000_000;

    pub fn new(amount: Decimal) -> DomainResult<Self> {
        let normalized =
            amount.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        if normalized.abs() >= Decimal::from(Self::LIMIT_UNITS) {
            return Err(DomainError::validation(format!(
                "amount {amount} is outside the supported range"
            )));
        }
        Ok(Self::at_scale(normalized))
    }

    /// Largest accepted amount, `9999999999999999999.99`.
    pub fn max() -> Self {
        Self(Decimal::from_i128_with_scale(
            i128::from(Self::LIMIT_UNITS) * 100 - 1,
            Self::SCALE,
        ))
    }

    pub fn zero() -> Self {
        Self::at_scale(Decimal::ZERO)
    }

    /// Whole currency units (e.g. `Money::from_units(500_000)` is `500000.00`).
    pub fn from_units(units: i64) -> Self {
        Self::at_scale(Decimal::from(units))
    }

    /// Smallest currency unit, as used by the legacy fixed-width files.
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, Self::SCALE))
    }

    pub fn from_f64(amount: f64) -> DomainResult<Self> {
        Decimal::from_f64(amount)
            .ok_or_else(|| DomainError::validation(format!("amount {amount} is not representable")))
            .and_then(Self::new)
    }

    pub fn parse(text: &str) -> DomainResult<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("amount must not be empty"));
        }
        Decimal::from_str(trimmed)
            .map_err(|e| DomainError::validation(format!("invalid amount {text:?}: {e}")))
            .and_then(Self::new)
    }

    /// Sum of `amounts`; fails once the running total leaves the supported range.
    pub fn total<I>(amounts: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Self::zero(), |acc, amount| acc.plus(amount))
    }

    // Callers guarantee the value is within range and has at most 2 decimals.
    fn at_scale(mut value: Decimal) -> Self {
        value.rescale(Self::SCALE);
        Self(value)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn plus(self, other: Money) -> DomainResult<Money> {
        self.0
            .checked_add(other.0)
            .ok_or_else(|| DomainError::validation("amount sum overflows"))
            .and_then(Money::new)
    }

    pub fn minus(self, other: Money) -> DomainResult<Money> {
        self.0
            .checked_sub(other.0)
            .ok_or_else(|| DomainError::validation("amount difference overflows"))
            .and_then(Money::new)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn is_greater_than(&self, other: &Money) -> bool {
        self > other
    }

    pub fn is_less_than(&self, other: &Money) -> bool {
        self < other
    }

    pub fn is_equal_to(&self, other: &Money) -> bool {
        self == other
    }
}

impl ValueObject for Money {}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl TryFrom<Decimal> for Money {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
