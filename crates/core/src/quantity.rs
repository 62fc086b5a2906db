//! Metered consumption quantities.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// Coarse classification of a metered quantity against its service thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsumptionLevel {
    Low,
    Normal,
    High,
}

/// Water consumption in cubic meters (`0..=10_000`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct WaterQuantity(u32);

impl WaterQuantity {
    pub const MAX: u32 = 10_000;
    pub const HIGH_ABOVE: u32 = 50;
    pub const LOW_BELOW: u32 = 10;

    pub fn new(cubic_meters: i64) -> Result<Self, DomainError> {
        bounded(cubic_meters, Self::MAX, "water consumption").map(Self)
    }

    pub fn cubic_meters(&self) -> u32 {
        self.0
    }

    pub fn level(&self) -> ConsumptionLevel {
        classify(self.0, Self::LOW_BELOW, Self::HIGH_ABOVE)
    }

    pub fn is_high(&self) -> bool {
        self.level() == ConsumptionLevel::High
    }

    pub fn is_low(&self) -> bool {
        self.level() == ConsumptionLevel::Low
    }

    pub fn is_normal(&self) -> bool {
        self.level() == ConsumptionLevel::Normal
    }
}

/// Energy consumption in kilowatt-hours (`0..=100_000`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct EnergyQuantity(u32);

impl EnergyQuantity {
    pub const MAX: u32 = 100_000;
    pub const HIGH_ABOVE: u32 = 500;
    pub const LOW_BELOW: u32 = 100;

    pub fn new(kilowatt_hours: i64) -> Result<Self, DomainError> {
        bounded(kilowatt_hours, Self::MAX, "energy consumption").map(Self)
    }

    pub fn kilowatt_hours(&self) -> u32 {
        self.0
    }

    pub fn level(&self) -> ConsumptionLevel {
        classify(self.0, Self::LOW_BELOW, Self::HIGH_ABOVE)
    }

    pub fn is_high(&self) -> bool {
        self.level() == ConsumptionLevel::High
    }

    pub fn is_low(&self) -> bool {
        self.level() == ConsumptionLevel::Low
    }

    pub fn is_normal(&self) -> bool {
        self.level() == ConsumptionLevel::Normal
    }
}

fn bounded(value: i64, max: u32, what: &str) -> Result<u32, DomainError> {
    if value < 0 {
        return Err(DomainError::validation(format!("{what} must not be negative")));
    }
    if value > i64::from(max) {
        return Err(DomainError::validation(format!(
            "{what} exceeds reasonable limit of {max}"
        )));
    }
    Ok(value as u32)
}

fn classify(value: u32, low_below: u32, high_above: u32) -> ConsumptionLevel {
    if value > high_above {
        ConsumptionLevel::High
    } else if value < low_below {
        ConsumptionLevel::Low
    } else {
        ConsumptionLevel::Normal
    }
}

impl ValueObject for WaterQuantity {}
impl ValueObject for EnergyQuantity {}

impl TryFrom<i64> for WaterQuantity {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WaterQuantity> for u32 {
    fn from(value: WaterQuantity) -> Self {
        value.0
    }
}

impl TryFrom<i64> for EnergyQuantity {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EnergyQuantity> for u32 {
    fn from(value: EnergyQuantity) -> Self {
        value.0
    }
}
