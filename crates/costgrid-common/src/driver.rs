//! Scalar planning assumptions ("drivers") and the single-field update
//! operation that feeds the recalculation rules.
//!
//! Values are stored exactly as given. The ranges in [`DriverKey::bounds`]
//! describe the input widgets only; nothing here clamps or rejects a value.

use std::fmt::{self, Display};
use std::str::FromStr;

use crate::ParseError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Regional travel intensity.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TravelTier {
    Low,
    #[default]
    Medium,
    High,
}

impl TravelTier {
    pub const ALL: [TravelTier; 3] = [TravelTier::Low, TravelTier::Medium, TravelTier::High];

    pub fn as_str(self) -> &'static str {
        match self {
            TravelTier::Low => "Low",
            TravelTier::Medium => "Medium",
            TravelTier::High => "High",
        }
    }
}

impl Display for TravelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelTier {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TravelTier::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::unknown("travel tier", s, "Low, Medium, High"))
    }
}

/// Names of the individual drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverKey {
    Headcount,
    SalaryIncreasePct,
    TravelTier,
    InflationRate,
    GdpGrowth,
    FxRate,
}

impl DriverKey {
    pub const ALL: [DriverKey; 6] = [
        DriverKey::Headcount,
        DriverKey::SalaryIncreasePct,
        DriverKey::TravelTier,
        DriverKey::InflationRate,
        DriverKey::GdpGrowth,
        DriverKey::FxRate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DriverKey::Headcount => "headcount",
            DriverKey::SalaryIncreasePct => "salary_increase_pct",
            DriverKey::TravelTier => "travel_tier",
            DriverKey::InflationRate => "inflation_rate",
            DriverKey::GdpGrowth => "gdp_growth",
            DriverKey::FxRate => "fx_rate",
        }
    }

    /// Inclusive widget range, when the input widget has one.
    pub fn bounds(self) -> Option<(f64, f64)> {
        match self {
            DriverKey::Headcount => Some((1.0, 50.0)),
            DriverKey::SalaryIncreasePct => Some((0.0, 10.0)),
            DriverKey::InflationRate => Some((0.0, 10.0)),
            DriverKey::GdpGrowth => Some((-2.0, 8.0)),
            DriverKey::TravelTier | DriverKey::FxRate => None,
        }
    }

    /// Widget step size.
    pub fn step(self) -> Option<f64> {
        match self {
            DriverKey::Headcount => Some(1.0),
            DriverKey::SalaryIncreasePct | DriverKey::GdpGrowth => Some(0.5),
            DriverKey::InflationRate => Some(0.1),
            DriverKey::FxRate => Some(0.01),
            DriverKey::TravelTier => None,
        }
    }
}

impl Display for DriverKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DriverKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let key = match normalized.as_str() {
            "headcount" | "fte" => DriverKey::Headcount,
            "salary_increase_pct" | "salary_increase" => DriverKey::SalaryIncreasePct,
            "travel_tier" | "travel" => DriverKey::TravelTier,
            "inflation_rate" | "inflation" => DriverKey::InflationRate,
            "gdp_growth" | "gdp" => DriverKey::GdpGrowth,
            "fx_rate" | "fx" => DriverKey::FxRate,
            _ => {
                return Err(ParseError::unknown(
                    "driver",
                    s,
                    "headcount, salary_increase_pct, travel_tier, inflation_rate, gdp_growth, fx_rate",
                ));
            }
        };
        Ok(key)
    }
}

/// A replacement value for exactly one driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriverUpdate {
    Headcount(u32),
    SalaryIncreasePct(f64),
    TravelTier(TravelTier),
    InflationRate(f64),
    GdpGrowth(f64),
    FxRate(f64),
}

impl DriverUpdate {
    pub fn key(&self) -> DriverKey {
        match self {
            DriverUpdate::Headcount(_) => DriverKey::Headcount,
            DriverUpdate::SalaryIncreasePct(_) => DriverKey::SalaryIncreasePct,
            DriverUpdate::TravelTier(_) => DriverKey::TravelTier,
            DriverUpdate::InflationRate(_) => DriverKey::InflationRate,
            DriverUpdate::GdpGrowth(_) => DriverKey::GdpGrowth,
            DriverUpdate::FxRate(_) => DriverKey::FxRate,
        }
    }

    /// Build an update for `key` from its textual value.
    pub fn parse(key: DriverKey, value: &str) -> Result<Self, ParseError> {
        let invalid = || ParseError::InvalidDriverValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        let text = value.trim();
        let number = || text.parse::<f64>().map_err(|_| invalid());
        Ok(match key {
            DriverKey::Headcount => DriverUpdate::Headcount(text.parse().map_err(|_| invalid())?),
            DriverKey::SalaryIncreasePct => DriverUpdate::SalaryIncreasePct(number()?),
            DriverKey::TravelTier => DriverUpdate::TravelTier(text.parse().map_err(|_| invalid())?),
            DriverKey::InflationRate => DriverUpdate::InflationRate(number()?),
            DriverKey::GdpGrowth => DriverUpdate::GdpGrowth(number()?),
            DriverKey::FxRate => DriverUpdate::FxRate(number()?),
        })
    }

    /// Whether the value sits outside the widget range for its key.
    pub fn is_outside_bounds(&self) -> bool {
        let value = match *self {
            DriverUpdate::Headcount(n) => f64::from(n),
            DriverUpdate::SalaryIncreasePct(v)
            | DriverUpdate::InflationRate(v)
            | DriverUpdate::GdpGrowth(v)
            | DriverUpdate::FxRate(v) => v,
            DriverUpdate::TravelTier(_) => return false,
        };
        match self.key().bounds() {
            Some((lo, hi)) => !(lo..=hi).contains(&value),
            None => false,
        }
    }
}

impl FromStr for DriverUpdate {
    type Err = ParseError;

    /// Parse `key=value`, e.g. `headcount=20` or `travel=high`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| ParseError::MalformedAssignment(s.to_string()))?;
        DriverUpdate::parse(key.parse()?, value)
    }
}

/// Current value of one driver, for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriverValue {
    Count(u32),
    Number(f64),
    Tier(TravelTier),
}

impl Display for DriverValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverValue::Count(n) => write!(f, "{n}"),
            DriverValue::Number(v) => write!(f, "{v}"),
            DriverValue::Tier(t) => write!(f, "{t}"),
        }
    }
}

/// The full set of drivers.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverSet {
    pub headcount: u32,
    pub salary_increase_pct: f64,
    pub travel_tier: TravelTier,
    pub inflation_rate: f64,
    pub gdp_growth: f64,
    /// USD to HKD peg.
    pub fx_rate: f64,
}

impl Default for DriverSet {
    fn default() -> Self {
        Self {
            headcount: 12,
            salary_increase_pct: 3.0,
            travel_tier: TravelTier::Medium,
            inflation_rate: 2.5,
            gdp_growth: 3.0,
            fx_rate: 7.8,
        }
    }
}

impl DriverSet {
    /// Replace exactly one field.
    pub fn set(&mut self, update: DriverUpdate) {
        match update {
            DriverUpdate::Headcount(v) => self.headcount = v,
            DriverUpdate::SalaryIncreasePct(v) => self.salary_increase_pct = v,
            DriverUpdate::TravelTier(v) => self.travel_tier = v,
            DriverUpdate::InflationRate(v) => self.inflation_rate = v,
            DriverUpdate::GdpGrowth(v) => self.gdp_growth = v,
            DriverUpdate::FxRate(v) => self.fx_rate = v,
        }
    }

    /// Copy with one field replaced.
    pub fn with(mut self, update: DriverUpdate) -> Self {
        self.set(update);
        self
    }

    pub fn value_of(&self, key: DriverKey) -> DriverValue {
        match key {
            DriverKey::Headcount => DriverValue::Count(self.headcount),
            DriverKey::SalaryIncreasePct => DriverValue::Number(self.salary_increase_pct),
            DriverKey::TravelTier => DriverValue::Tier(self.travel_tier),
            DriverKey::InflationRate => DriverValue::Number(self.inflation_rate),
            DriverKey::GdpGrowth => DriverValue::Number(self.gdp_growth),
            DriverKey::FxRate => DriverValue::Number(self.fx_rate),
        }
    }
}
