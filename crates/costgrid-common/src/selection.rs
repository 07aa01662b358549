use std::fmt::{self, Display};
use std::str::FromStr;

use crate::ParseError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Planning scenario selected in the header bar.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scenario {
    #[default]
    Base,
    Best,
    Worst,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Base, Scenario::Best, Scenario::Worst];

    pub fn as_str(self) -> &'static str {
        match self {
            Scenario::Base => "Base",
            Scenario::Best => "Best",
            Scenario::Worst => "Worst",
        }
    }
}

impl Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::unknown("scenario", s, "Base, Best, Worst"))
    }
}

/// Reporting currency. Display only: amounts are never converted.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Currency {
    #[default]
    Hkd,
    Usd,
    Cny,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Hkd, Currency::Usd, Currency::Cny];

    pub fn code(self) -> &'static str {
        match self {
            Currency::Hkd => "HKD",
            Currency::Usd => "USD",
            Currency::Cny => "CNY",
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::unknown("currency", s, "HKD, USD, CNY"))
    }
}
