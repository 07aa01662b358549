use std::fmt::{self, Display};
use std::ops::Index;
use std::str::FromStr;

use chrono::Month;

use crate::ParseError;
use crate::number::order_independent_sum;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of entries in every monthly sequence (index 0 = Jan .. 11 = Dec).
pub const MONTHS_PER_YEAR: usize = 12;

/// Short English label for a zero-based month index (`0` -> `"Jan"`).
pub fn month_label(month: usize) -> Option<&'static str> {
    let number = u8::try_from(month.checked_add(1)?).ok()?;
    let month = Month::try_from(number).ok()?;
    Some(&month.name()[..3])
}

/// Resolve a month reference to a zero-based index.
///
/// Accepts English month names in any case (`mar`, `March`) or the
/// one-based month number (`3`).
pub fn parse_month(text: &str) -> Result<usize, ParseError> {
    let trimmed = text.trim();
    if let Ok(number) = trimmed.parse::<usize>() {
        return if (1..=MONTHS_PER_YEAR).contains(&number) {
            Ok(number - 1)
        } else {
            Err(ParseError::UnknownMonth(text.to_string()))
        };
    }
    trimmed
        .parse::<Month>()
        .map(|m| m.number_from_month() as usize - 1)
        .map_err(|_| ParseError::UnknownMonth(text.to_string()))
}

/// Cost line category.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Staff,
    Office,
    #[cfg_attr(feature = "serde", serde(rename = "IT"))]
    It,
    Projects,
    Travel,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Staff,
        Category::Office,
        Category::It,
        Category::Projects,
        Category::Travel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Staff => "Staff",
            Category::Office => "Office",
            Category::It => "IT",
            Category::Projects => "Projects",
            Category::Travel => "Travel",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::unknown("category", s, "Staff, Office, IT, Projects, Travel"))
    }
}

/// Accounting treatment of a cost line.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CostType {
    #[default]
    OpEx,
    CapEx,
}

impl CostType {
    pub fn as_str(self) -> &'static str {
        match self {
            CostType::OpEx => "OpEx",
            CostType::CapEx => "CapEx",
        }
    }
}

impl Display for CostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CostType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "opex" => Ok(CostType::OpEx),
            "capex" => Ok(CostType::CapEx),
            _ => Err(ParseError::unknown("cost type", s, "OpEx, CapEx")),
        }
    }
}

/// Twelve monthly amounts. The fixed array keeps the length invariant in the type.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MonthlyValues([f64; MONTHS_PER_YEAR]);

impl MonthlyValues {
    pub const fn new(values: [f64; MONTHS_PER_YEAR]) -> Self {
        Self(values)
    }

    /// Same amount in every month (a flat annual run-rate).
    pub const fn flat(value: f64) -> Self {
        Self([value; MONTHS_PER_YEAR])
    }

    pub fn get(&self, month: usize) -> Option<f64> {
        self.0.get(month).copied()
    }

    /// Replace one month. Returns `false` when `month` is out of range.
    pub fn set(&mut self, month: usize, value: f64) -> bool {
        match self.0.get_mut(month) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn as_array(&self) -> &[f64; MONTHS_PER_YEAR] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    /// Sum of the twelve months; independent of month order.
    pub fn total(&self) -> f64 {
        order_independent_sum(self.0)
    }
}

impl From<[f64; MONTHS_PER_YEAR]> for MonthlyValues {
    fn from(values: [f64; MONTHS_PER_YEAR]) -> Self {
        Self(values)
    }
}

impl TryFrom<Vec<f64>> for MonthlyValues {
    type Error = ParseError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        let found = values.len();
        <[f64; MONTHS_PER_YEAR]>::try_from(values)
            .map(Self)
            .map_err(|_| ParseError::MonthCount {
                expected: MONTHS_PER_YEAR,
                found,
            })
    }
}

impl Index<usize> for MonthlyValues {
    type Output = f64;

    fn index(&self, month: usize) -> &f64 {
        &self.0[month]
    }
}

/// One row of the monthly cost grid.
///
/// `is_locked` means "not directly user-editable". It says nothing about
/// whether a derivation rule drives the row.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CostItem {
    pub id: String,
    pub category: Category,
    pub gl_code: String,
    pub description: String,
    pub cost_type: CostType,
    pub monthly_values: MonthlyValues,
    pub is_locked: bool,
}

impl CostItem {
    pub fn new(
        id: impl Into<String>,
        category: Category,
        gl_code: impl Into<String>,
        description: impl Into<String>,
        cost_type: CostType,
        monthly_values: MonthlyValues,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            gl_code: gl_code.into(),
            description: description.into(),
            cost_type,
            monthly_values,
            is_locked: false,
        }
    }

    pub fn locked(mut self) -> Self {
        self.is_locked = true;
        self
    }

    pub fn total(&self) -> f64 {
        self.monthly_values.total()
    }
}
