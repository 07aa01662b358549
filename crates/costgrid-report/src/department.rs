use std::fmt::{self, Display};
use std::str::FromStr;

use costgrid_common::{ParseError, format_millions, format_signed_pct};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Year-over-year growth above this percentage is flagged.
pub const HIGH_GROWTH_THRESHOLD_PCT: f64 = 8.0;

/// Where a department's budget sits in the approval cycle.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BudgetStatus {
    #[default]
    Draft,
    Submitted,
    Approved,
    Review,
}

impl BudgetStatus {
    pub const ALL: [BudgetStatus; 4] = [
        BudgetStatus::Draft,
        BudgetStatus::Submitted,
        BudgetStatus::Approved,
        BudgetStatus::Review,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BudgetStatus::Draft => "Draft",
            BudgetStatus::Submitted => "Submitted",
            BudgetStatus::Approved => "Approved",
            BudgetStatus::Review => "Review",
        }
    }

    /// Submitted and in-review budgets wait on an approver.
    pub fn awaits_sign_off(self) -> bool {
        matches!(self, BudgetStatus::Submitted | BudgetStatus::Review)
    }
}

impl Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BudgetStatus::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::UnknownVariant {
                kind: "budget status",
                value: s.to_string(),
                expected: "Draft, Submitted, Approved, Review",
            })
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Department {
    pub id: String,
    pub name: String,
    pub head: String,
    pub status: BudgetStatus,
    pub total_budget: f64,
    pub last_year_actuals: f64,
}

impl Department {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        head: impl Into<String>,
        status: BudgetStatus,
        total_budget: f64,
        last_year_actuals: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            head: head.into(),
            status,
            total_budget,
            last_year_actuals,
        }
    }

    /// `(total - last year) / last year * 100`; `None` without a prior year.
    pub fn yoy_change_pct(&self) -> Option<f64> {
        if self.last_year_actuals == 0.0 {
            None
        } else {
            Some((self.total_budget - self.last_year_actuals) / self.last_year_actuals * 100.0)
        }
    }

    pub fn is_high_growth(&self) -> bool {
        self.yoy_change_pct()
            .is_some_and(|pct| pct > HIGH_GROWTH_THRESHOLD_PCT)
    }

    /// Budget as shown in the status table, e.g. `$2.50M`.
    pub fn budget_label(&self) -> String {
        format_millions(self.total_budget / 1_000_000.0, 2)
    }

    /// Change as shown in the status table, e.g. `+8.7%`.
    pub fn yoy_label(&self) -> String {
        self.yoy_change_pct()
            .map(|pct| format_signed_pct(pct, 1))
            .unwrap_or_else(|| "n/a".to_string())
    }
}

/// Ordered department list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DepartmentRegistry {
    departments: Vec<Department>,
}

impl DepartmentRegistry {
    pub fn new(departments: Vec<Department>) -> Self {
        Self { departments }
    }

    pub fn seeded() -> Self {
        Self::new(seed_departments())
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    pub fn iter(&self) -> impl Iterator<Item = &Department> {
        self.departments.iter()
    }

    pub fn len(&self) -> usize {
        self.departments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.departments.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Department> {
        self.departments.iter().find(|d| d.id == id)
    }

    pub fn with_status(&self, status: BudgetStatus) -> impl Iterator<Item = &Department> {
        self.departments.iter().filter(move |d| d.status == status)
    }
}

pub fn seed_departments() -> Vec<Department> {
    vec![
        Department::new(
            "1",
            "Human Resources",
            "Alice Wong",
            BudgetStatus::Submitted,
            2_500_000.0,
            2_300_000.0,
        ),
        Department::new(
            "2",
            "Information Technology",
            "David Chen",
            BudgetStatus::Draft,
            4_200_000.0,
            3_800_000.0,
        ),
        Department::new(
            "3",
            "Marketing",
            "Sarah Lee",
            BudgetStatus::Review,
            1_800_000.0,
            1_900_000.0,
        ),
        Department::new(
            "4",
            "Supply Chain",
            "Mike Ross",
            BudgetStatus::Approved,
            3_500_000.0,
            3_200_000.0,
        ),
        Department::new(
            "5",
            "Finance Centre",
            "Jessica Su",
            BudgetStatus::Draft,
            1_200_000.0,
            1_100_000.0,
        ),
    ]
}
