use costgrid_common::{CostType, MONTHS_PER_YEAR, MonthlyValues};

use crate::registry::CostRegistry;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Read-only view of a row with its total.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RowSummary {
    pub id: String,
    pub description: String,
    pub gl_code: String,
    pub cost_type: CostType,
    pub is_locked: bool,
    pub values: MonthlyValues,
    pub total: f64,
}

/// OpEx/CapEx shares of the grand total.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpendSplit {
    pub opex: f64,
    pub capex: f64,
    pub opex_pct: f64,
    pub capex_pct: f64,
}

/// Grid snapshot with row, column and grand totals.
///
/// Built from the registry on demand; it is never stored alongside the
/// registry, so it cannot go stale.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GridSummary {
    pub rows: Vec<RowSummary>,
    pub column_totals: [f64; MONTHS_PER_YEAR],
    pub grand_total: f64,
    pub split: SpendSplit,
}

impl GridSummary {
    pub fn from_registry(registry: &CostRegistry) -> Self {
        let rows = registry
            .iter()
            .map(|item| RowSummary {
                id: item.id.clone(),
                description: item.description.clone(),
                gl_code: item.gl_code.clone(),
                cost_type: item.cost_type,
                is_locked: item.is_locked,
                values: item.monthly_values,
                total: item.total(),
            })
            .collect();
        let grand_total = registry.grand_total();
        let opex = registry.total_for_type(CostType::OpEx);
        let capex = registry.total_for_type(CostType::CapEx);
        let share = |part: f64| {
            if grand_total == 0.0 {
                0.0
            } else {
                part / grand_total * 100.0
            }
        };
        Self {
            rows,
            column_totals: registry.column_totals(),
            grand_total,
            split: SpendSplit {
                opex,
                capex,
                opex_pct: share(opex),
                capex_pct: share(capex),
            },
        }
    }
}
