use costgrid_common::{DriverSet, format_fixed};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Inflation rate the current budget was built on.
pub const BASELINE_INFLATION: f64 = 2.5;
/// Budget variance, in millions, per point of inflation above baseline.
pub const VARIANCE_PER_POINT: f64 = 1.2;
/// Inflation above this puts the budget over.
pub const OVER_BUDGET_INFLATION: f64 = 3.0;

const GAUGE_PER_POINT: f64 = 20.0;

/// Rough budget impact of the global inflation assumption.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioImpact {
    pub variance_millions: f64,
    pub over_budget: bool,
    /// Fill of the impact gauge, 0..=100.
    pub gauge_pct: f64,
}

impl ScenarioImpact {
    pub fn estimate(drivers: &DriverSet) -> Self {
        let delta = drivers.inflation_rate - BASELINE_INFLATION;
        Self {
            variance_millions: delta * VARIANCE_PER_POINT,
            over_budget: drivers.inflation_rate > OVER_BUDGET_INFLATION,
            gauge_pct: (delta.abs() * GAUGE_PER_POINT).min(100.0),
        }
    }

    /// `+0.72M` when over budget, otherwise the bare signed figure.
    pub fn label(&self) -> String {
        let sign = if self.over_budget { "+" } else { "" };
        format!("{sign}{}M", format_fixed(self.variance_millions, 2))
    }
}
