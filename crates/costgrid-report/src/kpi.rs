use costgrid_engine::{GridSummary, SpendSplit};

use crate::department::{BudgetStatus, DepartmentRegistry};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Headline figures for the dashboard cards.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardKpis {
    pub total_budget: f64,
    pub last_year_actuals: f64,
    /// `None` when no department reports a prior year.
    pub yoy_change_pct: Option<f64>,
    pub departments: usize,
    /// Departments past `Draft`.
    pub submitted: usize,
    /// Departments waiting on an approver.
    pub approvals_due: usize,
    /// Budget held in `Review`.
    pub pending_review_amount: f64,
    /// OpEx/CapEx split of the cost grid.
    pub spend_split: SpendSplit,
}

impl DashboardKpis {
    pub fn compute(departments: &DepartmentRegistry, grid: &GridSummary) -> Self {
        let total_budget: f64 = departments.iter().map(|d| d.total_budget).sum();
        let last_year_actuals: f64 = departments.iter().map(|d| d.last_year_actuals).sum();
        let yoy_change_pct = (last_year_actuals != 0.0)
            .then(|| (total_budget - last_year_actuals) / last_year_actuals * 100.0);

        Self {
            total_budget,
            last_year_actuals,
            yoy_change_pct,
            departments: departments.len(),
            submitted: departments
                .iter()
                .filter(|d| d.status != BudgetStatus::Draft)
                .count(),
            approvals_due: departments
                .iter()
                .filter(|d| d.status.awaits_sign_off())
                .count(),
            pending_review_amount: departments
                .with_status(BudgetStatus::Review)
                .map(|d| d.total_budget)
                .sum(),
            spend_split: grid.split,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use costgrid_engine::BudgetState;

    #[test]
    fn seeded_dashboard_figures() {
        let kpis = DashboardKpis::compute(&DepartmentRegistry::seeded(), &BudgetState::seeded().summary());
        assert_eq!(kpis.total_budget, 13_200_000.0);
        assert_eq!(kpis.last_year_actuals, 12_300_000.0);
        assert_eq!(kpis.departments, 5);
        assert_eq!(kpis.submitted, 3);
        assert_eq!(kpis.approvals_due, 2);
        assert_eq!(kpis.pending_review_amount, 1_800_000.0);
        assert_eq!(kpis.spend_split.capex, 100_000.0);
        let yoy = kpis.yoy_change_pct.unwrap();
        assert!((yoy - 7.317).abs() < 1e-3);
    }

    #[test]
    fn empty_registry_has_no_yoy() {
        let kpis = DashboardKpis::compute(&DepartmentRegistry::default(), &BudgetState::seeded().summary());
        assert_eq!(kpis.yoy_change_pct, None);
        assert_eq!(kpis.approvals_due, 0);
    }
}
