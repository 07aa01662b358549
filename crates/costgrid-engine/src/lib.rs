//! Derived-value engine for monthly cost grids.
//!
//! - [`CostRegistry`] holds the ordered cost rows and applies manual edits.
//! - [`RuleSet`] recomputes driver-owned rows as a pure function of the drivers.
//! - [`waterfall::layout`] turns bridge steps into floating-bar geometry.
//! - [`BudgetState`] ties them together behind a single `apply(action)` update.

pub mod impact;
pub mod registry;
pub mod rules;
pub mod seed;
pub mod state;
pub mod summary;
pub mod waterfall;

pub use impact::ScenarioImpact;
pub use registry::{CostRegistry, EditOutcome};
pub use rules::{
    BASE_PER_HEAD, BASE_SALARIES, BaseSalaryRule, DerivationRule, RuleSet, TravelRule,
    base_salary_run_rate, recalculate, travel_allowance,
};
pub use state::{Action, BudgetState};
pub use summary::{GridSummary, RowSummary, SpendSplit};
pub use waterfall::{Movement, WaterfallBar, WaterfallPoint};

// Re-export for convenience
pub use costgrid_common as common;
