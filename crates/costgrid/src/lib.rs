//! Driver-based budget planning.
//!
//! Re-exports the costgrid layers so downstream users can depend on a single
//! crate, plus the plain-text renderers used by the `costgrid` binary.

pub mod render;

pub use costgrid_common as common;
pub use costgrid_engine as engine;
pub use costgrid_report as report;
pub use costgrid_scenario as scenario;

pub use costgrid_common::{
    Category, CostItem, CostType, Currency, DriverSet, DriverUpdate, MonthlyValues, Scenario,
    TravelTier,
};
pub use costgrid_engine::{
    Action, BudgetState, CostRegistry, EditOutcome, GridSummary, RuleSet, ScenarioImpact,
    WaterfallBar, WaterfallPoint,
};
pub use costgrid_report::{DashboardKpis, DepartmentRegistry};
pub use costgrid_scenario::{Manifest, ScenarioBundle};
