//! Application state and its single update function.
//!
//! `BudgetState` is treated as a value: [`BudgetState::apply`] takes the
//! current state and an [`Action`] and returns the next state. Driver
//! changes re-run the derivation rules before the new state is handed back,
//! so derived rows are never observed out of date.

use costgrid_common::{Currency, DriverSet, DriverUpdate, Scenario};

use crate::impact::ScenarioImpact;
use crate::registry::{CostRegistry, EditOutcome};
use crate::rules::RuleSet;
use crate::seed::{seed_cost_items, seed_drivers, seed_waterfall};
use crate::summary::GridSummary;
use crate::waterfall::{WaterfallBar, WaterfallPoint, layout};

/// Everything a user can do to the planning state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetDriver(DriverUpdate),
    EditCell {
        item_id: String,
        month: usize,
        raw: String,
    },
    SelectScenario(Scenario),
    SelectCurrency(Currency),
    /// Restore the baseline rows and re-derive them from the current drivers.
    ResetGrid,
}

impl Action {
    pub fn edit_cell(item_id: impl Into<String>, month: usize, raw: impl Into<String>) -> Self {
        Action::EditCell {
            item_id: item_id.into(),
            month,
            raw: raw.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BudgetState {
    drivers: DriverSet,
    registry: CostRegistry,
    baseline: CostRegistry,
    rules: RuleSet,
    waterfall: Vec<WaterfallPoint>,
    scenario: Scenario,
    currency: Currency,
}

impl Default for BudgetState {
    fn default() -> Self {
        Self::seeded()
    }
}

impl BudgetState {
    /// Build a state and run the standard rules once, so derived rows
    /// reflect `drivers` from the start.
    pub fn new(drivers: DriverSet, registry: CostRegistry, waterfall: Vec<WaterfallPoint>) -> Self {
        Self::with_rules(drivers, registry, waterfall, RuleSet::standard())
    }

    pub fn with_rules(
        drivers: DriverSet,
        registry: CostRegistry,
        waterfall: Vec<WaterfallPoint>,
        rules: RuleSet,
    ) -> Self {
        let derived = rules.recalculate(&drivers, &registry);
        Self {
            drivers,
            registry: derived,
            baseline: registry,
            rules,
            waterfall,
            scenario: Scenario::default(),
            currency: Currency::default(),
        }
    }

    pub fn seeded() -> Self {
        Self::new(
            seed_drivers(),
            CostRegistry::new(seed_cost_items()),
            seed_waterfall(),
        )
    }

    pub fn drivers(&self) -> &DriverSet {
        &self.drivers
    }

    pub fn registry(&self) -> &CostRegistry {
        &self.registry
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn waterfall(&self) -> &[WaterfallPoint] {
        &self.waterfall
    }

    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Produce the next state. `self` is left as it was.
    pub fn apply(&self, action: Action) -> BudgetState {
        self.apply_with_outcome(action).0
    }

    /// Like [`BudgetState::apply`], also reporting what a cell edit did.
    /// The outcome is `None` for every action other than `EditCell`.
    pub fn apply_with_outcome(&self, action: Action) -> (BudgetState, Option<EditOutcome>) {
        let mut next = self.clone();
        let mut edit_outcome = None;
        match action {
            Action::SetDriver(update) => {
                #[cfg(feature = "tracing")]
                {
                    if update.is_outside_bounds() {
                        tracing::warn!(driver = %update.key(), ?update, "driver outside input range, applied as-is");
                    } else {
                        tracing::debug!(driver = %update.key(), ?update, "driver updated");
                    }
                }
                next.drivers.set(update);
                next.registry = next.rules.recalculate(&next.drivers, &next.registry);
            }
            Action::EditCell {
                item_id,
                month,
                raw,
            } => {
                let outcome = next.registry.set_cell(&item_id, month, &raw);
                #[cfg(feature = "tracing")]
                match outcome {
                    EditOutcome::Applied { previous, value } => {
                        tracing::debug!(item = %item_id, month, previous, value, "cell edited")
                    }
                    dropped => {
                        tracing::debug!(item = %item_id, month, ?dropped, "cell edit dropped")
                    }
                }
                edit_outcome = Some(outcome);
            }
            Action::SelectScenario(scenario) => next.scenario = scenario,
            Action::SelectCurrency(currency) => next.currency = currency,
            Action::ResetGrid => {
                next.registry = next.rules.recalculate(&next.drivers, &next.baseline);
            }
        }
        (next, edit_outcome)
    }

    /// Fold a sequence of actions.
    pub fn apply_all(&self, actions: impl IntoIterator<Item = Action>) -> BudgetState {
        actions
            .into_iter()
            .fold(self.clone(), |state, action| state.apply(action))
    }

    pub fn summary(&self) -> GridSummary {
        GridSummary::from_registry(&self.registry)
    }

    pub fn bridge(&self) -> Vec<WaterfallBar> {
        layout(&self.waterfall)
    }

    pub fn impact(&self) -> ScenarioImpact {
        ScenarioImpact::estimate(&self.drivers)
    }
}
