//! Derivation rules: how driver values turn into monthly amounts for the
//! rows they own.
//!
//! A rule is matched purely on the row's category/description. The row's
//! `is_locked` flag plays no part here; it only guards manual edits.

use std::fmt;
use std::sync::Arc;

use costgrid_common::{Category, CostItem, DriverSet, MonthlyValues, TravelTier, round_half_up};

use crate::registry::CostRegistry;

/// Monthly base salary per head before the increase is applied.
pub const BASE_PER_HEAD: f64 = 12_500.0;

/// Description that identifies the headcount-driven salary row.
pub const BASE_SALARIES: &str = "Base Salaries";

/// A formula that owns some rows of the grid.
pub trait DerivationRule: fmt::Debug + Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    fn matches(&self, item: &CostItem) -> bool;

    fn derive(&self, drivers: &DriverSet) -> MonthlyValues;
}

/// `round(BASE_PER_HEAD * (1 + salary_increase_pct / 100) * headcount)` for every month.
pub fn base_salary_run_rate(drivers: &DriverSet) -> f64 {
    let inflated_base = BASE_PER_HEAD * (1.0 + drivers.salary_increase_pct / 100.0);
    round_half_up(inflated_base * f64::from(drivers.headcount))
}

/// Flat monthly travel budget for a tier.
pub fn travel_allowance(tier: TravelTier) -> f64 {
    match tier {
        TravelTier::Low => 2_000.0,
        TravelTier::Medium => 5_000.0,
        TravelTier::High => 12_000.0,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BaseSalaryRule;

impl DerivationRule for BaseSalaryRule {
    fn name(&self) -> &'static str {
        "base-salaries"
    }

    fn matches(&self, item: &CostItem) -> bool {
        item.category == Category::Staff && item.description == BASE_SALARIES
    }

    fn derive(&self, drivers: &DriverSet) -> MonthlyValues {
        MonthlyValues::flat(base_salary_run_rate(drivers))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TravelRule;

impl DerivationRule for TravelRule {
    fn name(&self) -> &'static str {
        "travel"
    }

    fn matches(&self, item: &CostItem) -> bool {
        item.category == Category::Travel
    }

    fn derive(&self, drivers: &DriverSet) -> MonthlyValues {
        MonthlyValues::flat(travel_allowance(drivers.travel_tier))
    }
}

/// Ordered rule list. The first matching rule owns a row.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Arc<dyn DerivationRule>>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuleSet {
    /// Base salaries and travel.
    pub fn standard() -> Self {
        Self::empty().with_rule(BaseSalaryRule).with_rule(TravelRule)
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, rule: impl DerivationRule + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn rules(&self) -> &[Arc<dyn DerivationRule>] {
        &self.rules
    }

    pub fn rule_for(&self, item: &CostItem) -> Option<&Arc<dyn DerivationRule>> {
        self.rules.iter().find(|rule| rule.matches(item))
    }

    /// Recompute every rule-owned row; other rows come back untouched.
    pub fn recalculate(&self, drivers: &DriverSet, registry: &CostRegistry) -> CostRegistry {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("recalculate", rows = registry.len()).entered();

        registry.map_items(|item| match self.rule_for(item) {
            Some(rule) => {
                let monthly_values = rule.derive(drivers);
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    rule = rule.name(),
                    item = %item.id,
                    monthly = monthly_values[0],
                    "derived row"
                );
                CostItem {
                    monthly_values,
                    ..item.clone()
                }
            }
            None => item.clone(),
        })
    }
}

/// Recalculate with the standard rules.
pub fn recalculate(drivers: &DriverSet, registry: &CostRegistry) -> CostRegistry {
    RuleSet::standard().recalculate(drivers, registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_cost_items;
    use costgrid_common::{CostType, DriverUpdate};

    fn seeded() -> CostRegistry {
        CostRegistry::new(seed_cost_items())
    }

    #[test]
    fn seeded_drivers_give_known_salary() {
        let drivers = DriverSet::default();
        // 12,500 * 1.03 * 12
        assert_eq!(base_salary_run_rate(&drivers), 154_500.0);
        let out = recalculate(&drivers, &seeded());
        assert_eq!(
            out.get("c1").unwrap().monthly_values,
            MonthlyValues::flat(154_500.0)
        );
    }

    #[test]
    fn travel_tier_sets_flat_amounts() {
        for (tier, expected) in [
            (TravelTier::Low, 2_000.0),
            (TravelTier::Medium, 5_000.0),
            (TravelTier::High, 12_000.0),
        ] {
            let drivers = DriverSet::default().with(DriverUpdate::TravelTier(tier));
            let out = recalculate(&drivers, &seeded());
            assert_eq!(
                out.get("c5").unwrap().monthly_values,
                MonthlyValues::flat(expected)
            );
        }
    }

    #[test]
    fn unmatched_rows_survive_even_when_locked() {
        let drivers = DriverSet::default()
            .with(DriverUpdate::Headcount(40))
            .with(DriverUpdate::TravelTier(TravelTier::High));
        let before = seeded();
        let out = recalculate(&drivers, &before);
        for id in ["c2", "c3", "c4"] {
            assert_eq!(out.get(id), before.get(id), "row {id} changed");
        }
        assert!(out.get("c2").unwrap().is_locked);
    }

    #[test]
    fn salary_rule_needs_staff_category() {
        let item = CostItem::new(
            "x",
            Category::Office,
            "500100",
            BASE_SALARIES,
            CostType::OpEx,
            MonthlyValues::flat(1.0),
        );
        assert!(RuleSet::standard().rule_for(&item).is_none());
    }

    #[test]
    fn out_of_range_drivers_are_applied_verbatim() {
        let drivers = DriverSet::default()
            .with(DriverUpdate::Headcount(0))
            .with(DriverUpdate::SalaryIncreasePct(250.0));
        assert_eq!(base_salary_run_rate(&drivers), 0.0);
        let drivers = drivers.with(DriverUpdate::Headcount(2));
        assert_eq!(base_salary_run_rate(&drivers), 87_500.0);
    }

    #[test]
    fn empty_rule_set_is_identity() {
        let registry = seeded();
        let drivers = DriverSet::default().with(DriverUpdate::Headcount(1));
        assert_eq!(RuleSet::empty().recalculate(&drivers, &registry), registry);
    }

    #[derive(Debug)]
    struct FreezeInsurance;

    impl DerivationRule for FreezeInsurance {
        fn name(&self) -> &'static str {
            "insurance"
        }

        fn matches(&self, item: &CostItem) -> bool {
            item.description == "Health Insurance"
        }

        fn derive(&self, drivers: &DriverSet) -> MonthlyValues {
            MonthlyValues::flat(1_000.0 * f64::from(drivers.headcount))
        }
    }

    #[test]
    fn custom_rules_extend_the_standard_set() {
        let rules = RuleSet::standard().with_rule(FreezeInsurance);
        let out = rules.recalculate(&DriverSet::default(), &seeded());
        assert_eq!(
            out.get("c2").unwrap().monthly_values,
            MonthlyValues::flat(12_000.0)
        );
        assert_eq!(rules.rules().len(), 3);
    }
}
