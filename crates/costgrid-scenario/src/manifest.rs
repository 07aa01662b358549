use std::path::Path;
use std::str::FromStr;

use costgrid_common::{
    Category, CostItem, CostType, Currency, DriverSet, DriverUpdate, MONTHS_PER_YEAR,
    MonthlyValues, Scenario, TravelTier,
};
use costgrid_engine::seed::{seed_cost_items, seed_drivers, seed_waterfall};
use costgrid_engine::{Action, BudgetState, CostRegistry, WaterfallPoint};
use costgrid_report::{
    BudgetStatus, DashboardKpis, Department, DepartmentRegistry, seed_departments,
};
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashSet;
use schemars::JsonSchema;
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::error::ScenarioError;
use crate::validation::{ManifestIssue, ValidationError};

/// Current supported manifest version.
pub const CURRENT_SPEC_VERSION: &str = "0.1.0";
/// Constant identifier for costgrid manifests.
pub const SPEC_IDENT: &str = "costgrid";

static SCENARIO_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9-]{1,62}[a-z0-9]$").expect("scenario id regex must compile")
});

static GL_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{6}$").expect("gl code regex must compile"));

/// A planning scenario: drivers, cost rows, departments and bridge steps.
///
/// Every section after `scenario` is optional and falls back to the
/// built-in planning data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Identifier for this format (must be `costgrid`).
    pub spec: String,
    /// Semantic version of the manifest format.
    pub spec_version: String,
    pub scenario: ScenarioMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drivers: Option<DriversSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_items: Option<Vec<CostItemSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departments: Option<Vec<DepartmentSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waterfall: Option<Vec<WaterfallSpec>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ScenarioMeta {
    /// Lowercase alphanumeric with hyphens, 3-64 chars.
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub scenario: Scenario,
    #[serde(default)]
    pub currency: Currency,
}

/// Driver overrides. Omitted drivers keep their default value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DriversSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headcount: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_increase_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_tier: Option<TravelTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflation_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gdp_growth: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fx_rate: Option<f64>,
}

impl DriversSpec {
    /// One update per driver present, in declaration order.
    pub fn updates(&self) -> Vec<DriverUpdate> {
        [
            self.headcount.map(DriverUpdate::Headcount),
            self.salary_increase_pct.map(DriverUpdate::SalaryIncreasePct),
            self.travel_tier.map(DriverUpdate::TravelTier),
            self.inflation_rate.map(DriverUpdate::InflationRate),
            self.gdp_growth.map(DriverUpdate::GdpGrowth),
            self.fx_rate.map(DriverUpdate::FxRate),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn numeric_fields(&self) -> [(&'static str, Option<f64>); 4] {
        [
            ("salary_increase_pct", self.salary_increase_pct),
            ("inflation_rate", self.inflation_rate),
            ("gdp_growth", self.gdp_growth),
            ("fx_rate", self.fx_rate),
        ]
    }
}

impl From<&DriverSet> for DriversSpec {
    fn from(drivers: &DriverSet) -> Self {
        Self {
            headcount: Some(drivers.headcount),
            salary_increase_pct: Some(drivers.salary_increase_pct),
            travel_tier: Some(drivers.travel_tier),
            inflation_rate: Some(drivers.inflation_rate),
            gdp_growth: Some(drivers.gdp_growth),
            fx_rate: Some(drivers.fx_rate),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CostItemSpec {
    pub id: String,
    pub category: Category,
    /// Six-digit general ledger code.
    pub gl_code: String,
    pub description: String,
    #[serde(rename = "type", default)]
    pub cost_type: CostType,
    /// January through December.
    pub monthly_values: Vec<f64>,
    #[serde(default)]
    pub locked: bool,
}

impl CostItemSpec {
    /// Only valid once `monthly_values` has been checked for length.
    fn to_cost_item(&self) -> Option<CostItem> {
        let values = MonthlyValues::try_from(self.monthly_values.clone()).ok()?;
        let item = CostItem::new(
            self.id.clone(),
            self.category,
            self.gl_code.clone(),
            self.description.clone(),
            self.cost_type,
            values,
        );
        Some(if self.locked { item.locked() } else { item })
    }
}

impl From<&CostItem> for CostItemSpec {
    fn from(item: &CostItem) -> Self {
        Self {
            id: item.id.clone(),
            category: item.category,
            gl_code: item.gl_code.clone(),
            description: item.description.clone(),
            cost_type: item.cost_type,
            monthly_values: item.monthly_values.iter().collect(),
            locked: item.is_locked,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DepartmentSpec {
    pub id: String,
    pub name: String,
    pub head: String,
    #[serde(default)]
    pub status: BudgetStatus,
    pub total_budget: f64,
    /// Zero when the department has no prior year.
    pub last_year_actuals: f64,
}

impl From<&DepartmentSpec> for Department {
    fn from(spec: &DepartmentSpec) -> Self {
        Department::new(
            spec.id.clone(),
            spec.name.clone(),
            spec.head.clone(),
            spec.status,
            spec.total_budget,
            spec.last_year_actuals,
        )
    }
}

impl From<&Department> for DepartmentSpec {
    fn from(dept: &Department) -> Self {
        Self {
            id: dept.id.clone(),
            name: dept.name.clone(),
            head: dept.head.clone(),
            status: dept.status,
            total_budget: dept.total_budget,
            last_year_actuals: dept.last_year_actuals,
        }
    }
}

/// One bridge step. `value` is a magnitude; `decrease` sets the direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct WaterfallSpec {
    pub name: String,
    pub value: f64,
    #[serde(default)]
    pub total: bool,
    #[serde(default)]
    pub decrease: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
}

impl From<&WaterfallSpec> for WaterfallPoint {
    fn from(spec: &WaterfallSpec) -> Self {
        WaterfallPoint {
            name: spec.name.clone(),
            value: spec.value,
            is_total: spec.total,
            is_decrease: spec.decrease,
            fill: spec.fill.clone(),
        }
    }
}

impl From<&WaterfallPoint> for WaterfallSpec {
    fn from(point: &WaterfallPoint) -> Self {
        Self {
            name: point.name.clone(),
            value: point.value,
            total: point.is_total,
            decrease: point.is_decrease,
            fill: point.fill.clone(),
        }
    }
}

/// Loaded scenario, ready to drive the grid and the department reports.
#[derive(Debug, Clone)]
pub struct ScenarioBundle {
    pub state: BudgetState,
    pub departments: DepartmentRegistry,
}

impl ScenarioBundle {
    pub fn seeded() -> Self {
        Self {
            state: BudgetState::seeded(),
            departments: DepartmentRegistry::seeded(),
        }
    }

    pub fn kpis(&self) -> DashboardKpis {
        DashboardKpis::compute(&self.departments, &self.state.summary())
    }
}

impl Default for ScenarioBundle {
    fn default() -> Self {
        Self::seeded()
    }
}

impl Manifest {
    /// Construct a manifest by reading YAML from any reader.
    pub fn from_yaml_reader<R: std::io::Read>(reader: R) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_reader(reader)
    }

    /// Construct a manifest from a YAML string slice.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize this manifest to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Read and parse a manifest file. Does not validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_yaml_reader(std::io::BufReader::new(file))?)
    }

    /// Manifest spelling out the built-in planning data.
    pub fn seeded() -> Self {
        Self {
            spec: SPEC_IDENT.to_string(),
            spec_version: CURRENT_SPEC_VERSION.to_string(),
            scenario: ScenarioMeta {
                id: "hr-hk-2025".to_string(),
                name: "Human Resources (HK) 2025".to_string(),
                description: None,
                scenario: Scenario::Base,
                currency: Currency::Hkd,
            },
            drivers: Some(DriversSpec::from(&seed_drivers())),
            cost_items: Some(seed_cost_items().iter().map(CostItemSpec::from).collect()),
            departments: Some(seed_departments().iter().map(DepartmentSpec::from).collect()),
            waterfall: Some(seed_waterfall().iter().map(WaterfallSpec::from).collect()),
        }
    }

    /// Validate the manifest and return granular issues when invariants fail.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.spec != SPEC_IDENT {
            issues.push(ManifestIssue::new(
                "spec",
                format!(
                    "expected spec identifier `{}`, found `{}`",
                    SPEC_IDENT, self.spec
                ),
            ));
        }

        let current_version = Version::parse(CURRENT_SPEC_VERSION)
            .expect("CURRENT_SPEC_VERSION must be valid semver");
        match Version::parse(self.spec_version.trim()) {
            Ok(version) if version.major != current_version.major => {
                issues.push(ManifestIssue::new(
                    "spec_version",
                    format!(
                        "incompatible major version `{}` (expected `{}`)",
                        version, current_version.major
                    ),
                ));
            }
            Ok(_) => {}
            Err(err) => issues.push(ManifestIssue::new(
                "spec_version",
                format!("`{}` is not a semantic version: {err}", self.spec_version),
            )),
        }

        if !SCENARIO_ID.is_match(&self.scenario.id) {
            issues.push(ManifestIssue::new(
                "scenario.id",
                "id must be lowercase alphanumeric with hyphens, 3-64 chars",
            ));
        }
        if self.scenario.name.trim().is_empty() {
            issues.push(ManifestIssue::new("scenario.name", "name must not be empty"));
        }

        if let Some(drivers) = &self.drivers {
            for (field, value) in drivers.numeric_fields() {
                if value.is_some_and(|v| !v.is_finite()) {
                    issues.push(ManifestIssue::new(
                        format!("drivers.{field}"),
                        "value must be a finite number",
                    ));
                }
            }
        }

        if let Some(items) = &self.cost_items {
            validate_cost_items(items, &mut issues);
        }
        if let Some(departments) = &self.departments {
            validate_departments(departments, &mut issues);
        }
        if let Some(points) = &self.waterfall {
            validate_waterfall(points, &mut issues);
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(issues))
        }
    }

    /// Validate, then build the engine state and department registry.
    ///
    /// The scenario and currency selections are applied as actions, so the
    /// resulting state looks exactly like one a user navigated to.
    pub fn into_bundle(&self) -> Result<ScenarioBundle, ScenarioError> {
        self.validate()?;

        let drivers = self
            .drivers
            .as_ref()
            .map(DriversSpec::updates)
            .unwrap_or_default()
            .into_iter()
            .fold(seed_drivers(), DriverSet::with);

        let items = match &self.cost_items {
            Some(specs) => specs.iter().filter_map(CostItemSpec::to_cost_item).collect(),
            None => seed_cost_items(),
        };

        let waterfall = match &self.waterfall {
            Some(specs) => specs.iter().map(WaterfallPoint::from).collect(),
            None => seed_waterfall(),
        };

        let departments = match &self.departments {
            Some(specs) => specs.iter().map(Department::from).collect(),
            None => seed_departments(),
        };

        let state = BudgetState::new(drivers, CostRegistry::new(items), waterfall).apply_all([
            Action::SelectScenario(self.scenario.scenario),
            Action::SelectCurrency(self.scenario.currency),
        ]);

        Ok(ScenarioBundle {
            state,
            departments: DepartmentRegistry::new(departments),
        })
    }
}

impl FromStr for Manifest {
    type Err = serde_yaml::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_yaml_str(s)
    }
}

fn validate_cost_items(items: &[CostItemSpec], issues: &mut Vec<ManifestIssue>) {
    let mut seen = FxHashSet::default();
    for (idx, item) in items.iter().enumerate() {
        let base = format!("cost_items[{idx}]");
        if item.id.trim().is_empty() {
            issues.push(ManifestIssue::new(format!("{base}.id"), "id must not be empty"));
        } else if !seen.insert(item.id.as_str()) {
            issues.push(ManifestIssue::new(
                format!("{base}.id"),
                format!("duplicate cost item id `{}`", item.id),
            ));
        }
        if !GL_CODE.is_match(&item.gl_code) {
            issues.push(ManifestIssue::new(
                format!("{base}.gl_code"),
                format!("GL code must be six digits, found `{}`", item.gl_code),
            ));
        }
        if item.monthly_values.len() != MONTHS_PER_YEAR {
            issues.push(ManifestIssue::new(
                format!("{base}.monthly_values"),
                format!(
                    "expected {MONTHS_PER_YEAR} monthly values, found {}",
                    item.monthly_values.len()
                ),
            ));
        }
        if let Some(month) = item.monthly_values.iter().position(|v| !v.is_finite()) {
            issues.push(ManifestIssue::new(
                format!("{base}.monthly_values[{month}]"),
                "value must be a finite number",
            ));
        }
    }
}

fn validate_departments(departments: &[DepartmentSpec], issues: &mut Vec<ManifestIssue>) {
    let mut seen = FxHashSet::default();
    for (idx, dept) in departments.iter().enumerate() {
        let base = format!("departments[{idx}]");
        if !seen.insert(dept.id.as_str()) {
            issues.push(ManifestIssue::new(
                format!("{base}.id"),
                format!("duplicate department id `{}`", dept.id),
            ));
        }
        if dept.name.trim().is_empty() {
            issues.push(ManifestIssue::new(format!("{base}.name"), "name must not be empty"));
        }
        for (field, value) in [
            ("total_budget", dept.total_budget),
            ("last_year_actuals", dept.last_year_actuals),
        ] {
            if !value.is_finite() || value < 0.0 {
                issues.push(ManifestIssue::new(
                    format!("{base}.{field}"),
                    "amount must be a finite, non-negative number",
                ));
            }
        }
    }
}

fn validate_waterfall(points: &[WaterfallSpec], issues: &mut Vec<ManifestIssue>) {
    let mut seen = FxHashSet::default();
    for (idx, point) in points.iter().enumerate() {
        let base = format!("waterfall[{idx}]");
        if !seen.insert(point.name.as_str()) {
            issues.push(ManifestIssue::new(
                format!("{base}.name"),
                format!("duplicate step name `{}`", point.name),
            ));
        }
        if !point.value.is_finite() || point.value < 0.0 {
            issues.push(ManifestIssue::new(
                format!("{base}.value"),
                "value is a magnitude and must be finite and non-negative; use `decrease` for reductions",
            ));
        }
        if point.total && point.decrease {
            issues.push(ManifestIssue::new(
                base,
                "a step cannot be both `total` and `decrease`",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_manifest_validates_and_rebuilds_seed_state() {
        let manifest = Manifest::seeded();
        manifest.validate().unwrap();
        let bundle = manifest.into_bundle().unwrap();
        let seeded = BudgetState::seeded();
        assert_eq!(bundle.state.registry(), seeded.registry());
        assert_eq!(bundle.state.drivers(), seeded.drivers());
        assert_eq!(bundle.state.waterfall(), seeded.waterfall());
        assert_eq!(bundle.departments, DepartmentRegistry::seeded());
    }

    #[test]
    fn minimal_manifest_falls_back_to_seed_data() {
        let manifest: Manifest = r#"
spec: costgrid
spec_version: "0.1.0"
scenario:
  id: minimal
  name: Minimal
"#
        .parse()
        .unwrap();
        let bundle = manifest.into_bundle().unwrap();
        assert_eq!(bundle.state.registry().len(), 5);
        assert_eq!(bundle.departments.len(), 5);
        assert_eq!(bundle.state.scenario(), Scenario::Base);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = Manifest::from_yaml_str(
            "spec: costgrid\nspec_version: \"0.1.0\"\nscenario: {id: abc, name: A}\nextra: 1\n",
        );
        assert!(err.is_err());
    }

    #[test]
    fn driver_overrides_apply_on_top_of_defaults() {
        let mut manifest = Manifest::seeded();
        manifest.drivers = Some(DriversSpec {
            headcount: Some(20),
            travel_tier: Some(TravelTier::High),
            ..DriversSpec::default()
        });
        let bundle = manifest.into_bundle().unwrap();
        let drivers = bundle.state.drivers();
        assert_eq!(drivers.headcount, 20);
        assert_eq!(drivers.salary_increase_pct, 3.0);
        assert_eq!(
            bundle.state.registry().get("c5").unwrap().monthly_values,
            MonthlyValues::flat(12_000.0)
        );
    }

    #[test]
    fn invalid_manifest_does_not_build() {
        let mut manifest = Manifest::seeded();
        manifest.spec = "fio".to_string();
        assert!(matches!(
            manifest.into_bundle(),
            Err(ScenarioError::Validation(_))
        ));
    }
}
