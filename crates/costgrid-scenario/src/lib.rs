//! Scenario manifests for costgrid.
//!
//! A manifest is a YAML document naming a planning scenario and, optionally,
//! its drivers, cost rows, departments and bridge steps. [`Manifest::validate`]
//! reports every problem at once as [`ManifestIssue`]s addressed by path;
//! [`Manifest::into_bundle`] turns a valid manifest into engine state.

pub mod error;
pub mod manifest;
pub mod schema;
pub mod validation;

pub use error::ScenarioError;
pub use manifest::{
    CURRENT_SPEC_VERSION, CostItemSpec, DepartmentSpec, DriversSpec, Manifest, SPEC_IDENT,
    ScenarioBundle, ScenarioMeta, WaterfallSpec,
};
pub use schema::{generate_schema_json_pretty, generate_schema_value};
pub use validation::{ManifestIssue, ValidationError};
