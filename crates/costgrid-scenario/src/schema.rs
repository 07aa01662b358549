use serde_json::Value as JsonValue;

use crate::manifest::Manifest;

/// JSON schema describing [`Manifest`].
pub fn generate_schema_value() -> JsonValue {
    JsonValue::from(schemars::schema_for!(Manifest))
}

pub fn generate_schema_json_pretty() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&generate_schema_value())
}
