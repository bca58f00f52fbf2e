//! Typed decoding of tool arguments.
//!
//! Each tool declares its parameters as a `Deserialize + JsonSchema` struct.
//! The schema's `required` list is checked first so that a missing or empty
//! required value is reported by name; the rest is left to serde.

use rmcp::handler::server::tool::schema_for_type;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ToolError;

/// Decode `arguments` into `P`.
pub fn parse_params<P>(arguments: JsonObject) -> Result<P, ToolError>
where
    P: DeserializeOwned + JsonSchema + 'static,
{
    let schema = schema_for_type::<P>();
    for name in required_fields(&schema) {
        if is_zero(arguments.get(name)) {
            return Err(ToolError::invalid_argument(format!(
                "missing required parameter: {name}"
            )));
        }
    }

    serde_json::from_value(Value::Object(arguments))
        .map_err(|e| ToolError::invalid_argument(format!("invalid parameters: {e}")))
}

fn required_fields(schema: &JsonObject) -> impl Iterator<Item = &str> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}

/// Absent, null, empty string and `false` all count as not provided.
fn is_zero(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Bool(b)) => !b,
        Some(_) => false,
    }
}

/// Parameters of tools that take none.
#[derive(Debug, Clone, Default, serde::Deserialize, JsonSchema)]
pub struct NoParams {}
