//! Parameter binding and validation.
//!
//! Caller arguments arrive as an untyped JSON object. Binding checks them
//! against a [`ToolSpec`] and produces one string value per declared
//! parameter, in declaration order.

use rmcp::model::JsonObject;
use serde_json::Value;

use super::error::ToolError;
use super::spec::{ParamSpec, ToolSpec};

/// Validated parameter values for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundArguments {
    values: Vec<(&'static str, String)>,
}

impl BoundArguments {
    /// Value bound to `name`. Declared parameters are always bound, possibly
    /// to an empty string.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Bind raw caller arguments to a tool's parameters.
///
/// Fails on the first required parameter, in declaration order, that is
/// absent or not a string. Optional parameters that are absent, not strings,
/// or empty take their declared default (or stay empty without one).
pub fn bind(spec: &ToolSpec, args: &JsonObject) -> Result<BoundArguments, ToolError> {
    let mut values = Vec::with_capacity(spec.params.len());

    for param in spec.params {
        let value = bind_one(param, args.get(param.name))?;
        values.push((param.name, value));
    }

    Ok(BoundArguments { values })
}

fn bind_one(param: &ParamSpec, raw: Option<&Value>) -> Result<String, ToolError> {
    let supplied = raw.and_then(Value::as_str);

    let value = if param.required {
        supplied
            .ok_or(ToolError::MissingParameter(param.name))?
            .to_string()
    } else {
        match (supplied, param.default) {
            (Some(v), _) if !v.is_empty() => v.to_string(),
            (_, Some(default)) => default.to_string(),
            (_, None) => String::new(),
        }
    };

    if !param.allowed.is_empty() && !param.allowed.contains(&value.as_str()) {
        return Err(ToolError::invalid_value(param.name, value, param.allowed));
    }

    Ok(value)
}
