#[cfg(test)]
#[path = "variable_test.rs"]
mod tests;

use std::fmt;

use chrono::NaiveDate;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use strum::EnumIter;
use strum::IntoEnumIterator;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, EnumIter, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VariableType {
    #[default]
    String,
    Number,
    Boolean,
    Date,
    Url,
}

impl VariableType {
    pub fn next(&self) -> VariableType {
        let all = VariableType::iter().collect::<Vec<VariableType>>();
        let idx = all.iter().position(|e| return e == self).unwrap();
        return all[(idx + 1) % all.len()];
    }
}

/// A typed placeholder declared by a template. `default_value` is always kept
/// as the raw string the author typed; coercion happens only when sample data
/// is generated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub name: String,
    #[serde(rename = "type")]
    pub variable_type: VariableType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl Variable {
    pub fn new(name: &str, variable_type: VariableType) -> Variable {
        return Variable {
            name: name.to_string(),
            variable_type,
            description: "".to_string(),
            required: false,
            default_value: None,
        };
    }

    pub fn with_default(mut self, default_value: &str) -> Variable {
        self.default_value = Some(default_value.to_string());
        return self;
    }
}

/// A concrete value bound to a placeholder. Display formatting is
/// locale-independent and stable so substitution stays deterministic.
#[derive(Clone, Debug, PartialEq)]
pub enum VariableValue {
    String(String),
    Number(i64),
    Boolean(bool),
    Date(NaiveDate),
    Url(String),
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            VariableValue::String(v) => write!(f, "{v}"),
            VariableValue::Number(v) => write!(f, "{v}"),
            VariableValue::Boolean(v) => write!(f, "{v}"),
            VariableValue::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            VariableValue::Url(v) => write!(f, "{v}"),
        };
    }
}

impl VariableValue {
    /// JSON form used for the server-side preview endpoint, preserving the
    /// native type where JSON has one.
    pub fn to_json(&self) -> serde_json::Value {
        return match self {
            VariableValue::String(v) => serde_json::Value::String(v.to_string()),
            VariableValue::Number(v) => serde_json::json!(v),
            VariableValue::Boolean(v) => serde_json::Value::Bool(*v),
            VariableValue::Date(_) | VariableValue::Url(_) => {
                serde_json::Value::String(self.to_string())
            }
        };
    }
}
