#[cfg(test)]
#[path = "substitution_test.rs"]
mod tests;

use std::collections::BTreeMap;

use chrono::Datelike;
use chrono::Local;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Captures;
use regex::Regex;

use crate::domain::models::Variable;
use crate::domain::models::VariableType;
use crate::domain::models::VariableValue;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| return Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap());

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputKind {
    Html,
    Text,
}

/// Replaces every `{{ name }}` placeholder in `content` with its bound value.
/// Placeholders without a binding render as a visible marker instead of being
/// dropped or left as raw syntax.
///
/// The scan is a single pass over the original text: substituted values are
/// never re-scanned, so a value containing placeholder syntax cannot trigger
/// further expansion. Once no unresolved placeholders remain the operation is
/// idempotent.
pub fn substitute(
    content: &str,
    bindings: &BTreeMap<String, VariableValue>,
    kind: OutputKind,
) -> String {
    return PLACEHOLDER
        .replace_all(content, |caps: &Captures| {
            let name = &caps[1];
            return match bindings.get(name) {
                Some(value) => value.to_string(),
                None => unresolved_marker(name, kind),
            };
        })
        .to_string();
}

fn unresolved_marker(name: &str, kind: OutputKind) -> String {
    return match kind {
        OutputKind::Html => format!("<mark class=\"unresolved-placeholder\">[{name}]</mark>"),
        OutputKind::Text => format!("[{name}]"),
    };
}

/// Builds the binding map used during live editing. Resolution order per
/// declared variable: override value, then the raw `default_value` string
/// verbatim, then a synthesized `[name]` fallback.
pub fn resolve_bindings(
    variables: &[Variable],
    overrides: &BTreeMap<String, VariableValue>,
) -> BTreeMap<String, VariableValue> {
    let mut bindings = BTreeMap::new();

    for variable in variables {
        if let Some(value) = overrides.get(&variable.name) {
            bindings.insert(variable.name.to_string(), value.clone());
            continue;
        }

        let value = match non_empty(&variable.default_value) {
            Some(default_value) => VariableValue::String(default_value.to_string()),
            None => VariableValue::String(format!("[{}]", variable.name)),
        };
        bindings.insert(variable.name.to_string(), value);
    }

    return bindings;
}

/// Generates typed sample data for previews. Defaults are coerced per the
/// variable's declared type with stable, locale-independent fallbacks.
pub fn sample_bindings(variables: &[Variable]) -> BTreeMap<String, VariableValue> {
    let mut bindings = BTreeMap::new();

    for variable in variables {
        let default_value = non_empty(&variable.default_value);
        let value = match variable.variable_type {
            VariableType::String => match default_value {
                Some(v) => VariableValue::String(v.to_string()),
                None => VariableValue::String(format!("Sample {}", variable.name)),
            },
            VariableType::Number => VariableValue::Number(
                default_value
                    .and_then(|v| return v.parse::<i64>().ok())
                    .unwrap_or(123),
            ),
            VariableType::Boolean => VariableValue::Boolean(
                default_value
                    .and_then(|v| return v.parse::<bool>().ok())
                    .unwrap_or(true),
            ),
            VariableType::Date => VariableValue::Date(
                default_value
                    .and_then(|v| return NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
                    .unwrap_or_else(|| return Local::now().date_naive()),
            ),
            VariableType::Url => match default_value {
                Some(v) => VariableValue::Url(v.to_string()),
                None => VariableValue::Url("https://example.com".to_string()),
            },
        };

        bindings.insert(variable.name.to_string(), value);
    }

    // Conventional variables most templates reference without declaring.
    for (name, value) in [
        (
            "recipientName",
            VariableValue::String("John Doe".to_string()),
        ),
        (
            "recipientEmail",
            VariableValue::String("john.doe@example.com".to_string()),
        ),
        (
            "currentYear",
            VariableValue::Number(i64::from(Local::now().year())),
        ),
    ] {
        bindings.entry(name.to_string()).or_insert(value);
    }

    return bindings;
}

/// Unique placeholder names in order of first appearance.
pub fn extract_variable_names(content: &str) -> Vec<String> {
    let mut names: Vec<String> = vec![];

    for caps in PLACEHOLDER.captures_iter(content) {
        let name = caps[1].to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }

    return names;
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    return value.as_deref().filter(|v| return !v.is_empty());
}
