#[cfg(test)]
#[path = "validation_test.rs"]
mod tests;

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::models::Variable;

static TEMPLATE_ID: Lazy<Regex> = Lazy::new(|| return Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());
static VARIABLE_NAME: Lazy<Regex> =
    Lazy::new(|| return Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());
static EMAIL: Lazy<Regex> = Lazy::new(|| return Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub fn template_name(name: &str) -> Option<String> {
    if name.is_empty() {
        return Some("Template name must not be empty".to_string());
    }
    if name.chars().count() > 100 {
        return Some("Template name must be at most 100 characters".to_string());
    }

    return None;
}

pub fn template_id(id: &str) -> Option<String> {
    if id.chars().count() < 3 {
        return Some("Template id needs at least 3 characters".to_string());
    }
    if id.chars().count() > 50 {
        return Some("Template id must be at most 50 characters".to_string());
    }
    if !TEMPLATE_ID.is_match(id) {
        return Some(
            "Template id may only contain letters, digits, underscores, and dashes".to_string(),
        );
    }

    return None;
}

pub fn variable_name(name: &str) -> Option<String> {
    if name.is_empty() {
        return Some("Variable name must not be empty".to_string());
    }
    if name.chars().count() > 50 {
        return Some("Variable name must be at most 50 characters".to_string());
    }
    if !VARIABLE_NAME.is_match(name) {
        return Some(
            "Variable name must start with a letter or underscore and may only contain letters, digits, and underscores"
                .to_string(),
        );
    }

    return None;
}

pub fn email(address: &str) -> Option<String> {
    if !EMAIL.is_match(address) {
        return Some("Enter a valid email address".to_string());
    }

    return None;
}

/// Validates a full variable list, collecting every problem instead of
/// stopping at the first. Messages are indexed from 1 to match the editor's
/// row numbering. Names must be unique within a template.
pub fn validate_variables(variables: &[Variable]) -> Vec<String> {
    let mut errors: Vec<String> = vec![];
    let mut seen: HashSet<&str> = HashSet::new();

    for (idx, variable) in variables.iter().enumerate() {
        if let Some(err) = variable_name(&variable.name) {
            errors.push(format!("Variable {}: {err}", idx + 1));
        } else if !seen.insert(variable.name.as_str()) {
            errors.push(format!(
                "Variable {}: duplicate name \"{}\"",
                idx + 1,
                variable.name
            ));
        }
    }

    return errors;
}

/// Derives a template id from a display name: lowercased, spaces become
/// dashes, anything outside the id charset is dropped, capped at 50 chars.
pub fn generate_template_id(name: &str) -> String {
    return name
        .to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| return c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_')
        .take(50)
        .collect();
}
