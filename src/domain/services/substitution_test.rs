use std::collections::BTreeMap;

use chrono::Datelike;
use chrono::Local;

use super::extract_variable_names;
use super::resolve_bindings;
use super::sample_bindings;
use super::substitute;
use super::OutputKind;
use crate::domain::models::Variable;
use crate::domain::models::VariableType;
use crate::domain::models::VariableValue;

fn bindings(pairs: Vec<(&str, VariableValue)>) -> BTreeMap<String, VariableValue> {
    return pairs
        .into_iter()
        .map(|(k, v)| return (k.to_string(), v))
        .collect();
}

#[test]
fn it_substitutes_known_placeholders() {
    let b = bindings(vec![
        ("userName", VariableValue::String("Ada".to_string())),
        ("count", VariableValue::Number(3)),
    ]);

    let res = substitute("Hi {{userName}}, you have {{ count }} items.", &b, OutputKind::Text);
    assert_eq!(res, "Hi Ada, you have 3 items.");
}

#[test]
fn it_is_idempotent_once_resolved() {
    let b = bindings(vec![
        ("title", VariableValue::String("Welcome".to_string())),
        ("year", VariableValue::Number(2024)),
    ]);

    let first = substitute("<h1>{{title}}</h1><p>{{year}}</p>", &b, OutputKind::Html);
    let second = substitute(&first, &b, OutputKind::Html);
    assert_eq!(first, second);
}

#[test]
fn it_marks_unknown_placeholders_visibly() {
    let res = substitute("Hello {{foo}}!", &BTreeMap::new(), OutputKind::Html);

    assert!(res.contains("[foo]"));
    assert!(!res.contains("{{foo}}"));
    assert_eq!(
        res,
        "Hello <mark class=\"unresolved-placeholder\">[foo]</mark>!"
    );

    let text = substitute("Hello {{foo}}!", &BTreeMap::new(), OutputKind::Text);
    assert_eq!(text, "Hello [foo]!");
}

#[test]
fn it_does_not_rescan_substituted_values() {
    let b = bindings(vec![
        ("a", VariableValue::String("{{b}}".to_string())),
        ("b", VariableValue::String("X".to_string())),
    ]);

    // The value of `a` contains placeholder syntax; a recursive engine would
    // expand it to "X".
    let res = substitute("{{a}}", &b, OutputKind::Text);
    assert_eq!(res, "{{b}}");
}

#[test]
fn it_resolves_override_then_default_then_fallback() {
    let variables = vec![
        Variable::new("city", VariableType::String).with_default("Paris"),
        Variable::new("plan", VariableType::String).with_default("Basic"),
        Variable::new("slot", VariableType::String),
    ];
    let overrides = bindings(vec![("plan", VariableValue::String("Pro".to_string()))]);

    let resolved = resolve_bindings(&variables, &overrides);

    assert_eq!(
        resolved.get("city"),
        Some(&VariableValue::String("Paris".to_string()))
    );
    assert_eq!(
        resolved.get("plan"),
        Some(&VariableValue::String("Pro".to_string()))
    );
    assert_eq!(
        resolved.get("slot"),
        Some(&VariableValue::String("[slot]".to_string()))
    );
}

#[test]
fn it_generates_typed_sample_data() {
    let variables = vec![
        Variable::new("userName", VariableType::String),
        Variable::new("retries", VariableType::Number).with_default("7"),
        Variable::new("attempts", VariableType::Number).with_default("lots"),
        Variable::new("active", VariableType::Boolean).with_default("false"),
        Variable::new("signupDate", VariableType::Date).with_default("2023-06-01"),
        Variable::new("supportLink", VariableType::Url),
    ];

    let samples = sample_bindings(&variables);

    assert_eq!(
        samples.get("userName"),
        Some(&VariableValue::String("Sample userName".to_string()))
    );
    assert_eq!(samples.get("retries"), Some(&VariableValue::Number(7)));
    assert_eq!(samples.get("attempts"), Some(&VariableValue::Number(123)));
    assert_eq!(samples.get("active"), Some(&VariableValue::Boolean(false)));
    assert_eq!(samples.get("signupDate").unwrap().to_string(), "2023-06-01");
    assert_eq!(
        samples.get("supportLink"),
        Some(&VariableValue::Url("https://example.com".to_string()))
    );
}

#[test]
fn it_injects_conventional_sample_variables() {
    let samples = sample_bindings(&[]);

    assert_eq!(
        samples.get("recipientName"),
        Some(&VariableValue::String("John Doe".to_string()))
    );
    assert_eq!(
        samples.get("recipientEmail"),
        Some(&VariableValue::String("john.doe@example.com".to_string()))
    );
    assert_eq!(
        samples.get("currentYear"),
        Some(&VariableValue::Number(i64::from(Local::now().year())))
    );
}

#[test]
fn it_extracts_unique_names_in_order() {
    let res = extract_variable_names("{{b}} {{ a }} {{b}} {{_c1}} {{9bad}}");
    assert_eq!(res, vec!["b".to_string(), "a".to_string(), "_c1".to_string()]);
}
