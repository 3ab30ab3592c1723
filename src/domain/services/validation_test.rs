use super::email;
use super::generate_template_id;
use super::template_id;
use super::template_name;
use super::validate_variables;
use super::variable_name;
use crate::domain::models::Variable;
use crate::domain::models::VariableType;

#[test]
fn it_validates_template_names() {
    assert!(template_name("Welcome Email").is_none());
    assert!(template_name("").is_some());
    assert!(template_name(&"x".repeat(101)).is_some());
}

#[test]
fn it_validates_template_ids() {
    assert!(template_id("welcome-email-v2").is_none());
    assert!(template_id("ab").is_some());
    assert!(template_id(&"a".repeat(51)).is_some());
    assert!(template_id("has space").is_some());
    assert!(template_id("emoji🎉").is_some());
}

#[test]
fn it_validates_variable_names() {
    assert!(variable_name("userName").is_none());
    assert!(variable_name("_private1").is_none());
    assert!(variable_name("").is_some());
    assert!(variable_name("1leading").is_some());
    assert!(variable_name("has-dash").is_some());
    assert!(variable_name(&"v".repeat(51)).is_some());
}

#[test]
fn it_validates_email_addresses() {
    assert!(email("admin@example.com").is_none());
    assert!(email("not-an-email").is_some());
    assert!(email("a b@example.com").is_some());
}

#[test]
fn it_collects_all_variable_errors() {
    let variables = vec![
        Variable::new("userName", VariableType::String),
        Variable::new("", VariableType::String),
        Variable::new("userName", VariableType::Url),
        Variable::new("9bad", VariableType::Number),
    ];

    let errors = validate_variables(&variables);

    assert_eq!(errors.len(), 3);
    assert!(errors[0].starts_with("Variable 2:"));
    assert!(errors[1].contains("duplicate name \"userName\""));
    assert!(errors[2].starts_with("Variable 4:"));
}

#[test]
fn it_generates_template_ids_from_names() {
    assert_eq!(generate_template_id("Welcome Email v2"), "welcome-email-v2");
    assert_eq!(generate_template_id("Reset! Password?"), "reset-password");
    assert_eq!(generate_template_id(&"long name ".repeat(10)).len(), 50);
}
