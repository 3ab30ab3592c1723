use chrono::NaiveDate;

use super::VariableValue;

#[test]
fn it_formats_values_without_locale_input() {
    assert_eq!(VariableValue::String("hi".to_string()).to_string(), "hi");
    assert_eq!(VariableValue::Number(1234567).to_string(), "1234567");
    assert_eq!(VariableValue::Boolean(false).to_string(), "false");
    assert_eq!(
        VariableValue::Date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()).to_string(),
        "2024-03-09"
    );
    assert_eq!(
        VariableValue::Url("https://example.com".to_string()).to_string(),
        "https://example.com"
    );
}

#[test]
fn it_keeps_native_json_types() {
    assert_eq!(
        VariableValue::Number(42).to_json(),
        serde_json::json!(42)
    );
    assert_eq!(
        VariableValue::Boolean(true).to_json(),
        serde_json::json!(true)
    );
    assert_eq!(
        VariableValue::Date(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()).to_json(),
        serde_json::json!("2024-12-01")
    );
}
