use super::EditorField;
use super::EditorForm;
use crate::domain::models::AppEntry;
use crate::domain::models::DraftData;
use crate::domain::models::TemplateData;
use crate::domain::models::TemplateMetadata;
use crate::domain::models::TemplateType;
use crate::domain::models::Variable;
use crate::domain::models::VariableType;

fn welcome_template() -> TemplateData {
    return TemplateData {
        template_id: "welcome-v1".to_string(),
        template_type: TemplateType::Welcome,
        name: "Welcome Email".to_string(),
        app_entry: AppEntry::WebApp,
        from: "noreply@example.com".to_string(),
        metadata: TemplateMetadata {
            id: "meta-1".to_string(),
            name: "Welcome Email".to_string(),
            description: "Sent after signup".to_string(),
            version: "2.1.0".to_string(),
            author: "Ada".to_string(),
            tags: vec!["onboarding".to_string(), "transactional".to_string()],
        },
        subject: "Welcome {{userName}}!".to_string(),
        html_content: "<p>Hello {{userName}}</p>".to_string(),
        text_content: "Hello {{userName}}".to_string(),
        variables: vec![Variable::new("userName", VariableType::String)],
        user_id: None,
    };
}

#[test]
fn it_round_trips_a_template_through_the_form() {
    let form = EditorForm::from_template(&welcome_template());

    assert!(!form.is_new());
    assert_eq!(
        form.existing(),
        Some((TemplateType::Welcome, "welcome-v1".to_string()))
    );
    assert_eq!(form.tags, "onboarding, transactional");

    let request = form.build_update_request();
    assert_eq!(request.name, "Welcome Email");
    assert_eq!(request.version, "2.1.0");
    assert_eq!(
        request.tags,
        vec!["onboarding".to_string(), "transactional".to_string()]
    );
    assert_eq!(request.variables.len(), 1);
}

#[test]
fn it_derives_a_template_id_from_the_name() {
    let mut form = EditorForm::default();
    form.name = "Order Confirmation v2".to_string();

    form.derive_template_id();
    assert_eq!(form.template_id, "order-confirmation-v2");

    // An id the author already picked stays untouched.
    form.name = "Renamed".to_string();
    form.derive_template_id();
    assert_eq!(form.template_id, "order-confirmation-v2");
}

#[test]
fn it_overlays_only_the_fields_a_draft_carries() {
    let mut form = EditorForm::from_template(&welcome_template());

    form.apply_draft(&DraftData {
        subject: Some("Welcome aboard {{userName}}!".to_string()),
        version: Some("2.2.0".to_string()),
        ..DraftData::default()
    });

    assert_eq!(form.subject, "Welcome aboard {{userName}}!");
    assert_eq!(form.version, "2.2.0");
    assert_eq!(form.name, "Welcome Email");
    assert_eq!(form.html_content, "<p>Hello {{userName}}</p>");
}

#[test]
fn it_collects_every_validation_failure() {
    let mut form = EditorForm::default();
    form.name = "".to_string();
    form.template_id = "ab".to_string();
    form.from = "not-an-email".to_string();
    form.variables = vec![Variable::new("9bad", VariableType::String)];

    let err = form.validate().unwrap_err();
    assert!(err.to_string().starts_with("validation failed:"));
    assert_eq!(form.errors.len(), 4);

    form.name = "Welcome Email".to_string();
    form.template_id = "welcome-v1".to_string();
    form.from = "noreply@example.com".to_string();
    form.variables = vec![Variable::new("userName", VariableType::String)];

    assert!(form.validate().is_ok());
    assert!(form.errors.is_empty());
}

#[test]
fn it_splits_tags_on_commas_and_drops_blanks() {
    let mut form = EditorForm::default();
    form.name = "Welcome Email".to_string();
    form.template_id = "welcome-v1".to_string();
    form.tags = " onboarding , , transactional,".to_string();

    let request = form.build_create_request();
    assert_eq!(
        request.tags,
        vec!["onboarding".to_string(), "transactional".to_string()]
    );
}

#[test]
fn it_cycles_fields_in_both_directions() {
    assert_eq!(EditorField::TemplateId.next(), EditorField::Name);
    assert_eq!(EditorField::Tags.next(), EditorField::TemplateId);
    assert_eq!(EditorField::TemplateId.previous(), EditorField::Tags);
}
