use serde_derive::Deserialize;
use serde_derive::Serialize;
use strum::EnumIter;
use strum::EnumString;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

use super::Variable;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    EnumVariantNames,
    strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateType {
    Verification,
    Welcome,
    PasswordReset,
    Notification,
    Newsletter,
    Invoice,
    Reminder,
    Promotional,
    Transactional,
    System,
    Custom,
}

impl TemplateType {
    pub fn label(&self) -> &'static str {
        return match self {
            TemplateType::Verification => "Email Verification",
            TemplateType::Welcome => "Welcome Email",
            TemplateType::PasswordReset => "Password Reset",
            TemplateType::Notification => "Notification",
            TemplateType::Newsletter => "Newsletter",
            TemplateType::Invoice => "Invoice",
            TemplateType::Reminder => "Reminder",
            TemplateType::Promotional => "Promotional",
            TemplateType::Transactional => "Transactional",
            TemplateType::System => "System",
            TemplateType::Custom => "Custom",
        };
    }

    pub fn parse(text: &str) -> Option<TemplateType> {
        return TemplateType::iter().find(|e| return e.to_string() == text);
    }

    /// Cycles through `None -> Verification -> ... -> Custom -> None`, used by
    /// the template list filter.
    pub fn next_filter(current: Option<TemplateType>) -> Option<TemplateType> {
        let all = TemplateType::iter().collect::<Vec<TemplateType>>();
        return match current {
            None => Some(all[0]),
            Some(t) => {
                let idx = all.iter().position(|e| return *e == t).unwrap();
                if idx + 1 >= all.len() {
                    None
                } else {
                    Some(all[idx + 1])
                }
            }
        };
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    EnumVariantNames,
    strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AppEntry {
    WebApp,
    MobileApp,
    AdminPanel,
    ApiService,
    Marketing,
}

impl AppEntry {
    pub fn label(&self) -> &'static str {
        return match self {
            AppEntry::WebApp => "Web App",
            AppEntry::MobileApp => "Mobile App",
            AppEntry::AdminPanel => "Admin Panel",
            AppEntry::ApiService => "API Service",
            AppEntry::Marketing => "Marketing",
        };
    }

    pub fn parse(text: &str) -> Option<AppEntry> {
        return AppEntry::iter().find(|e| return e.to_string() == text);
    }

    pub fn next(&self) -> AppEntry {
        let all = AppEntry::iter().collect::<Vec<AppEntry>>();
        let idx = all.iter().position(|e| return e == self).unwrap();
        return all[(idx + 1) % all.len()];
    }
}

/// List-view projection of a stored template. The backend addresses templates
/// by `(type, templateId, appEntry)`, not by the opaque row `id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub template_id: String,
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    pub name: String,
    pub app_entry: AppEntry,
    pub version: String,
    pub from: String,
    #[serde(default)]
    pub user_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMetadata {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub version: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Full editable entity returned by the detail endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateData {
    pub template_id: String,
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    pub name: String,
    pub app_entry: AppEntry,
    pub from: String,
    pub metadata: TemplateMetadata,
    pub subject: String,
    pub html_content: String,
    pub text_content: String,
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequest {
    pub template_id: String,
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    pub name: String,
    pub description: String,
    pub version: String,
    pub tags: Vec<String>,
    pub author: String,
    pub subject: String,
    pub html_content: String,
    pub text_content: String,
    pub variables: Vec<Variable>,
    pub app_entry: AppEntry,
    pub from: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplateRequest {
    pub name: String,
    pub description: String,
    pub version: String,
    pub tags: Vec<String>,
    pub author: String,
    pub subject: String,
    pub html_content: String,
    pub text_content: String,
    pub variables: Vec<Variable>,
    pub app_entry: AppEntry,
    pub from: String,
}

/// Create/update/delete acknowledgement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedTemplate {
    pub template_id: String,
    #[serde(rename = "type")]
    pub template_type: TemplateType,
}

/// Server-side render of a template against caller-provided data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPreview {
    pub subject: String,
    pub html_content: String,
    pub text_content: String,
    pub from: String,
}
