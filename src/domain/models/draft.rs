use chrono::Utc;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::AppEntry;
use super::TemplateType;
use super::Variable;

/// Partial snapshot of an in-progress edit. Every field is optional so a
/// draft written by an older build still deserializes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftData {
    pub template_id: Option<String>,
    #[serde(rename = "type")]
    pub template_type: Option<TemplateType>,
    pub name: Option<String>,
    pub app_entry: Option<AppEntry>,
    pub from: Option<String>,
    pub subject: Option<String>,
    pub html_content: Option<String>,
    pub text_content: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub variables: Vec<Variable>,
}

impl DraftData {
    pub fn is_empty(&self) -> bool {
        return self.template_id.is_none()
            && self.template_type.is_none()
            && self.name.is_none()
            && self.app_entry.is_none()
            && self.from.is_none()
            && self.subject.is_none()
            && self.html_content.is_none()
            && self.text_content.is_none()
            && self.description.is_none()
            && self.version.is_none()
            && self.author.is_none()
            && self.tags.is_empty()
            && self.variables.is_empty();
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    pub timestamp: i64,
    pub is_new_template: bool,
}

impl DraftMetadata {
    pub fn new(template_id: Option<&str>) -> DraftMetadata {
        return DraftMetadata {
            template_id: template_id.map(|id| return id.to_string()),
            timestamp: Utc::now().timestamp_millis(),
            is_new_template: template_id.is_none(),
        };
    }
}
