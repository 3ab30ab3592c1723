#[cfg(test)]
#[path = "editor_test.rs"]
mod tests;

use strum::EnumIter;
use strum::IntoEnumIterator;

use super::validation;
use crate::domain::models::AppEntry;
use crate::domain::models::AppError;
use crate::domain::models::CreateTemplateRequest;
use crate::domain::models::DraftData;
use crate::domain::models::TemplateData;
use crate::domain::models::TemplateType;
use crate::domain::models::UpdateTemplateRequest;
use crate::domain::models::Variable;
use crate::domain::models::VariableType;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, strum::Display)]
pub enum EditorField {
    #[strum(serialize = "Template ID")]
    TemplateId,
    #[strum(serialize = "Name")]
    Name,
    #[strum(serialize = "From")]
    From,
    #[strum(serialize = "Subject")]
    Subject,
    #[strum(serialize = "HTML Body")]
    HtmlContent,
    #[strum(serialize = "Text Body")]
    TextContent,
    #[strum(serialize = "Description")]
    Description,
    #[strum(serialize = "Version")]
    Version,
    #[strum(serialize = "Author")]
    Author,
    #[strum(serialize = "Tags")]
    Tags,
}

impl EditorField {
    pub fn next(&self) -> EditorField {
        let all = EditorField::iter().collect::<Vec<EditorField>>();
        let idx = all.iter().position(|e| return e == self).unwrap();
        return all[(idx + 1) % all.len()];
    }

    pub fn previous(&self) -> EditorField {
        let all = EditorField::iter().collect::<Vec<EditorField>>();
        let idx = all.iter().position(|e| return e == self).unwrap();
        return all[(idx + all.len() - 1) % all.len()];
    }
}

/// Editable working copy of a template, backing the editor screen. Holds
/// plain strings for every text field so the UI can bind textareas to them,
/// and converts to the API request types on save.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorForm {
    pub template_type: TemplateType,
    pub app_entry: AppEntry,
    pub template_id: String,
    pub name: String,
    pub from: String,
    pub subject: String,
    pub html_content: String,
    pub text_content: String,
    pub description: String,
    pub version: String,
    pub author: String,
    pub tags: String,
    pub variables: Vec<Variable>,
    pub errors: Vec<String>,
    existing: Option<(TemplateType, String)>,
}

impl Default for EditorForm {
    /// Seeds a new template with a minimal working body, so the preview has
    /// something to show before the author types anything.
    fn default() -> EditorForm {
        return EditorForm {
            template_type: TemplateType::Custom,
            app_entry: AppEntry::WebApp,
            template_id: "".to_string(),
            name: "".to_string(),
            from: "".to_string(),
            subject: "{{title}}".to_string(),
            html_content: "<html><body><h1>{{title}}</h1><p>{{content}}</p></body></html>"
                .to_string(),
            text_content: "{{title}}\n\n{{content}}".to_string(),
            description: "".to_string(),
            version: "1.0.0".to_string(),
            author: "".to_string(),
            tags: "".to_string(),
            variables: vec![
                Variable::new("title", VariableType::String),
                Variable::new("content", VariableType::String),
            ],
            errors: vec![],
            existing: None,
        };
    }
}

impl EditorForm {
    pub fn from_template(template: &TemplateData) -> EditorForm {
        return EditorForm {
            template_type: template.template_type,
            app_entry: template.app_entry,
            template_id: template.template_id.to_string(),
            name: template.name.to_string(),
            from: template.from.to_string(),
            subject: template.subject.to_string(),
            html_content: template.html_content.to_string(),
            text_content: template.text_content.to_string(),
            description: template.metadata.description.to_string(),
            version: template.metadata.version.to_string(),
            author: template.metadata.author.to_string(),
            tags: template.metadata.tags.join(", "),
            variables: template.variables.clone(),
            errors: vec![],
            existing: Some((template.template_type, template.template_id.to_string())),
        };
    }

    /// The `(type, id)` address of the stored template this form edits, or
    /// None while creating a new one.
    pub fn existing(&self) -> Option<(TemplateType, String)> {
        return self.existing.clone();
    }

    pub fn is_new(&self) -> bool {
        return self.existing.is_none();
    }

    pub fn get(&self, field: EditorField) -> &str {
        return match field {
            EditorField::TemplateId => &self.template_id,
            EditorField::Name => &self.name,
            EditorField::From => &self.from,
            EditorField::Subject => &self.subject,
            EditorField::HtmlContent => &self.html_content,
            EditorField::TextContent => &self.text_content,
            EditorField::Description => &self.description,
            EditorField::Version => &self.version,
            EditorField::Author => &self.author,
            EditorField::Tags => &self.tags,
        };
    }

    /// Editing any field dismisses stale validation errors until the next
    /// save attempt.
    pub fn set(&mut self, field: EditorField, value: String) {
        self.errors.clear();
        match field {
            EditorField::TemplateId => self.template_id = value,
            EditorField::Name => self.name = value,
            EditorField::From => self.from = value,
            EditorField::Subject => self.subject = value,
            EditorField::HtmlContent => self.html_content = value,
            EditorField::TextContent => self.text_content = value,
            EditorField::Description => self.description = value,
            EditorField::Version => self.version = value,
            EditorField::Author => self.author = value,
            EditorField::Tags => self.tags = value,
        }
    }

    /// Fills in the template id from the name when the author has not picked
    /// one, matching what the create screen does on blur.
    pub fn derive_template_id(&mut self) {
        if self.template_id.is_empty() && !self.name.is_empty() {
            self.template_id = validation::generate_template_id(&self.name);
        }
    }

    /// Overlays a restored draft. Only fields present in the draft replace
    /// the form's values; the rest keep what the server sent.
    pub fn apply_draft(&mut self, draft: &DraftData) {
        if let Some(template_type) = draft.template_type {
            self.template_type = template_type;
        }
        if let Some(app_entry) = draft.app_entry {
            self.app_entry = app_entry;
        }
        if let Some(template_id) = &draft.template_id {
            self.template_id = template_id.to_string();
        }
        if let Some(name) = &draft.name {
            self.name = name.to_string();
        }
        if let Some(from) = &draft.from {
            self.from = from.to_string();
        }
        if let Some(subject) = &draft.subject {
            self.subject = subject.to_string();
        }
        if let Some(html_content) = &draft.html_content {
            self.html_content = html_content.to_string();
        }
        if let Some(text_content) = &draft.text_content {
            self.text_content = text_content.to_string();
        }
        if let Some(description) = &draft.description {
            self.description = description.to_string();
        }
        if let Some(version) = &draft.version {
            self.version = version.to_string();
        }
        if let Some(author) = &draft.author {
            self.author = author.to_string();
        }
        if !draft.tags.is_empty() {
            self.tags = draft.tags.join(", ");
        }
        if !draft.variables.is_empty() {
            self.variables = draft.variables.clone();
        }
    }

    pub fn to_draft(&self) -> DraftData {
        return DraftData {
            template_id: Some(self.template_id.to_string()),
            template_type: Some(self.template_type),
            name: Some(self.name.to_string()),
            app_entry: Some(self.app_entry),
            from: Some(self.from.to_string()),
            subject: Some(self.subject.to_string()),
            html_content: Some(self.html_content.to_string()),
            text_content: Some(self.text_content.to_string()),
            description: Some(self.description.to_string()),
            version: Some(self.version.to_string()),
            author: Some(self.author.to_string()),
            tags: self.split_tags(),
            variables: self.variables.clone(),
        };
    }

    /// Runs every rule and collects all failures into `errors` rather than
    /// stopping at the first.
    pub fn validate(&mut self) -> Result<(), AppError> {
        let mut errors: Vec<String> = vec![];

        if let Some(err) = validation::template_name(&self.name) {
            errors.push(err);
        }
        if let Some(err) = validation::template_id(&self.template_id) {
            errors.push(err);
        }
        if !self.from.is_empty() {
            if let Some(err) = validation::email(&self.from) {
                errors.push(format!("From address: {err}"));
            }
        }
        errors.extend(validation::validate_variables(&self.variables));

        self.errors = errors;
        if self.errors.is_empty() {
            return Ok(());
        }
        return Err(AppError::Validation(self.errors.clone()));
    }

    pub fn build_create_request(&self) -> CreateTemplateRequest {
        return CreateTemplateRequest {
            template_id: self.template_id.to_string(),
            template_type: self.template_type,
            name: self.name.to_string(),
            description: self.description.to_string(),
            version: self.version.to_string(),
            tags: self.split_tags(),
            author: self.author.to_string(),
            subject: self.subject.to_string(),
            html_content: self.html_content.to_string(),
            text_content: self.text_content.to_string(),
            variables: self.variables.clone(),
            app_entry: self.app_entry,
            from: self.from.to_string(),
        };
    }

    pub fn build_update_request(&self) -> UpdateTemplateRequest {
        return UpdateTemplateRequest {
            name: self.name.to_string(),
            description: self.description.to_string(),
            version: self.version.to_string(),
            tags: self.split_tags(),
            author: self.author.to_string(),
            subject: self.subject.to_string(),
            html_content: self.html_content.to_string(),
            text_content: self.text_content.to_string(),
            variables: self.variables.clone(),
            app_entry: self.app_entry,
            from: self.from.to_string(),
        };
    }

    fn split_tags(&self) -> Vec<String> {
        return self
            .tags
            .split(',')
            .map(|tag| return tag.trim().to_string())
            .filter(|tag| return !tag.is_empty())
            .collect();
    }
}
