use std::collections::BTreeMap;

use super::AppEntry;
use super::CreateTemplateRequest;
use super::TemplateType;
use super::UpdateTemplateRequest;
use super::VariableValue;

/// Work requested by the UI, executed by the actions worker so the event loop
/// never blocks on network I/O.
pub enum Action {
    Login {
        email: String,
        password: String,
    },
    Logout(),
    ListTemplates(Option<TemplateType>),
    LoadTemplate {
        template_type: TemplateType,
        template_id: String,
        app_entry: AppEntry,
    },
    CreateTemplate(Box<CreateTemplateRequest>),
    UpdateTemplate {
        template_type: TemplateType,
        template_id: String,
        request: Box<UpdateTemplateRequest>,
    },
    DeleteTemplate {
        template_type: TemplateType,
        template_id: String,
        app_entry: AppEntry,
    },
    RemotePreview {
        template_type: TemplateType,
        template_id: String,
        app_entry: AppEntry,
        data: BTreeMap<String, VariableValue>,
    },
}
