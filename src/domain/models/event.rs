use super::AuthState;
use super::RenderedPreview;
use super::SavedTemplate;
use super::Template;
use super::TemplateData;

/// Results pushed back from the actions worker to the UI.
pub enum Event {
    AuthState(AuthState),
    TemplatesLoaded(Vec<Template>),
    TemplateLoaded(Box<TemplateData>),
    TemplateSaved(SavedTemplate),
    TemplateDeleted { template_id: String },
    RemotePreviewReady(RenderedPreview),
    ApiError(String),
}
