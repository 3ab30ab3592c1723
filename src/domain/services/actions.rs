use anyhow::Result;
use tokio::sync::mpsc;

use super::auth::AuthService;
use crate::domain::models::Action;
use crate::domain::models::AppError;
use crate::domain::models::Event;
use crate::infrastructure::api::TemplateApi;

fn worker_error(err: AppError, tx: &mpsc::UnboundedSender<Event>) -> Result<()> {
    tx.send(Event::ApiError(err.to_string()))?;

    return Ok(());
}

/// Background worker owning every network call, so the UI thread never
/// blocks on the API. Actions come in from the UI; results and auth state
/// changes flow back as events.
pub struct ActionsService {}

impl ActionsService {
    pub async fn start(
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let mut auth = AuthService::default();
        let api = TemplateApi::default();

        let state_tx = tx.clone();
        auth.subscribe(Box::new(move |state| {
            let _ = state_tx.send(Event::AuthState(state.clone()));
        }));

        // Resolve the stored token before the first action arrives.
        auth.check_auth_status().await;

        loop {
            let action = rx.recv().await;
            if action.is_none() {
                continue;
            }

            match action.unwrap() {
                Action::Login { email, password } => {
                    auth.login(&email, &password).await;
                }
                Action::Logout() => {
                    auth.logout().await;
                }
                Action::ListTemplates(filter) => match api.list(filter).await {
                    Ok(templates) => tx.send(Event::TemplatesLoaded(templates))?,
                    Err(err) => worker_error(err, &tx)?,
                },
                Action::LoadTemplate {
                    template_type,
                    template_id,
                    app_entry,
                } => match api.get(template_type, &template_id, app_entry).await {
                    Ok(template) => tx.send(Event::TemplateLoaded(Box::new(template)))?,
                    Err(err) => worker_error(err, &tx)?,
                },
                Action::CreateTemplate(request) => match api.create(&request).await {
                    Ok(saved) => tx.send(Event::TemplateSaved(saved))?,
                    Err(err) => worker_error(err, &tx)?,
                },
                Action::UpdateTemplate {
                    template_type,
                    template_id,
                    request,
                } => match api.update(template_type, &template_id, &request).await {
                    Ok(saved) => tx.send(Event::TemplateSaved(saved))?,
                    Err(err) => worker_error(err, &tx)?,
                },
                Action::DeleteTemplate {
                    template_type,
                    template_id,
                    app_entry,
                } => match api.delete(template_type, &template_id, app_entry).await {
                    Ok(saved) => tx.send(Event::TemplateDeleted {
                        template_id: saved.template_id,
                    })?,
                    Err(err) => worker_error(err, &tx)?,
                },
                Action::RemotePreview {
                    template_type,
                    template_id,
                    app_entry,
                    data,
                } => match api
                    .preview(template_type, &template_id, app_entry, &data)
                    .await
                {
                    Ok(preview) => tx.send(Event::RemotePreviewReady(preview))?,
                    Err(err) => worker_error(err, &tx)?,
                },
            }
        }
    }
}
