#[cfg(test)]
#[path = "templates_test.rs"]
mod tests;

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::RequestBuilder;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use super::ApiEnvelope;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AppEntry;
use crate::domain::models::AppError;
use crate::domain::models::CreateTemplateRequest;
use crate::domain::models::RenderedPreview;
use crate::domain::models::SavedTemplate;
use crate::domain::models::Template;
use crate::domain::models::TemplateData;
use crate::domain::models::TemplateType;
use crate::domain::models::UpdateTemplateRequest;
use crate::domain::models::VariableValue;
use crate::domain::services::TokenStore;

#[derive(Debug, Deserialize)]
struct TemplateList {
    data: Vec<Template>,
    #[allow(dead_code)]
    count: usize,
}

#[derive(Debug, Serialize)]
struct PreviewRequest {
    data: serde_json::Value,
}

/// Client for the email-template endpoints. Templates are addressed by
/// `(type, templateId, appEntry)`; the bearer token, when present, rides on
/// every request.
pub struct TemplateApi {
    url: String,
    timeout: String,
    tokens: TokenStore,
}

impl Default for TemplateApi {
    fn default() -> TemplateApi {
        return TemplateApi {
            url: Config::get(ConfigKey::ApiUrl),
            timeout: Config::get(ConfigKey::RequestTimeout),
            tokens: TokenStore::default(),
        };
    }
}

impl TemplateApi {
    fn prepare(&self, req: RequestBuilder) -> RequestBuilder {
        let timeout = Duration::from_millis(self.timeout.parse::<u64>().unwrap_or(30000));
        let mut req = req.timeout(timeout);
        if let Some(token) = self.tokens.load() {
            req = req.bearer_auth(token);
        }

        return req;
    }

    async fn unwrap_envelope<T: DeserializeOwned>(
        res: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<T, AppError> {
        let res = res.map_err(AppError::network)?;
        let status = res.status();
        let body = res.text().await.map_err(AppError::network)?;

        let Ok(envelope) = serde_json::from_str::<ApiEnvelope<T>>(&body) else {
            if !status.is_success() {
                return Err(AppError::Network(format!(
                    "request failed with status {status}"
                )));
            }
            return Err(AppError::Network("malformed response body".to_string()));
        };

        let detail = envelope.error.or(envelope.message);
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AppError::Authorization(
                detail.unwrap_or_else(|| return "Not authorized".to_string()),
            ));
        }
        if !status.is_success() || !envelope.success {
            return Err(AppError::Network(detail.unwrap_or_else(|| {
                return format!("request failed with status {status}");
            })));
        }

        return envelope
            .data
            .ok_or_else(|| return AppError::Network("response missing data".to_string()));
    }

    pub async fn list(&self, filter: Option<TemplateType>) -> Result<Vec<Template>, AppError> {
        let mut req = reqwest::Client::new().get(format!(
            "{url}/api/email-templates",
            url = self.url
        ));
        if let Some(template_type) = filter {
            req = req.query(&[("type", template_type.to_string())]);
        }

        let list: TemplateList = TemplateApi::unwrap_envelope(self.prepare(req).send().await).await?;
        return Ok(list.data);
    }

    pub async fn get(
        &self,
        template_type: TemplateType,
        template_id: &str,
        app_entry: AppEntry,
    ) -> Result<TemplateData, AppError> {
        let req = reqwest::Client::new()
            .get(format!(
                "{url}/api/email-templates/{template_type}/{template_id}",
                url = self.url
            ))
            .query(&[("appEntry", app_entry.to_string())]);

        return TemplateApi::unwrap_envelope(self.prepare(req).send().await).await;
    }

    pub async fn create(
        &self,
        request: &CreateTemplateRequest,
    ) -> Result<SavedTemplate, AppError> {
        let req = reqwest::Client::new()
            .post(format!("{url}/api/email-templates", url = self.url))
            .json(request);

        return TemplateApi::unwrap_envelope(self.prepare(req).send().await).await;
    }

    pub async fn update(
        &self,
        template_type: TemplateType,
        template_id: &str,
        request: &UpdateTemplateRequest,
    ) -> Result<SavedTemplate, AppError> {
        let req = reqwest::Client::new()
            .put(format!(
                "{url}/api/email-templates/{template_type}/{template_id}",
                url = self.url
            ))
            .json(request);

        return TemplateApi::unwrap_envelope(self.prepare(req).send().await).await;
    }

    pub async fn delete(
        &self,
        template_type: TemplateType,
        template_id: &str,
        app_entry: AppEntry,
    ) -> Result<SavedTemplate, AppError> {
        let req = reqwest::Client::new()
            .delete(format!(
                "{url}/api/email-templates/{template_type}/{template_id}",
                url = self.url
            ))
            .query(&[("appEntry", app_entry.to_string())]);

        return TemplateApi::unwrap_envelope(self.prepare(req).send().await).await;
    }

    /// Server-side render with caller-provided bindings, used to check the
    /// authoritative output against the local preview.
    pub async fn preview(
        &self,
        template_type: TemplateType,
        template_id: &str,
        app_entry: AppEntry,
        data: &BTreeMap<String, VariableValue>,
    ) -> Result<RenderedPreview, AppError> {
        let bindings = data
            .iter()
            .map(|(name, value)| return (name.to_string(), value.to_json()))
            .collect::<serde_json::Map<String, serde_json::Value>>();

        let req = reqwest::Client::new()
            .post(format!(
                "{url}/api/email-templates/{template_type}/{template_id}/preview",
                url = self.url
            ))
            .query(&[("appEntry", app_entry.to_string())])
            .json(&PreviewRequest {
                data: serde_json::Value::Object(bindings),
            });

        return TemplateApi::unwrap_envelope(self.prepare(req).send().await).await;
    }
}
