pub mod templates;

use serde::Deserialize;

pub use self::templates::TemplateApi;

/// Standard response wrapper used by every template endpoint. A response
/// with `success: false` is treated the same as a transport failure.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
