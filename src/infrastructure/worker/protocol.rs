use crate::core::models::{MinificationOptions, MinificationResult, SupportedLanguage};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One unit of work sent to the worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerRequest {
    pub id: String,
    pub code: String,
    pub language: SupportedLanguage,
    #[serde(default)]
    pub options: MinificationOptions,
}

/// Exactly one response per request, matched by `id`.
/// `result` is set when `success` is true, `error` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerResponse {
    pub id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<MinificationResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkerResponse {
    pub fn ok(id: impl Into<String>, result: MinificationResult) -> Self {
        Self {
            id: id.into(),
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failed(id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

/// Short random correlation id
pub fn new_request_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(12);
    id
}
