//! JSON bodies of the Ollama HTTP API.

use fable_core::{ExchangeRequest, ResponseFormat};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/generate`.
#[derive(Debug, Serialize)]
pub(super) struct GenerateBody<'a> {
    pub(super) model: &'a str,
    pub(super) prompt: &'a str,
    pub(super) stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) format: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) context: Option<&'a [i64]>,
}

impl<'a> From<&'a ExchangeRequest> for GenerateBody<'a> {
    fn from(request: &'a ExchangeRequest) -> Self {
        Self {
            model: &request.model,
            prompt: &request.prompt,
            stream: false,
            format: match request.format {
                ResponseFormat::Json => Some("json"),
                ResponseFormat::Text => None,
            },
            context: request.context.as_ref().map(|context| context.tokens()),
        }
    }
}

/// Non-streaming reply of `POST /api/generate`.
#[derive(Debug, Deserialize)]
pub(super) struct GenerateReply {
    pub(super) response: String,
    #[serde(default)]
    pub(super) context: Vec<i64>,
}

/// Reply of `GET /api/tags`.
#[derive(Debug, Deserialize)]
pub(super) struct TagsReply {
    #[serde(default)]
    pub(super) models: Vec<TagModel>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TagModel {
    pub(super) name: String,
}

/// Error envelope Ollama uses for non-success statuses.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorReply {
    pub(super) error: String,
}
