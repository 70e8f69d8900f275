//! Request and response types that cross the transport boundary.

use crate::ConversationContext;
use serde::{Deserialize, Serialize};

/// Reply format requested from the text-generation service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Free text
    Text,
    /// JSON-constrained output
    #[default]
    Json,
}

/// One prompt sent to a text-generation service.
///
/// # Examples
///
/// ```
/// use fable_core::{ConversationContext, ExchangeRequest, ResponseFormat};
///
/// let request = ExchangeRequest::new("mistral", "Tell me a story")
///     .with_context(Some(ConversationContext::from_tokens(vec![1, 2])));
///
/// assert_eq!(request.format, ResponseFormat::Json);
/// assert_eq!(request.context.as_ref().map(|c| c.len()), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRequest {
    /// Prompt text
    pub prompt: String,
    /// Model identifier
    pub model: String,
    /// Context returned by the previous exchange, absent for the first one
    pub context: Option<ConversationContext>,
    /// Requested reply format
    pub format: ResponseFormat,
}

impl ExchangeRequest {
    /// A JSON-format request with no prior context.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            context: None,
            format: ResponseFormat::default(),
        }
    }

    /// Attach the context to continue from.
    pub fn with_context(mut self, context: Option<ConversationContext>) -> Self {
        self.context = context;
        self
    }

    /// Override the reply format.
    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }
}

/// The reply to an [`ExchangeRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeResponse {
    /// Raw reply text
    pub text: String,
    /// Context to hand to the next exchange
    pub context: ConversationContext,
}

impl ExchangeResponse {
    /// Pair reply text with its successor context.
    pub fn new(text: impl Into<String>, context: ConversationContext) -> Self {
        Self {
            text: text.into(),
            context,
        }
    }
}
