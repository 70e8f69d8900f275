//! The single conversation a story run threads through its exchanges.

use crate::extraction::parse_reply;
use crate::responses::StructuredReply;
use fable_core::{ConversationContext, ExchangeRequest};
use fable_error::{
    ExchangeStep, FableResult, StructuredResponseError, StructuredResponseErrorKind,
};
use fable_interface::ExchangeDriver;
use tracing::{debug, instrument};

/// Carries the evolving context from one exchange to the next.
///
/// Every exchange sends the current context and replaces it with the one the
/// reply carries. Both entry points take `&mut self`, so two exchanges can
/// never run against the same context.
pub struct ConversationThread<'a, D> {
    driver: &'a D,
    model: String,
    context: Option<ConversationContext>,
    exchanges: usize,
}

impl<'a, D: ExchangeDriver> ConversationThread<'a, D> {
    /// Start a fresh conversation.
    pub fn new(driver: &'a D, model: impl Into<String>) -> Self {
        Self::resume(driver, model, None)
    }

    /// Continue from a context a previous run ended with.
    pub fn resume(
        driver: &'a D,
        model: impl Into<String>,
        context: Option<ConversationContext>,
    ) -> Self {
        Self {
            driver,
            model: model.into(),
            context,
            exchanges: 0,
        }
    }

    /// Send one prompt and return the raw reply text.
    #[instrument(skip(self, prompt), fields(provider = self.driver.provider_name(), model = %self.model, exchange = self.exchanges))]
    pub async fn exchange(&mut self, step: ExchangeStep, prompt: String) -> FableResult<String> {
        let request =
            ExchangeRequest::new(self.model.clone(), prompt).with_context(self.context.clone());
        let response = self.driver.exchange(&request).await?;

        debug!(
            step = %step,
            reply_length = response.text.len(),
            context_length = response.context.len(),
            "Exchange complete"
        );

        self.context = Some(response.context);
        self.exchanges += 1;
        Ok(response.text)
    }

    /// Send one prompt and parse the reply into `T`.
    ///
    /// A reply whose required text field is blank counts as malformed.
    pub async fn ask<T>(&mut self, step: ExchangeStep, prompt: String) -> FableResult<T>
    where
        T: StructuredReply,
    {
        let reply = self.exchange(step, prompt).await?;
        let parsed: T = parse_reply(step, &reply)?;
        if let Some(field) = parsed.empty_field() {
            return Err(StructuredResponseError::new(
                step,
                StructuredResponseErrorKind::EmptyField(field.to_string()),
                reply,
            )
            .into());
        }
        Ok(parsed)
    }

    /// Context after the latest exchange.
    pub fn context(&self) -> Option<&ConversationContext> {
        self.context.as_ref()
    }

    /// Number of completed exchanges.
    pub fn exchanges(&self) -> usize {
        self.exchanges
    }

    /// End the conversation, yielding the final context.
    pub fn into_context(self) -> ConversationContext {
        self.context.unwrap_or_default()
    }
}
