//! Trait definitions for text-generation backends.

use crate::HealthStatus;
use async_trait::async_trait;
use fable_core::{ExchangeRequest, ExchangeResponse};
use fable_error::FableResult;
use std::sync::Arc;

/// Core trait that every text-generation transport implements.
///
/// One call is one exchange: the request carries the prompt and the context
/// of the previous exchange, the response carries the reply text and the
/// context to use next. Implementations never inspect the context beyond
/// converting it to their wire form.
#[async_trait]
pub trait ExchangeDriver: Send + Sync {
    /// Send one prompt and wait for the full reply.
    async fn exchange(&self, req: &ExchangeRequest) -> FableResult<ExchangeResponse>;

    /// Provider name (e.g., "ollama").
    fn provider_name(&self) -> &'static str;
}

/// Trait for backends that support health checks.
#[async_trait]
pub trait Health: ExchangeDriver {
    /// Check if the backend is available and serves the configured model.
    async fn health(&self) -> FableResult<HealthStatus>;
}

#[async_trait]
impl<T: ExchangeDriver + ?Sized> ExchangeDriver for &T {
    async fn exchange(&self, req: &ExchangeRequest) -> FableResult<ExchangeResponse> {
        (**self).exchange(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }
}

#[async_trait]
impl<T: ExchangeDriver + ?Sized> ExchangeDriver for Box<T> {
    async fn exchange(&self, req: &ExchangeRequest) -> FableResult<ExchangeResponse> {
        (**self).exchange(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }
}

#[async_trait]
impl<T: ExchangeDriver + ?Sized> ExchangeDriver for Arc<T> {
    async fn exchange(&self, req: &ExchangeRequest) -> FableResult<ExchangeResponse> {
        (**self).exchange(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }
}
