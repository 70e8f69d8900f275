//! Ollama client implementation.

use super::wire::{ErrorReply, GenerateBody, GenerateReply, TagsReply};
use async_trait::async_trait;
use fable_core::{ConversationContext, ExchangeRequest, ExchangeResponse};
use fable_error::{ExchangeError, ExchangeErrorKind, FableResult};
use fable_interface::{ExchangeDriver, Health, HealthStatus};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Default Ollama server address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
/// Default per-exchange timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Connection settings for an Ollama server.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into), build_fn(error = "fable_error::BuilderError"))]
#[serde(default)]
pub struct OllamaConfig {
    /// Server URL, without a trailing path
    #[builder(default = "DEFAULT_BASE_URL.to_string()")]
    base_url: String,
    /// Seconds to wait for a full reply
    #[builder(default = "DEFAULT_TIMEOUT_SECS")]
    timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl OllamaConfig {
    /// Creates a new config builder.
    pub fn builder() -> OllamaConfigBuilder {
        OllamaConfigBuilder::default()
    }
}

/// Ollama driver for local model execution.
///
/// Uses the non-streaming `/api/generate` endpoint in JSON mode, sending the
/// previous exchange's context and returning the one Ollama hands back.
#[derive(Debug, Clone)]
pub struct OllamaDriver {
    client: Client,
    config: OllamaConfig,
}

impl OllamaDriver {
    /// Create a driver for the default localhost server.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new() -> FableResult<Self> {
        Self::with_config(OllamaConfig::default())
    }

    /// Create a driver with custom connection settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot be
    /// initialized.
    #[instrument(name = "ollama_driver_new", skip_all, fields(url = %config.base_url()))]
    pub fn with_config(config: OllamaConfig) -> FableResult<Self> {
        if config.base_url().trim().is_empty() {
            return Err(ExchangeError::new(ExchangeErrorKind::InvalidConfiguration(
                "Ollama base_url cannot be empty".to_string(),
            ))
            .into());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(*config.timeout_secs()))
            .build()
            .map_err(|e| {
                ExchangeError::new(ExchangeErrorKind::InvalidConfiguration(format!(
                    "Failed to build HTTP client: {}",
                    e
                )))
            })?;

        info!(timeout_secs = config.timeout_secs(), "Creating Ollama driver");
        Ok(Self { client, config })
    }

    /// Connection settings in use.
    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url().trim_end_matches('/'), path)
    }

    fn map_send_error(&self, e: reqwest::Error) -> ExchangeError {
        if e.is_connect() {
            warn!(error = %e, "Failed to connect to Ollama server");
            ExchangeError::new(ExchangeErrorKind::ServerNotRunning(
                self.config.base_url().clone(),
            ))
        } else if e.is_timeout() {
            ExchangeError::new(ExchangeErrorKind::Timeout(*self.config.timeout_secs()))
        } else {
            ExchangeError::new(ExchangeErrorKind::Request(e.to_string()))
        }
    }

    /// Check that the server is up and has `model` pulled.
    ///
    /// Names match with or without the `:latest` tag.
    ///
    /// # Errors
    ///
    /// Returns `ServerNotRunning` if the server cannot be reached and
    /// `ModelNotFound` if the model is not available locally.
    #[instrument(skip(self))]
    pub async fn validate(&self, model: &str) -> FableResult<()> {
        debug!("Validating Ollama server and model availability");

        let response = self
            .client
            .get(self.url("/api/tags"))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;
        if !status.is_success() {
            return Err(ExchangeError::new(ExchangeErrorKind::Http {
                status_code: status.as_u16(),
                message: body,
            })
            .into());
        }

        let tags: TagsReply = serde_json::from_str(&body).map_err(|e| {
            ExchangeError::new(ExchangeErrorKind::InvalidResponse(format!(
                "Failed to parse model list: {}",
                e
            )))
        })?;
        debug!(count = tags.models.len(), "Found local models");

        let tagged = format!("{}:latest", model);
        if !tags
            .models
            .iter()
            .any(|m| m.name == model || m.name == tagged)
        {
            warn!(
                model = %model,
                available = ?tags.models.iter().map(|m| &m.name).collect::<Vec<_>>(),
                "Model not found locally"
            );
            return Err(
                ExchangeError::new(ExchangeErrorKind::ModelNotFound(model.to_string())).into(),
            );
        }

        info!("Ollama server and model validated");
        Ok(())
    }
}

#[async_trait]
impl ExchangeDriver for OllamaDriver {
    #[instrument(skip(self, req), fields(model = %req.model, prompt_length = req.prompt.len()))]
    async fn exchange(&self, req: &ExchangeRequest) -> FableResult<ExchangeResponse> {
        debug!(
            context_length = req.context.as_ref().map(|c| c.len()).unwrap_or(0),
            "Sending Ollama generate request"
        );

        let response = self
            .client
            .post(self.url("/api/generate"))
            .json(&GenerateBody::from(req))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorReply>(&body)
                .map(|reply| reply.error)
                .unwrap_or(body);
            if status.as_u16() == 404 && message.contains("not found") {
                return Err(
                    ExchangeError::new(ExchangeErrorKind::ModelNotFound(req.model.clone())).into(),
                );
            }
            return Err(ExchangeError::new(ExchangeErrorKind::Http {
                status_code: status.as_u16(),
                message,
            })
            .into());
        }

        let reply: GenerateReply = serde_json::from_str(&body).map_err(|e| {
            ExchangeError::new(ExchangeErrorKind::InvalidResponse(format!(
                "Failed to parse generate reply: {}",
                e
            )))
        })?;

        debug!(
            response_length = reply.response.len(),
            context_length = reply.context.len(),
            "Received response from Ollama"
        );

        Ok(ExchangeResponse::new(
            reply.response,
            ConversationContext::from_tokens(reply.context),
        ))
    }

    fn provider_name(&self) -> &'static str {
        "ollama"
    }
}

#[async_trait]
impl Health for OllamaDriver {
    async fn health(&self) -> FableResult<HealthStatus> {
        match self
            .client
            .get(self.url("/api/tags"))
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => Ok(HealthStatus::Healthy),
            Ok(response) => Ok(HealthStatus::Degraded {
                message: format!("Model list returned HTTP {}", response.status().as_u16()),
            }),
            Err(e) => Ok(HealthStatus::Unhealthy {
                message: self.map_send_error(e).kind.to_string(),
            }),
        }
    }
}
