//! Ollama text-generation transport.

mod client;
mod wire;

pub use client::{OllamaConfig, OllamaConfigBuilder, OllamaDriver};
