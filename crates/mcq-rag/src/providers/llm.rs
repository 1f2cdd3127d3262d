//! LLM provider trait for raw completions

use async_trait::async_trait;
use crate::error::Result;

use super::generator::TokenUsage;

/// A completion plus the tokens it cost
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub usage: TokenUsage,
}

/// Trait for text completion backends
///
/// Implementations:
/// - `OllamaLlm`: Local Ollama server (llama3.2, phi3, etc.)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete a prompt; `json_mode` constrains the output to JSON
    async fn complete(&self, prompt: &str, temperature: f32, json_mode: bool) -> Result<Completion>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
