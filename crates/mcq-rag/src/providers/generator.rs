//! Quiz generator trait for MCQ generation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

use crate::error::Result;

/// Structured payload handed to the generation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationPayload {
    /// Full document text
    pub text: String,
    /// Number of questions requested
    pub number: u32,
    /// Subject of the quiz
    pub subject: String,
    /// Tone / complexity of the questions
    pub tone: String,
    /// Serialized response schema
    pub response_json: String,
}

/// Token accounting reported by a generation call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, other: Self) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
    }
}

/// Raw output of a generation service
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorOutput {
    /// Expected to be an object with a `quiz` string and an optional `review`
    pub value: serde_json::Value,
    /// Tokens spent producing it
    pub usage: TokenUsage,
}

impl GeneratorOutput {
    /// Output without usage information
    pub fn new(value: serde_json::Value) -> Self {
        Self {
            value,
            usage: TokenUsage::default(),
        }
    }
}

/// Trait for services that turn document text into a quiz
///
/// Implementations:
/// - `QuizChain`: two-step quiz + review chain over any `LlmProvider`
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    /// Run the generation chain
    async fn generate(&self, payload: &GenerationPayload) -> Result<GeneratorOutput>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
