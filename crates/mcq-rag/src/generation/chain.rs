//! Two-step quiz chain: write the quiz, then review its complexity

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use super::prompt::PromptBuilder;
use crate::error::Result;
use crate::providers::{GenerationPayload, GeneratorOutput, LlmProvider, QuizGenerator};

/// Quiz generator driving any [`LlmProvider`].
///
/// Output is `{"quiz": <raw JSON text>, "review": <text>}`; the quiz text is
/// not validated here.
pub struct QuizChain {
    llm: Arc<dyn LlmProvider>,
    temperature: f32,
}

impl QuizChain {
    pub fn new(llm: Arc<dyn LlmProvider>, temperature: f32) -> Self {
        Self { llm, temperature }
    }
}

#[async_trait]
impl QuizGenerator for QuizChain {
    async fn generate(&self, payload: &GenerationPayload) -> Result<GeneratorOutput> {
        tracing::info!(
            "Generating {} MCQs with {} ({} chars of text)",
            payload.number,
            self.llm.model(),
            payload.text.len()
        );

        let quiz_prompt = PromptBuilder::build_quiz_prompt(payload);
        let quiz = self.llm.complete(&quiz_prompt, self.temperature, true).await?;
        let quiz_text = quiz.text.trim().to_string();

        let review_prompt = PromptBuilder::build_review_prompt(&payload.subject, &quiz_text);
        let review = self.llm.complete(&review_prompt, self.temperature, false).await?;

        let mut usage = quiz.usage;
        usage += review.usage;

        Ok(GeneratorOutput {
            value: json!({
                "quiz": quiz_text,
                "review": review.text.trim(),
            }),
            usage,
        })
    }

    fn name(&self) -> &str {
        self.llm.name()
    }
}
