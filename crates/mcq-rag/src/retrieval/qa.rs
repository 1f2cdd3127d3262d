//! Retrieval-augmented answers for the chat endpoint

use async_trait::async_trait;
use std::sync::Arc;

use super::index::LocalVectorIndex;
use crate::error::Result;
use crate::generation::PromptBuilder;
use crate::providers::{ChatAnswerer, EmbeddingProvider, LlmProvider};

/// Embed the query, stuff the top-k chunks into a prompt, ask the LLM
pub struct RetrievalQa {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<LocalVectorIndex>,
    llm: Arc<dyn LlmProvider>,
    top_k: usize,
    temperature: f32,
}

impl RetrievalQa {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<LocalVectorIndex>,
        llm: Arc<dyn LlmProvider>,
        top_k: usize,
        temperature: f32,
    ) -> Self {
        Self {
            embedder,
            index,
            llm,
            top_k,
            temperature,
        }
    }
}

#[async_trait]
impl ChatAnswerer for RetrievalQa {
    async fn answer(&self, query: &str) -> Result<String> {
        let query_embedding = self.embedder.embed(query).await?;
        let hits = self.index.search(&query_embedding, self.top_k);

        tracing::debug!(
            "Retrieved {} chunks for chat query (best similarity: {:?})",
            hits.len(),
            hits.first().map(|h| h.similarity)
        );

        let context = PromptBuilder::build_context(&hits);
        let prompt = PromptBuilder::build_chat_prompt(&context, query);
        let completion = self.llm.complete(&prompt, self.temperature, false).await?;

        Ok(completion.text.trim().to_string())
    }

    fn name(&self) -> &str {
        "retrieval-qa"
    }
}
