//! Chat answerer trait

use async_trait::async_trait;
use crate::error::Result;

/// Trait for answering free-text chat queries
///
/// Implementations:
/// - `RetrievalQa`: vector index lookup plus an Ollama completion
#[async_trait]
pub trait ChatAnswerer: Send + Sync {
    /// Answer a query
    async fn answer(&self, query: &str) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
