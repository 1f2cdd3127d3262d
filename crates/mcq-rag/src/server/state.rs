//! Application state for the MCQ server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::McqConfig;
use crate::error::Result;
use crate::generation::{McqPipeline, OllamaClient, QuizChain};
use crate::providers::{ChatAnswerer, LlmProvider, OllamaEmbedder, OllamaLlm, QuizGenerator};
use crate::retrieval::{LocalVectorIndex, RetrievalQa};
use crate::storage::McqStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: McqConfig,
    /// Record store for generated MCQs
    store: McqStore,
    /// Generation pipeline
    pipeline: McqPipeline,
    /// Chat answerer
    answerer: Arc<dyn ChatAnswerer>,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create application state backed by SQLite and a local Ollama server
    pub async fn new(config: McqConfig) -> Result<Self> {
        tracing::info!("Initializing MCQ application state...");

        for dir in [&config.storage.upload_dir, &config.storage.data_dir] {
            tokio::fs::create_dir_all(dir).await?;
        }
        if let Some(parent) = config.storage.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let store = McqStore::new(&config.storage.database_path)?;
        tracing::info!(
            "MCQ store opened at {} ({} records)",
            config.storage.database_path.display(),
            store.count()?
        );

        let ollama = Arc::new(OllamaClient::new(&config.llm)?);
        let llm: Arc<dyn LlmProvider> = Arc::new(OllamaLlm::from_client(Arc::clone(&ollama)));
        let generator = Arc::new(QuizChain::new(Arc::clone(&llm), config.llm.temperature));
        tracing::info!("Quiz chain initialized (model: {})", config.llm.generate_model);

        let index = Arc::new(LocalVectorIndex::open(&config.retrieval.index_path)?);
        let answerer = Arc::new(RetrievalQa::new(
            Arc::new(OllamaEmbedder::from_client(ollama)),
            index,
            llm,
            config.retrieval.top_k,
            config.retrieval.chat_temperature,
        ));
        tracing::info!(
            "Retrieval QA initialized (embeddings: {}, top_k: {})",
            config.llm.embed_model,
            config.retrieval.top_k
        );

        Ok(Self::from_parts(config, store, generator, answerer))
    }

    /// Assemble state from explicit collaborators
    pub fn from_parts(
        config: McqConfig,
        store: McqStore,
        generator: Arc<dyn QuizGenerator>,
        answerer: Arc<dyn ChatAnswerer>,
    ) -> Self {
        let pipeline = McqPipeline::from_config(generator, &config);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                pipeline,
                answerer,
                ready: RwLock::new(true),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &McqConfig {
        &self.inner.config
    }

    /// Get the MCQ record store
    pub fn store(&self) -> &McqStore {
        &self.inner.store
    }

    /// Get the generation pipeline
    pub fn pipeline(&self) -> &McqPipeline {
        &self.inner.pipeline
    }

    /// Get the chat answerer
    pub fn answerer(&self) -> &Arc<dyn ChatAnswerer> {
        &self.inner.answerer
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Flip readiness, e.g. while shutting down
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
