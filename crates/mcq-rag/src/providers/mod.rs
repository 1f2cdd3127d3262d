//! Provider abstractions for completions, quiz generation, chat answers and embeddings
//!
//! The HTTP layer and the pipeline only see these traits, so tests can swap
//! in fakes without a running Ollama server.

pub mod answerer;
pub mod embedding;
pub mod generator;
pub mod llm;
pub mod ollama;

pub use answerer::ChatAnswerer;
pub use embedding::EmbeddingProvider;
pub use generator::{GenerationPayload, GeneratorOutput, QuizGenerator, TokenUsage};
pub use llm::{Completion, LlmProvider};
pub use ollama::{OllamaEmbedder, OllamaLlm};
