//! Quiz generation: prompts, Ollama client and the MCQ pipeline

pub mod chain;
pub mod ollama;
pub mod pipeline;
pub mod prompt;
pub mod schema;

pub use chain::QuizChain;
pub use ollama::OllamaClient;
pub use pipeline::{GenerationRequest, McqPipeline, PipelineError};
pub use prompt::PromptBuilder;
pub use schema::{ResponseSchema, SchemaError};
