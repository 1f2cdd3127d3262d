//! mcq-rag: MCQ generation from uploaded documents, with CSV export and document chat
//!
//! Uploaded pdf/txt files are turned into multiple-choice quizzes by a local
//! Ollama model, persisted in SQLite and exported as CSV. A separate chat
//! endpoint answers questions over a pre-built local vector index.

pub mod config;
pub mod error;
pub mod export;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod storage;
pub mod types;

#[cfg(test)]
mod test_support;

pub use config::McqConfig;
pub use error::{Error, Result};
pub use generation::{GenerationRequest, McqPipeline};
pub use server::{build_router, McqServer};
pub use storage::McqStore;
pub use types::{
    mcq::{Mcq, QuizData},
    response::GenerationResult,
};
