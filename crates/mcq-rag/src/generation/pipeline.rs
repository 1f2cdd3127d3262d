//! MCQ generation pipeline
//!
//! Extracts the document text, loads the response schema, runs the injected
//! quiz generator and normalizes its output into a [`GenerationResult`].
//! The pipeline never returns an error: every failure becomes a result with
//! `status_code == 400`.

use bytes::Bytes;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use super::schema::{ResponseSchema, SchemaError};
use crate::config::McqConfig;
use crate::error::Error;
use crate::ingestion::TextExtractor;
use crate::providers::{GenerationPayload, QuizGenerator};
use crate::types::response::QUIZ_NOT_GENERATED;
use crate::types::{GenerationResult, Mcq, QuizData};

/// One MCQ generation request
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Declared file name; its extension selects the extractor
    pub file_name: String,
    /// Uploaded bytes
    pub data: Bytes,
    /// Number of questions to generate (> 0)
    pub mcq_count: u32,
    pub subject: String,
    pub tone: String,
}

/// Ways a generation can go wrong
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Document text could not be extracted
    #[error("{0}")]
    Extraction(Error),

    /// Response schema missing or malformed
    #[error("{0}")]
    SchemaLoad(#[from] SchemaError),

    /// The generation service itself failed
    #[error("{0}")]
    GenerationService(Error),

    /// The service answered without a usable `quiz` field
    #[error("{}", QUIZ_NOT_GENERATED)]
    EmptyQuiz,

    /// The `quiz` field is not a valid quiz document
    #[error("quiz payload is not valid JSON: {0}")]
    QuizParse(serde_json::Error),

    /// Every question in the quiz had the wrong shape
    #[error("none of the {0} generated questions had the expected shape")]
    MalformedQuestions(usize),
}

impl PipelineError {
    /// Collapse into the uniform failure shape
    pub fn into_result(self) -> GenerationResult {
        match self {
            PipelineError::EmptyQuiz => GenerationResult::failure(QUIZ_NOT_GENERATED),
            other => GenerationResult::failure(format!("Error generating MCQs. Error is {}.", other)),
        }
    }
}

/// Generation pipeline with an injected quiz generator
pub struct McqPipeline {
    generator: Arc<dyn QuizGenerator>,
    schema_path: PathBuf,
    strict_quiz_parsing: bool,
}

impl McqPipeline {
    /// Create a pipeline
    pub fn new(generator: Arc<dyn QuizGenerator>, schema_path: PathBuf) -> Self {
        Self {
            generator,
            schema_path,
            strict_quiz_parsing: false,
        }
    }

    /// Create a pipeline from configuration
    pub fn from_config(generator: Arc<dyn QuizGenerator>, config: &McqConfig) -> Self {
        Self::new(generator, config.schema_path())
            .with_strict_quiz_parsing(config.generation.strict_quiz_parsing)
    }

    /// Fail instead of returning empty data when the quiz payload is malformed
    pub fn with_strict_quiz_parsing(mut self, strict: bool) -> Self {
        self.strict_quiz_parsing = strict;
        self
    }

    /// Run a generation. Never fails; check `status_code` on the result.
    pub async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        match self.run(request).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("MCQ generation failed for {}: {}", request.file_name, e);
                e.into_result()
            }
        }
    }

    async fn run(&self, request: &GenerationRequest) -> Result<GenerationResult, PipelineError> {
        let text = extract_text(request).await?;
        let schema = ResponseSchema::load(&self.schema_path)?;

        let payload = GenerationPayload {
            text,
            number: request.mcq_count,
            subject: request.subject.clone(),
            tone: request.tone.clone(),
            response_json: schema.to_json_string(),
        };

        let start = Instant::now();
        let output = self
            .generator
            .generate(&payload)
            .await
            .map_err(PipelineError::GenerationService)?;

        tracing::debug!(
            "Response for {} ({} MCQs, subject: {}, tone: {}): {}",
            request.file_name,
            request.mcq_count,
            request.subject,
            request.tone,
            output.value
        );
        tracing::info!(
            "{} generation took {:.2}s - total tokens: {}, prompt tokens: {}, completion tokens: {}",
            self.generator.name(),
            start.elapsed().as_secs_f64(),
            output.usage.total_tokens(),
            output.usage.prompt_tokens,
            output.usage.completion_tokens
        );

        let fields = output.value.as_object().ok_or(PipelineError::EmptyQuiz)?;
        let quiz = fields
            .get("quiz")
            .filter(|v| is_truthy(v))
            .ok_or(PipelineError::EmptyQuiz)?;

        let data = match parse_quiz(quiz) {
            Ok(parsed) => {
                for (key, e) in &parsed.skipped {
                    tracing::warn!("Skipping malformed question {}: {}", key, e);
                }
                if parsed.data.is_empty() && !parsed.skipped.is_empty() {
                    return Err(PipelineError::MalformedQuestions(parsed.skipped.len()));
                }
                parsed.data
            }
            Err(e) if self.strict_quiz_parsing => return Err(PipelineError::QuizParse(e)),
            Err(e) => {
                tracing::warn!("{}; returning an empty quiz", PipelineError::QuizParse(e));
                QuizData::new()
            }
        };

        let review = match fields.get("review") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };

        Ok(GenerationResult::success(data, review))
    }
}

async fn extract_text(request: &GenerationRequest) -> Result<String, PipelineError> {
    let file_name = request.file_name.clone();
    let data = request.data.clone();

    tokio::task::spawn_blocking(move || TextExtractor::extract(&file_name, &data))
        .await
        .map_err(|e| PipelineError::Extraction(Error::internal(format!("Task join error: {}", e))))?
        .map_err(PipelineError::Extraction)
}

/// Questions decoded from a quiz payload, plus the keys that were dropped
struct ParsedQuiz {
    data: QuizData,
    skipped: Vec<(String, serde_json::Error)>,
}

/// Quiz field may be a JSON-encoded string or an already decoded object.
///
/// Only a payload that is not a JSON object is an error; questions with the
/// wrong shape are skipped one by one.
fn parse_quiz(quiz: &Value) -> Result<ParsedQuiz, serde_json::Error> {
    let decoded = match quiz {
        Value::String(raw) => serde_json::from_str(raw)?,
        other => other.clone(),
    };

    let Value::Object(entries) = decoded else {
        return Err(serde::de::Error::custom("quiz is not a JSON object"));
    };

    let mut parsed = ParsedQuiz {
        data: QuizData::new(),
        skipped: Vec::new(),
    };
    for (key, entry) in entries {
        match serde_json::from_value::<Mcq>(entry) {
            Ok(question) => {
                parsed.data.insert(key, question);
            }
            Err(e) => parsed.skipped.push((key, e)),
        }
    }

    Ok(parsed)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
