//! Fakes shared by unit tests

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::providers::{
    ChatAnswerer, Completion, EmbeddingProvider, GenerationPayload, GeneratorOutput, LlmProvider,
    QuizGenerator, TokenUsage,
};

/// JSON-encoded quiz with questions keyed "1".."count"
pub fn quiz_json(count: u32) -> String {
    let quiz: serde_json::Map<String, Value> = (1..=count)
        .map(|i| {
            (
                i.to_string(),
                json!({
                    "mcq": format!("Question {}?", i),
                    "options": {"a": "Blue", "b": "Red", "c": "Green", "d": "Yellow"},
                    "correct": "a",
                }),
            )
        })
        .collect();
    Value::Object(quiz).to_string()
}

/// Write a response schema into `dir` and return its path
pub fn write_schema(dir: &Path) -> PathBuf {
    let path = dir.join("response.json");
    let schema = json!({
        "1": {
            "mcq": "multiple choice question",
            "options": {"a": "choice here", "b": "choice here", "c": "choice here", "d": "choice here"},
            "correct": "correct answer",
        }
    });
    std::fs::write(&path, schema.to_string()).unwrap();
    path
}

/// Generator returning the same value every call
pub struct StaticGenerator {
    value: Value,
    last_payload: Mutex<Option<GenerationPayload>>,
}

impl StaticGenerator {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            last_payload: Mutex::new(None),
        }
    }

    pub fn last_payload(&self) -> Option<GenerationPayload> {
        self.last_payload.lock().clone()
    }
}

#[async_trait]
impl QuizGenerator for StaticGenerator {
    async fn generate(&self, payload: &GenerationPayload) -> Result<GeneratorOutput> {
        *self.last_payload.lock() = Some(payload.clone());
        Ok(GeneratorOutput {
            value: self.value.clone(),
            usage: TokenUsage {
                prompt_tokens: 100,
                completion_tokens: 50,
            },
        })
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Generator that always fails like a rate-limited service
pub struct FailingGenerator;

#[async_trait]
impl QuizGenerator for FailingGenerator {
    async fn generate(&self, _payload: &GenerationPayload) -> Result<GeneratorOutput> {
        Err(Error::llm("rate limited"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Answerer echoing the query back
pub struct EchoAnswerer;

#[async_trait]
impl ChatAnswerer for EchoAnswerer {
    async fn answer(&self, query: &str) -> Result<String> {
        Ok(format!("You asked: {}", query))
    }

    fn name(&self) -> &str {
        "echo"
    }
}

/// Embeds text as letter counts of a, b and c
pub struct LetterEmbedder;

#[async_trait]
impl EmbeddingProvider for LetterEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(['a', 'b', 'c']
            .iter()
            .map(|letter| text.chars().filter(|c| c == letter).count() as f32)
            .collect())
    }

    fn name(&self) -> &str {
        "letters"
    }
}

/// LLM replying with canned responses in order, recording (prompt, json_mode)
pub struct ScriptedLlm {
    responses: Mutex<std::collections::VecDeque<String>>,
    prompts: Mutex<Vec<(String, bool)>>,
}

impl ScriptedLlm {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<(String, bool)> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn complete(&self, prompt: &str, _temperature: f32, json_mode: bool) -> Result<Completion> {
        self.prompts.lock().push((prompt.to_string(), json_mode));
        let text = self
            .responses
            .lock()
            .pop_front()
            .ok_or_else(|| Error::llm("no scripted response left"))?;
        Ok(Completion {
            text,
            usage: TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 5,
            },
        })
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }
}
