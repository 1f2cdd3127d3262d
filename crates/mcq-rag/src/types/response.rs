//! Response types returned by the MCQ endpoints

use serde::{Deserialize, Serialize};

use super::mcq::QuizData;

/// Message of a successful generation
pub const QUIZ_CREATED: &str = "Quiz created successfully!";

/// Message when the generator produced no quiz
pub const QUIZ_NOT_GENERATED: &str = "Quiz wasn't generated!";

/// Review placeholder on failures
pub const REVIEW_NA: &str = "NA";

/// Outcome of a generation call.
///
/// Success carries `status_code == 200`, failure carries `400` with empty
/// `data` and review `"NA"`. Callers tell them apart by `status_code` only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Generated questions keyed by index
    pub data: QuizData,
    /// Human-readable outcome
    pub message: String,
    /// Complexity review from the generator
    pub review: String,
    /// 200 on success, 400 on failure
    pub status_code: u16,
    /// Id of the stored record, set once the result is persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcq_id: Option<i64>,
}

impl GenerationResult {
    /// Successful generation
    pub fn success(data: QuizData, review: impl Into<String>) -> Self {
        Self {
            data,
            message: QUIZ_CREATED.to_string(),
            review: review.into(),
            status_code: 200,
            mcq_id: None,
        }
    }

    /// Failed generation
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            data: QuizData::new(),
            message: message.into(),
            review: REVIEW_NA.to_string(),
            status_code: 400,
            mcq_id: None,
        }
    }

    /// True when the result should be persisted
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

/// Listing entry for a stored record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McqSummary {
    /// Record id
    pub id: i64,
    /// Number of questions in the record
    pub question_count: usize,
    /// Review stored with the record
    pub review: String,
}

/// Response of the listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McqListResponse {
    pub records: Vec<McqSummary>,
    pub total: usize,
}
