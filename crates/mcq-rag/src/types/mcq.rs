//! Multiple-choice question types

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A single multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mcq {
    /// Question text
    pub mcq: String,
    /// Choice letter -> choice text, in the order the generator produced them
    pub options: IndexMap<String, String>,
    /// Letter of the correct choice
    pub correct: String,
}

impl Mcq {
    /// Render the options as `a => text || b => text`
    pub fn choices_cell(&self) -> String {
        self.options
            .iter()
            .map(|(letter, text)| format!("{} => {}", letter, text))
            .collect::<Vec<_>>()
            .join(" || ")
    }
}

/// Question index ("1", "2", ...) -> question
pub type QuizData = IndexMap<String, Mcq>;

/// Questions of a quiz ordered by ascending numeric index.
///
/// Keys that are not integers sort after the numeric ones, lexicographically.
pub fn ordered_questions(quiz: &QuizData) -> Vec<(&String, &Mcq)> {
    let mut questions: Vec<_> = quiz.iter().collect();
    questions.sort_by(|(a, _), (b, _)| compare_question_keys(a, b));
    questions
}

fn compare_question_keys(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<u64>(), b.trim().parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
