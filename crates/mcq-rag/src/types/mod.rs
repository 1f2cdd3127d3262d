//! Core types for the MCQ service

pub mod mcq;
pub mod response;

pub use mcq::{ordered_questions, Mcq, QuizData};
pub use response::{GenerationResult, McqListResponse, McqSummary};
