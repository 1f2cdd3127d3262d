//! Prompt templates for quiz generation and chat

use crate::providers::GenerationPayload;
use crate::retrieval::ScoredChunk;

/// Prompt builder for the quiz chain and the chat endpoint
pub struct PromptBuilder;

impl PromptBuilder {
    /// First step of the quiz chain: questions from the document text
    pub fn build_quiz_prompt(payload: &GenerationPayload) -> String {
        format!(
            r#"Text:
{text}

You are an expert MCQ maker. Given the text above, create a quiz of {number} multiple choice questions for {subject} students in a {tone} tone.
Do not repeat questions, and make sure every question can be answered from the text.
Format your response exactly like RESPONSE_JSON below and use it as a guide.
Make exactly {number} MCQs, keyed "1" to "{number}".

### RESPONSE_JSON
{response_json}"#,
            text = payload.text,
            number = payload.number,
            subject = payload.subject,
            tone = payload.tone,
            response_json = payload.response_json,
        )
    }

    /// Second step of the quiz chain: complexity review of the generated quiz
    pub fn build_review_prompt(subject: &str, quiz: &str) -> String {
        format!(
            r#"You are an expert English grammarian and writer. Given a multiple choice quiz for {subject} students,
evaluate the complexity of the questions and give a complete analysis of the quiz in at most 50 words.
If the quiz does not match the cognitive and analytical abilities of the students, say which questions should change and how the tone should be adjusted.

Quiz MCQs:
{quiz}

Review from an expert English writer of the above quiz:"#,
            subject = subject,
            quiz = quiz,
        )
    }

    /// Build the "stuff" context from retrieved chunks
    pub fn build_context(chunks: &[ScoredChunk]) -> String {
        chunks
            .iter()
            .map(|c| c.entry.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Chat prompt grounded on retrieved context
    pub fn build_chat_prompt(context: &str, question: &str) -> String {
        format!(
            r#"Use the following pieces of information to answer the user's question.
If you don't know the answer, just say that you don't know, don't try to make up an answer.

Context: {context}
Question: {question}

Only return the helpful answer below and nothing else.
Helpful answer:"#,
            context = context,
            question = question,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_prompt_carries_payload() {
        let payload = GenerationPayload {
            text: "The sky is blue.".to_string(),
            number: 3,
            subject: "science".to_string(),
            tone: "easy".to_string(),
            response_json: r#"{"1": {"mcq": "..."}}"#.to_string(),
        };

        let prompt = PromptBuilder::build_quiz_prompt(&payload);
        assert!(prompt.contains("The sky is blue."));
        assert!(prompt.contains("quiz of 3 multiple choice"));
        assert!(prompt.contains("science students"));
        assert!(prompt.contains("easy tone"));
        assert!(prompt.ends_with(r#"{"1": {"mcq": "..."}}"#));
    }

    #[test]
    fn test_chat_prompt_orders_context_before_question() {
        let prompt = PromptBuilder::build_chat_prompt("ctx", "why?");
        let ctx = prompt.find("Context: ctx").unwrap();
        let question = prompt.find("Question: why?").unwrap();
        assert!(ctx < question);
    }
}
