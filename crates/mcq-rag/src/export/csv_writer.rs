//! CSV rendering of stored MCQ records

use crate::error::{Error, Result};
use crate::storage::{McqStore, StoredRecord};
use crate::types::{ordered_questions, QuizData};

/// Header row of every export
pub const CSV_HEADER: [&str; 3] = ["MCQ", "Choices", "Correct"];

/// A rendered CSV file
#[derive(Debug, Clone)]
pub struct CsvExport {
    /// Attachment file name
    pub filename: String,
    /// CSV document bytes
    pub content: Vec<u8>,
}

/// Attachment name for a record
pub fn export_filename(id: i64) -> String {
    format!("mcqs_{}.csv", id)
}

/// Render a quiz as CSV: header plus one row per question in index order
pub fn render_quiz_csv(quiz: &QuizData) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for (_, question) in ordered_questions(quiz) {
        writer.write_record([
            question.mcq.as_str(),
            question.choices_cell().as_str(),
            question.correct.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| Error::internal(format!("Failed to flush CSV: {}", e)))
}

/// Render a stored record
pub fn render_record(record: &StoredRecord) -> Result<CsvExport> {
    let quiz = record.quiz()?;
    Ok(CsvExport {
        filename: export_filename(record.id),
        content: render_quiz_csv(&quiz)?,
    })
}

/// Look up a record and render it, failing with `NotFound` for unknown ids
pub fn export_record(store: &McqStore, id: i64) -> Result<CsvExport> {
    let record = store.get_or_not_found(id)?;
    render_record(&record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mcq;
    use indexmap::IndexMap;

    fn question(text: &str, options: &[(&str, &str)], correct: &str) -> Mcq {
        Mcq {
            mcq: text.to_string(),
            options: options
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<IndexMap<_, _>>(),
            correct: correct.to_string(),
        }
    }

    fn two_question_quiz() -> QuizData {
        let mut quiz = QuizData::new();
        quiz.insert(
            "2".to_string(),
            question("What color is grass?", &[("a", "Green"), ("b", "Red"), ("c", "Blue")], "a"),
        );
        quiz.insert(
            "1".to_string(),
            question("What color is the sky?", &[("a", "Red"), ("b", "Blue")], "b"),
        );
        quiz
    }

    #[test]
    fn test_two_questions_give_three_lines() {
        let csv = String::from_utf8(render_quiz_csv(&two_question_quiz()).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "MCQ,Choices,Correct");
        assert_eq!(lines[1], "What color is the sky?,a => Red || b => Blue,b");
        assert_eq!(lines[2], "What color is grass?,a => Green || b => Red || c => Blue,a");
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let mut quiz = QuizData::new();
        quiz.insert(
            "1".to_string(),
            question("Red, green, or blue?", &[("a", "Red, mostly"), ("b", "None")], "a"),
        );

        let rendered = render_quiz_csv(&quiz).unwrap();
        let mut reader = csv::Reader::from_reader(rendered.as_slice());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[0], "Red, green, or blue?");
        assert_eq!(&row[1], "a => Red, mostly || b => None");
        assert_eq!(&row[2], "a");
    }

    #[test]
    fn test_unknown_record_is_not_found() {
        let store = McqStore::in_memory().unwrap();
        let err = export_record(&store, 9999).unwrap_err();
        assert!(matches!(err, Error::NotFound(9999)));
    }

    #[test]
    fn test_export_stored_record() {
        let store = McqStore::in_memory().unwrap();
        let id = store.insert(&two_question_quiz(), "moderate").unwrap();

        let export = export_record(&store, id).unwrap();
        assert_eq!(export.filename, format!("mcqs_{}.csv", id));
        assert_eq!(String::from_utf8(export.content).unwrap().lines().count(), 3);
    }

    #[test]
    fn test_empty_quiz_is_header_only() {
        let csv = render_quiz_csv(&QuizData::new()).unwrap();
        assert_eq!(String::from_utf8(csv).unwrap(), "MCQ,Choices,Correct\n");
    }
}
