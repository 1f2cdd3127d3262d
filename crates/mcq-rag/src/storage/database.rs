//! SQLite store for generated MCQs
//!
//! One table, one row per successful generation. Rows are never updated.

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::types::{McqSummary, QuizData};

/// A persisted generation result
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    /// Auto-assigned id
    pub id: i64,
    /// JSON-serialized quiz data
    pub mcqs: String,
    /// Review returned by the generator
    pub review: String,
}

impl StoredRecord {
    /// Deserialize the stored questions
    pub fn quiz(&self) -> Result<QuizData> {
        Ok(serde_json::from_str(&self.mcqs)?)
    }
}

/// SQLite-backed MCQ record store
#[derive(Clone)]
pub struct McqStore {
    conn: Arc<Mutex<Connection>>,
}

impl McqStore {
    /// Create or open the database at the given path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        store.migrate()?;
        Ok(store)
    }

    /// Create an in-memory database
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        store.migrate()?;
        Ok(store)
    }

    /// Run database migrations
    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS mcqs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                mcqs TEXT NOT NULL,
                review TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| Error::Internal(format!("Failed to run migrations: {}", e)))?;

        tracing::debug!("MCQ store migrations complete");
        Ok(())
    }

    /// Persist a quiz and its review, returning the new record id
    pub fn insert(&self, quiz: &QuizData, review: &str) -> Result<i64> {
        let mcqs = serde_json::to_string(quiz)?;
        let conn = self.conn.lock();

        conn.execute(
            "INSERT INTO mcqs (mcqs, review) VALUES (?1, ?2)",
            params![mcqs, review],
        )?;

        let id = conn.last_insert_rowid();
        tracing::info!("Stored MCQ record {} ({} questions)", id, quiz.len());
        Ok(id)
    }

    /// Get a record by id
    pub fn get(&self, id: i64) -> Result<Option<StoredRecord>> {
        let conn = self.conn.lock();

        let record = conn
            .query_row(
                "SELECT id, mcqs, review FROM mcqs WHERE id = ?1",
                params![id],
                row_to_record,
            )
            .optional()?;

        Ok(record)
    }

    /// Get a record by id, or `NotFound`
    pub fn get_or_not_found(&self, id: i64) -> Result<StoredRecord> {
        self.get(id)?.ok_or(Error::NotFound(id))
    }

    /// Summaries of all records, newest first
    pub fn list(&self) -> Result<Vec<McqSummary>> {
        let conn = self.conn.lock();

        let mut stmt = conn.prepare("SELECT id, mcqs, review FROM mcqs ORDER BY id DESC")?;
        let records = stmt
            .query_map([], row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records
            .into_iter()
            .map(|record| McqSummary {
                id: record.id,
                question_count: record.quiz().map(|q| q.len()).unwrap_or(0),
                review: record.review,
            })
            .collect())
    }

    /// Number of stored records
    pub fn count(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM mcqs", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<StoredRecord> {
    Ok(StoredRecord {
        id: row.get(0)?,
        mcqs: row.get(1)?,
        review: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mcq;

    fn sample_quiz(n: usize) -> QuizData {
        (1..=n)
            .map(|i| {
                let mut options = indexmap::IndexMap::new();
                options.insert("a".to_string(), format!("Answer {}", i));
                options.insert("b".to_string(), "Other".to_string());
                (
                    i.to_string(),
                    Mcq {
                        mcq: format!("Question {}?", i),
                        options,
                        correct: "a".to_string(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_insert_and_get() {
        let store = McqStore::in_memory().unwrap();
        let quiz = sample_quiz(2);

        let id = store.insert(&quiz, "moderate").unwrap();
        let record = store.get(id).unwrap().unwrap();

        assert_eq!(record.id, id);
        assert_eq!(record.review, "moderate");
        assert_eq!(record.quiz().unwrap(), quiz);
    }

    #[test]
    fn test_ids_are_unique() {
        let store = McqStore::in_memory().unwrap();
        let first = store.insert(&sample_quiz(1), "").unwrap();
        let second = store.insert(&sample_quiz(1), "").unwrap();
        assert_ne!(first, second);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_missing_record() {
        let store = McqStore::in_memory().unwrap();
        assert!(store.get(9999).unwrap().is_none());
        assert!(matches!(
            store.get_or_not_found(9999).unwrap_err(),
            Error::NotFound(9999)
        ));
    }

    #[test]
    fn test_list_newest_first() {
        let store = McqStore::in_memory().unwrap();
        store.insert(&sample_quiz(1), "easy").unwrap();
        store.insert(&sample_quiz(3), "hard").unwrap();

        let list = store.list().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].review, "hard");
        assert_eq!(list[0].question_count, 3);
        assert_eq!(list[1].question_count, 1);
    }

    #[test]
    fn test_list_reports_undecodable_rows() {
        let store = McqStore::in_memory().unwrap();
        store.insert(&sample_quiz(1), "easy").unwrap();
        store
            .conn
            .lock()
            .execute("INSERT INTO mcqs (mcqs, review) VALUES ('{}', X'00FF')", [])
            .unwrap();

        assert!(matches!(store.list().unwrap_err(), Error::Database(_)));
    }

    #[test]
    fn test_file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mcqs.db");

        let id = McqStore::new(&path).unwrap().insert(&sample_quiz(2), "ok").unwrap();
        let reopened = McqStore::new(&path).unwrap();
        assert_eq!(reopened.get(id).unwrap().unwrap().review, "ok");
    }
}
