//! Storage module for persistent data storage
//!
//! Provides SQLite-based persistence for generated MCQs.

mod database;

pub use database::{McqStore, StoredRecord};
