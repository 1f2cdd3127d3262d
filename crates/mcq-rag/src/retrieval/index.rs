//! JSON-persisted vector index for the chat corpus

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{Error, Result};

/// An embedded chunk of the chat corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: Uuid,
    /// Chunk text
    pub text: String,
    /// Source file name
    pub source: String,
    pub embedding: Vec<f32>,
}

/// Search hit with cosine similarity
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub entry: IndexEntry,
    /// Cosine similarity (-1.0..=1.0, higher is better)
    pub similarity: f32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct IndexFile {
    dimensions: usize,
    created_at: Option<chrono::DateTime<chrono::Utc>>,
    entries: Vec<IndexEntry>,
}

/// Brute-force cosine index, loaded whole into memory
pub struct LocalVectorIndex {
    storage_path: PathBuf,
    inner: RwLock<IndexFile>,
}

impl LocalVectorIndex {
    /// Open the index at `path`; a missing file gives an empty index
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let storage_path = path.into();
        let inner = if storage_path.exists() {
            let data = fs::read_to_string(&storage_path)?;
            serde_json::from_str(&data).map_err(|e| {
                Error::VectorIndex(format!(
                    "Corrupt index {}: {}",
                    storage_path.display(),
                    e
                ))
            })?
        } else {
            tracing::warn!(
                "Vector index {} not found, chat will have no context",
                storage_path.display()
            );
            IndexFile::default()
        };

        tracing::info!("Loaded {} chunks from vector index", inner.entries.len());

        Ok(Self {
            storage_path,
            inner: RwLock::new(inner),
        })
    }

    /// Empty index that will be written to `path`
    pub fn create(path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: path.into(),
            inner: RwLock::new(IndexFile::default()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add an embedded chunk; all embeddings must share one dimension
    pub fn insert(&self, text: String, source: String, embedding: Vec<f32>) -> Result<Uuid> {
        if embedding.is_empty() {
            return Err(Error::VectorIndex("Chunk has no embedding".to_string()));
        }

        let mut inner = self.inner.write();
        if inner.entries.is_empty() {
            inner.dimensions = embedding.len();
        } else if inner.dimensions != embedding.len() {
            return Err(Error::VectorIndex(format!(
                "Embedding has {} dimensions, index expects {}",
                embedding.len(),
                inner.dimensions
            )));
        }

        let id = Uuid::new_v4();
        inner.entries.push(IndexEntry {
            id,
            text,
            source,
            embedding,
        });
        Ok(id)
    }

    /// Top-k entries by cosine similarity
    pub fn search(&self, query: &[f32], top_k: usize) -> Vec<ScoredChunk> {
        let inner = self.inner.read();
        let mut scored: Vec<ScoredChunk> = inner
            .entries
            .iter()
            .filter(|e| e.embedding.len() == query.len())
            .map(|e| ScoredChunk {
                similarity: cosine_similarity(query, &e.embedding),
                entry: e.clone(),
            })
            .collect();

        scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        scored.truncate(top_k);
        scored
    }

    /// Write the index to disk
    pub fn save(&self) -> Result<()> {
        let mut inner = self.inner.write();
        inner.created_at = Some(chrono::Utc::now());
        let data = serde_json::to_string(&*inner)?;

        if let Some(parent) = self.storage_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.storage_path, data)?;
        tracing::info!(
            "Saved {} chunks to {}",
            inner.entries.len(),
            self.storage_path.display()
        );
        Ok(())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
