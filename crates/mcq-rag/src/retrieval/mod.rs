//! Vector index and retrieval-augmented chat

pub mod index;
pub mod qa;

pub use index::{IndexEntry, LocalVectorIndex, ScoredChunk};
pub use qa::RetrievalQa;
