//! Document text extraction and chunking

mod chunker;
mod parser;

pub use chunker::{TextChunk, TextChunker};
pub use parser::{DocumentFormat, TextExtractor, PDF_READ_ERROR};
