//! Text chunking for the chat index

use unicode_segmentation::UnicodeSegmentation;

/// A piece of a source document ready for embedding
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    /// Chunk text, trimmed
    pub text: String,
    /// File the chunk came from
    pub source: String,
    /// Position of the chunk within its source
    pub index: u32,
}

/// Text chunker with configurable size and overlap
pub struct TextChunker {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Overlap between chunks
    overlap: usize,
    /// Minimum chunk size
    min_size: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            overlap: overlap.min(chunk_size),
            min_size: 20,
        }
    }

    /// Split a document's text into overlapping chunks
    pub fn chunk(&self, source: &str, text: &str) -> Vec<TextChunk> {
        let mut chunks = Vec::new();
        let mut current = String::new();

        for piece in self.split_pieces(text) {
            if !current.is_empty() && current.len() + piece.len() > self.chunk_size {
                self.push_chunk(&mut chunks, source, &current);
                current = self.get_overlap_text(&current);
            }
            current.push_str(piece);
        }

        self.push_chunk(&mut chunks, source, &current);
        chunks
    }

    fn push_chunk(&self, chunks: &mut Vec<TextChunk>, source: &str, text: &str) {
        let trimmed = text.trim();
        if trimmed.len() < self.min_size {
            return;
        }
        chunks.push(TextChunk {
            text: trimmed.to_string(),
            source: source.to_string(),
            index: chunks.len() as u32,
        });
    }

    /// Sentences, with over-long sentences broken at word boundaries
    fn split_pieces<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut pieces = Vec::new();
        for sentence in text.split_sentence_bounds() {
            if sentence.len() <= self.chunk_size {
                pieces.push(sentence);
                continue;
            }
            let mut start = 0;
            let mut len = 0;
            for (offset, word) in sentence.split_word_bound_indices() {
                if len > 0 && len + word.len() > self.chunk_size {
                    pieces.push(&sentence[start..offset]);
                    start = offset;
                    len = 0;
                }
                len += word.len();
            }
            if start < sentence.len() {
                pieces.push(&sentence[start..]);
            }
        }
        pieces
    }

    /// Get overlap text from the end of a chunk
    fn get_overlap_text(&self, text: &str) -> String {
        if self.overlap == 0 {
            return String::new();
        }
        if text.len() <= self.overlap {
            return text.to_string();
        }

        let mut start = text.len().saturating_sub(self.overlap);
        while start > 0 && !text.is_char_boundary(start) {
            start -= 1;
        }

        let overlap_text = &text[start..];

        // Prefer starting on a word
        if let Some(pos) = overlap_text.find(' ') {
            return overlap_text[pos + 1..].to_string();
        }

        overlap_text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_chunk() {
        let chunker = TextChunker::new(500, 20);
        let chunks = chunker.chunk("a.pdf", "The sky is blue. The grass is green.");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].source, "a.pdf");
        assert_eq!(chunks[0].index, 0);
    }

    #[test]
    fn test_chunks_respect_size() {
        let chunker = TextChunker::new(100, 20);
        let text = "This sentence is about forty characters. ".repeat(20);
        let chunks = chunker.chunk("long.pdf", &text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.text.len() <= 100 + 20, "chunk too long: {}", chunk.text.len());
        }
        let indices: Vec<u32> = chunks.iter().map(|c| c.index).collect();
        assert_eq!(indices, (0..chunks.len() as u32).collect::<Vec<_>>());
    }

    #[test]
    fn test_long_sentence_is_split_on_words() {
        let chunker = TextChunker::new(50, 0);
        let text = "word ".repeat(60);
        let chunks = chunker.chunk("w.txt", &text);
        assert!(chunks.len() >= 5);
        assert!(chunks.iter().all(|c| c.text.len() <= 50));
    }

    #[test]
    fn test_tiny_text_is_dropped() {
        let chunker = TextChunker::new(500, 20);
        assert!(chunker.chunk("x.pdf", "  hi  ").is_empty());
    }
}
