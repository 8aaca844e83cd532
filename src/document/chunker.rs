use crate::document::{Chunk, Document};

/// Boundary kinds tried in order, largest granularity first. Raw character
/// position is the final fallback when no separator fits in the window.
const SEPARATORS: [&str; 5] = ["\n\n", ". ", "! ", "? ", " "];

/// Splits text into overlapping windows bounded by `chunk_size`.
///
/// Split points are found by recursive boundary search: paragraph breaks
/// first, then sentence ends, then spaces, then a raw character cut. Each
/// chunk after the first begins `chunk_overlap` characters before the
/// previous chunk's end, so adjacent chunks share exactly that many
/// characters and the original text can be reconstructed by dropping each
/// later chunk's overlap prefix.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    /// `chunk_overlap` must be smaller than `chunk_size`; the config layer
    /// rejects other combinations before a splitter is built.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        assert!(chunk_overlap < chunk_size, "overlap must be smaller than chunk size");
        Self { chunk_size, chunk_overlap }
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            if text.len() - start <= self.chunk_size {
                chunks.push(text[start..].to_string());
                break;
            }

            let end = self.find_split_point(text, start);
            chunks.push(text[start..end].to_string());

            // Back up by the overlap so the next chunk repeats the tail of
            // this one. `end` always clears start + overlap, so the cursor
            // strictly advances.
            start = floor_char_boundary(text, end - self.chunk_overlap);
        }

        chunks
    }

    pub fn split_document(&self, document: &Document) -> Vec<Chunk> {
        self.split(&document.text)
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let mut metadata = document.metadata.clone();
                metadata.insert("chunk_index".to_string(), i.to_string());
                Chunk {
                    id: format!("{}_{}", document.id, i),
                    text,
                    metadata,
                }
            })
            .collect()
    }

    /// Find the end of the chunk starting at `start`.
    ///
    /// Scans the window `[start, start + chunk_size]` for the latest
    /// occurrence of each separator in turn; the first granularity that
    /// yields a cut past the overlap region wins. A cut inside the overlap
    /// region would stall the cursor, so such candidates are rejected and
    /// the search falls through to the next granularity.
    fn find_split_point(&self, text: &str, start: usize) -> usize {
        let hard_end = floor_char_boundary(text, start + self.chunk_size);
        let window = &text[start..hard_end];
        let min_end = start + self.chunk_overlap + 1;

        for separator in SEPARATORS {
            if let Some(pos) = window.rfind(separator) {
                let end = start + pos + separator.len();
                if end >= min_end {
                    return end;
                }
            }
        }

        hard_end.max(ceil_char_boundary(text, min_end))
    }
}

/// Smallest index `>= at` that lies on a char boundary (capped at the end).
fn ceil_char_boundary(text: &str, at: usize) -> usize {
    let mut index = at.min(text.len());
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

/// Largest index `<= at` that lies on a char boundary.
fn floor_char_boundary(text: &str, at: usize) -> usize {
    if at >= text.len() {
        return text.len();
    }
    let mut index = at;
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}
