// ============================================================
// Layer 4 — Text Chunker
// ============================================================
// Splits long documents into consecutive chunks that fit the
// classifier's input budget.
//
// Why do we need chunking?
//   The classifier accepts at most `budget` model tokens
//   (512 by default). A full speech is far longer, and
//   truncating it would score only the opening paragraphs.
//
// How the budget is measured:
//   Not by word count. Each whitespace word is run through the
//   model's own tokenizer (TokenCounter), because one word can
//   become several sub-word tokens ("disarmament" → 3 tokens).
//
// Greedy packing:
//   - add words to the current chunk while the running token
//     count stays <= budget
//   - the word that would overflow closes the chunk and opens
//     the next one
//   - the last non-empty chunk is always emitted
//
// Example with budget=4 and 1 token per word:
//   Document: "A B C D E F G H I J"
//   Chunk 1:  "A B C D"   (words 0-3)
//   Chunk 2:  "E F G H"   (words 4-7)
//   Chunk 3:  "I J"       (words 8-9, last partial chunk)
//
// Chunks never overlap and never skip a word, so joining them
// with single spaces gives back the whitespace-split document.
// A chunk may end mid-sentence.
//
// Reference: Rust Book §8 (Slices)

use anyhow::{Context, Result};
use std::ops::Range;

use crate::domain::traits::TokenCounter;

/// Default classifier input budget in model tokens.
pub const DEFAULT_TOKEN_BUDGET: usize = 512;

/// A contiguous run of whitespace words from one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The words joined with single spaces
    pub text: String,
    /// Word indices covered, into the whitespace-split document
    pub words: Range<usize>,
    /// Model tokens counted for this chunk
    pub token_count: usize,
}

pub struct Chunker {
    /// Maximum model tokens per chunk
    budget: usize,
}

impl Chunker {
    /// Create a new Chunker.
    ///
    /// # Panics
    /// Panics if budget is 0, since no word could ever fit.
    pub fn new(budget: usize) -> Self {
        assert!(budget > 0, "token budget must be positive");
        Self { budget }
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Split `text` into budget-bounded chunks.
    ///
    /// Fails only if the tokenizer fails on a word; the caller
    /// treats that as an unscorable document.
    pub fn chunk(&self, text: &str, counter: &dyn TokenCounter) -> Result<Vec<Chunk>> {
        let words: Vec<&str> = text.split_whitespace().collect();

        // Empty document → nothing to score
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let mut chunks  = Vec::new();
        let mut start   = 0usize;
        let mut running = 0usize;

        for (i, word) in words.iter().enumerate() {
            let cost = counter
                .count_tokens(word)
                .with_context(|| format!("Cannot tokenize word {i} ('{word}')"))?;

            if running + cost > self.budget && i > start {
                chunks.push(Self::make_chunk(&words, start..i, running));
                start   = i;
                running = 0;
            }
            running += cost;
        }

        // Last partial chunk
        chunks.push(Self::make_chunk(&words, start..words.len(), running));

        Ok(chunks)
    }

    fn make_chunk(words: &[&str], range: Range<usize>, token_count: usize) -> Chunk {
        Chunk {
            text: words[range.clone()].join(" "),
            words: range,
            token_count,
        }
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_BUDGET)
    }
}
