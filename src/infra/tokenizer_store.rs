// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Loads the classifier's HuggingFace tokenizer.json and lets
// the Chunker count model tokens with it.
//
// Token counting goes through the TokenCounter trait so the
// data layer never sees a tokenizers type. Special tokens are
// not added when counting: the classifier adds [CLS]/[SEP]
// itself and reserves room for them.
//
// In tokenizers 0.15, train_from_files requires Trainer::Model
// to equal ModelWrapper. Test fixtures therefore build a
// word-level tokenizer JSON by hand and load it back, which
// bypasses the trainer type mismatch entirely.
//
// Reference: https://huggingface.co/docs/tokenizers

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use tokenizers::Tokenizer;

use crate::domain::traits::TokenCounter;

pub const TOKENIZER_FILE: &str = "tokenizer.json";

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(TOKENIZER_FILE)
    }

    /// Load a previously saved tokenizer from JSON file
    pub fn load(&self) -> Result<Tokenizer> {
        load_file(&self.path())
    }
}

pub fn load_file(path: &Path) -> Result<Tokenizer> {
    let tokenizer = Tokenizer::from_file(path)
        .map_err(|e| anyhow!("Cannot load tokenizer from '{}': {}", path.display(), e))?;
    tracing::debug!(
        "Tokenizer loaded from '{}' (vocab {})",
        path.display(),
        tokenizer.get_vocab_size(true)
    );
    Ok(tokenizer)
}

impl TokenCounter for Tokenizer {
    fn count_tokens(&self, text: &str) -> Result<usize> {
        let encoding = self
            .encode(text, false)
            .map_err(|e| anyhow!("tokenise '{}': {}", text, e))?;
        Ok(encoding.get_ids().len())
    }
}
