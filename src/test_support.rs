// Shared fixtures for unit tests: on-disk corpora, a hand-built
// word-level tokenizer, a tiny random classifier and a scripted
// classifier double.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::{fs, path::PathBuf};
use tempfile::TempDir;
use tokenizers::Tokenizer;

use crate::data::loader::SessionFolderSource;
use crate::domain::traits::{Classifier, TokenCounter};
use crate::infra::checkpoint::{CheckpointManager, ClassifierManifest};
use crate::infra::tokenizer_store::{self, TOKENIZER_FILE};
use crate::ml::model::{TransformerClassifier, TransformerClassifierConfig};

// ─── Corpus on disk ──────────────────────────────────────────────────────────

/// Builds a "Session NN - YYYY" corpus inside a temp directory.
pub struct CorpusBuilder {
    files:    Vec<(i32, String, Vec<u8>)>,
    sessions: Vec<i32>,
}

impl CorpusBuilder {
    pub fn new() -> Self {
        Self { files: Vec::new(), sessions: Vec::new() }
    }

    pub fn document(mut self, year: i32, filename: &str, text: &str) -> Self {
        self.files.push((year, filename.to_string(), text.as_bytes().to_vec()));
        self
    }

    pub fn empty_session(mut self, year: i32) -> Self {
        self.sessions.push(year);
        self
    }

    pub fn build(self) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let session_dir = |year: i32| -> PathBuf {
            let path = SessionFolderSource::new(dir.path())
                .session_dir(year)
                .expect("test corpora use years from 1946 on");
            fs::create_dir_all(&path).unwrap();
            path
        };
        for year in self.sessions {
            session_dir(year);
        }
        for (year, name, bytes) in self.files {
            fs::write(session_dir(year).join(name), bytes).unwrap();
        }
        dir
    }
}

// ─── Tokenizer and model files ───────────────────────────────────────────────

/// Write a word-level tokenizer.json (BERT special-token ids,
/// lower-casing, whitespace pre-tokenizer) and load it back.
pub fn write_word_level_tokenizer(dir: &Path, words: &[&str]) -> Result<Tokenizer> {
    fs::create_dir_all(dir)?;

    // Special tokens get fixed IDs matching BERT convention
    let mut vocab = serde_json::json!({
        "[PAD]":  0,
        "[UNK]":  1,
        "[CLS]":  101,
        "[SEP]":  102,
        "[MASK]": 103,
    });
    for (i, word) in words.iter().enumerate() {
        vocab[*word] = serde_json::json!(104 + i);
    }

    let special = |id: u32, content: &str| {
        serde_json::json!({
            "id": id, "content": content, "single_word": false, "lstrip": false,
            "rstrip": false, "normalized": false, "special": true
        })
    };

    let tokenizer_json = serde_json::json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [
            special(0, "[PAD]"),
            special(1, "[UNK]"),
            special(101, "[CLS]"),
            special(102, "[SEP]"),
            special(103, "[MASK]"),
        ],
        "normalizer": {
            "type": "BertNormalizer",
            "clean_text": true,
            "handle_chinese_chars": true,
            "strip_accents": null,
            "lowercase": true
        },
        "pre_tokenizer": { "type": "Whitespace" },
        "post_processor": null,
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": vocab,
            "unk_token": "[UNK]"
        }
    });

    let path = dir.join(TOKENIZER_FILE);
    fs::write(&path, serde_json::to_string_pretty(&tokenizer_json)?)
        .context("Cannot write tokenizer JSON")?;
    tokenizer_store::load_file(&path)
}

/// Write a complete model directory holding a randomly
/// initialised one-layer classifier over `words`.
pub fn write_tiny_model(dir: &Path, words: &[&str], max_seq_len: usize) -> Result<()> {
    write_word_level_tokenizer(dir, words)?;

    let vocab_size = 104 + words.len();
    let config     = TransformerClassifierConfig::new(vocab_size, max_seq_len, 8, 2, 1, 16);
    let device     = Default::default();
    let model: TransformerClassifier<burn::backend::NdArray> = config.init(&device);

    let ckpt = CheckpointManager::new(dir);
    ckpt.save_model(&model)?;
    ckpt.save_manifest(&ClassifierManifest::new(config, vec!["fake".into(), "real".into()]))
}

// ─── Classifier double ───────────────────────────────────────────────────────

/// One token per whitespace word.
pub struct PerWord;

impl TokenCounter for PerWord {
    fn count_tokens(&self, text: &str) -> Result<usize> {
        Ok(text.split_whitespace().count())
    }
}

enum Script {
    Keyword { word: String, hit: f32, miss: f32 },
    Constant(f32),
    Failing,
}

/// Classifier with scripted outputs over ["fake", "real"].
pub struct FixedClassifier {
    labels: Vec<String>,
    script: Script,
}

impl FixedClassifier {
    fn with(script: Script) -> Self {
        Self { labels: vec!["fake".into(), "real".into()], script }
    }

    /// `hit` when the input contains `word`, `miss` otherwise.
    pub fn keyword(word: &str, hit: f32, miss: f32) -> Self {
        Self::with(Script::Keyword { word: word.to_string(), hit, miss })
    }

    pub fn constant(p: f32) -> Self {
        Self::with(Script::Constant(p))
    }

    pub fn failing() -> Self {
        Self::with(Script::Failing)
    }
}

impl Classifier for FixedClassifier {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn fake_index(&self) -> usize {
        0
    }

    fn max_tokens(&self) -> usize {
        512
    }

    fn tokenizer(&self) -> &dyn TokenCounter {
        &PerWord
    }

    fn classify(&self, text: &str) -> Result<Vec<f32>> {
        let p = match &self.script {
            Script::Keyword { word, hit, miss } => {
                if text.contains(word.as_str()) { *hit } else { *miss }
            }
            Script::Constant(p) => *p,
            Script::Failing => bail!("model unavailable"),
        };
        Ok(vec![p, 1.0 - p])
    }
}
