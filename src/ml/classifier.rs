// ============================================================
// Layer 5 — Burn Classifier
// ============================================================
// Implements the domain Classifier trait on top of the burn
// transformer and a HuggingFace tokenizer.
//
// Per input:
//   1. tokenise without special tokens
//   2. build [CLS] ids… [SEP], truncated to max_seq_len
//   3. pad with [PAD] up to max_seq_len; padding is masked
//   4. forward pass → logits → softmax over the label set
//
// Runs on the CPU NdArray backend. The model sits behind a
// Mutex so one loaded classifier can be shared across threads.
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §6 (Backends)

use anyhow::{anyhow, bail, Context, Result};
use burn::prelude::*;
use std::path::Path;
use std::sync::Mutex;
use tokenizers::Tokenizer;

use crate::domain::traits::{Classifier, TokenCounter};
use crate::infra::checkpoint::{CheckpointManager, ClassifierManifest};
use crate::infra::tokenizer_store::TokenizerStore;
use crate::ml::model::TransformerClassifier;

type InferBackend = burn::backend::NdArray;
type InferDevice  = burn::backend::ndarray::NdArrayDevice;

pub struct BurnClassifier {
    model:       Mutex<TransformerClassifier<InferBackend>>,
    tokenizer:   Tokenizer,
    labels:      Vec<String>,
    fake_index:  usize,
    max_seq_len: usize,
    pad_id:      u32,
    cls_id:      u32,
    sep_id:      u32,
    device:      InferDevice,
}

impl BurnClassifier {
    /// Load manifest, weights and tokenizer from a model directory.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let device   = InferDevice::default();
        let ckpt     = CheckpointManager::new(model_dir);
        let manifest = ckpt.load_manifest()?;

        let model: TransformerClassifier<InferBackend> = manifest.model.init(&device);
        let model     = ckpt.load_model(model, &device)?;
        let tokenizer = TokenizerStore::new(model_dir).load()?;

        let classifier = Self::from_parts(manifest, model, tokenizer)?;
        tracing::info!(
            "Classifier ready: labels {:?}, max_seq_len {}",
            classifier.labels,
            classifier.max_seq_len
        );
        Ok(classifier)
    }

    /// Assemble a classifier from already-loaded pieces.
    pub fn from_parts(
        manifest:  ClassifierManifest,
        model:     TransformerClassifier<InferBackend>,
        tokenizer: Tokenizer,
    ) -> Result<Self> {
        let fake_index  = manifest.fake_index()?;
        let max_seq_len = manifest.model.max_seq_len;
        if max_seq_len < 3 {
            bail!("max_seq_len {} leaves no room for text", max_seq_len);
        }

        let special = |token: &str| {
            tokenizer
                .token_to_id(token)
                .with_context(|| format!("tokenizer has no '{token}' token"))
        };
        let pad_id = special(&manifest.pad_token)?;
        let cls_id = special(&manifest.cls_token)?;
        let sep_id = special(&manifest.sep_token)?;

        // An id past the embedding table would panic inside the forward pass
        let max_id = tokenizer.get_vocab(true).into_values().max().unwrap_or(0);
        if max_id as usize >= manifest.model.vocab_size {
            bail!(
                "tokenizer id {} exceeds model vocab_size {}",
                max_id,
                manifest.model.vocab_size
            );
        }

        Ok(Self {
            model: Mutex::new(model),
            tokenizer,
            labels: manifest.labels,
            fake_index,
            max_seq_len,
            pad_id,
            cls_id,
            sep_id,
            device: InferDevice::default(),
        })
    }

    /// [CLS] ids… [SEP] [PAD]…, exactly max_seq_len long.
    fn encode(&self, text: &str) -> Result<Vec<i32>> {
        let enc = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| anyhow!("tokenise: {e}"))?;

        let mut input_ids: Vec<u32> = Vec::with_capacity(self.max_seq_len);
        input_ids.push(self.cls_id);
        input_ids.extend(enc.get_ids().iter().take(self.max_tokens()));
        input_ids.push(self.sep_id);
        input_ids.resize(self.max_seq_len, self.pad_id);

        Ok(input_ids.into_iter().map(|x| x as i32).collect())
    }
}

impl Classifier for BurnClassifier {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn fake_index(&self) -> usize {
        self.fake_index
    }

    fn max_tokens(&self) -> usize {
        // room for [CLS] and [SEP]
        self.max_seq_len - 2
    }

    fn tokenizer(&self) -> &dyn TokenCounter {
        &self.tokenizer
    }

    fn classify(&self, text: &str) -> Result<Vec<f32>> {
        let input_ids = self.encode(text)?;

        let input_tensor = Tensor::<InferBackend, 1, Int>::from_ints(
            input_ids.as_slice(), &self.device,
        ).unsqueeze::<2>();
        let pad_mask = input_tensor.clone().equal_elem(self.pad_id as i32);

        let logits = {
            let model = self
                .model
                .lock()
                .map_err(|_| anyhow!("classifier model lock poisoned"))?;
            model.forward(input_tensor, pad_mask)
        };

        let probs = burn::tensor::activation::softmax(logits, 1)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("reading classifier output: {e:?}"))?;

        tracing::trace!("classify → {:?}", probs);
        Ok(probs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::write_tiny_model;

    const WORDS: &[&str] = &["peace", "war", "nations", "security", "council"];

    #[test]
    fn test_load_and_classify() {
        let dir = tempfile::tempdir().unwrap();
        write_tiny_model(dir.path(), WORDS, 16).unwrap();

        let clf   = BurnClassifier::load(dir.path()).unwrap();
        let probs = clf.classify("peace and security").unwrap();
        assert_eq!(probs.len(), 2);
        assert!((probs.iter().sum::<f32>() - 1.0).abs() < 1e-4);
        assert_eq!(clf.labels(), &["fake".to_string(), "real".to_string()]);
        assert_eq!(clf.max_tokens(), 14);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        write_tiny_model(dir.path(), WORDS, 16).unwrap();

        let clf = BurnClassifier::load(dir.path()).unwrap();
        let a = clf.fake_probability("war in the council").unwrap();
        let b = clf.fake_probability("war in the council").unwrap();
        assert_eq!(a, b);
        assert!((0.0..=1.0).contains(&a));
    }

    #[test]
    fn test_long_input_is_truncated() {
        let dir = tempfile::tempdir().unwrap();
        write_tiny_model(dir.path(), WORDS, 8).unwrap();

        let clf  = BurnClassifier::load(dir.path()).unwrap();
        let long = "peace war ".repeat(50);
        let ids  = clf.encode(&long).unwrap();
        assert_eq!(ids.len(), 8);
        assert_eq!(ids[0], clf.cls_id as i32);
        assert_eq!(ids[7], clf.sep_id as i32);
        assert!(clf.classify(&long).is_ok());
    }

    #[test]
    fn test_short_input_is_padded() {
        let dir = tempfile::tempdir().unwrap();
        write_tiny_model(dir.path(), WORDS, 8).unwrap();

        let clf = BurnClassifier::load(dir.path()).unwrap();
        let ids = clf.encode("war").unwrap();
        assert_eq!(ids.len(), 8);
        assert_eq!(ids[2], clf.sep_id as i32);
        assert!(ids[3..].iter().all(|&id| id == clf.pad_id as i32));
    }

    #[test]
    fn test_tokenizer_counts_for_chunking() {
        let dir = tempfile::tempdir().unwrap();
        write_tiny_model(dir.path(), WORDS, 16).unwrap();

        let clf = BurnClassifier::load(dir.path()).unwrap();
        assert_eq!(clf.tokenizer().count_tokens("peace, war").unwrap(), 3);
    }

    #[test]
    fn test_missing_model_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(BurnClassifier::load(&dir.path().join("nope")).is_err());
    }
}
