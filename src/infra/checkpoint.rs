// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores the classifier using Burn's CompactRecorder.
//
// A model directory holds three files:
//
//   model_dir/
//     classifier_config.json  ← architecture + label set
//     model.mpk.gz            ← all learned parameters
//     tokenizer.json          ← HuggingFace tokenizer (see tokenizer_store)
//
// Why save the config separately?
//   When loading for inference, we need to know the exact
//   model architecture (d_model, num_layers, etc.) to rebuild
//   the model before loading the weights into it.
//   Without the config, we can't reconstruct the model.
//
// Burn's CompactRecorder:
//   - Serialises model parameters to MessagePack format
//   - Compresses with gzip for smaller file size
//   - Type-safe: loading fails if architecture doesn't match
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::ml::model::{TransformerClassifier, TransformerClassifierConfig};

const MANIFEST_FILE: &str = "classifier_config.json";
// The recorder appends ".mpk.gz"
const WEIGHTS_STEM: &str = "model";

fn default_fake_label() -> String {
    "fake".to_string()
}

fn default_pad_token() -> String {
    "[PAD]".to_string()
}

fn default_cls_token() -> String {
    "[CLS]".to_string()
}

fn default_sep_token() -> String {
    "[SEP]".to_string()
}

/// Everything needed to rebuild the classifier around its weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierManifest {
    pub model:  TransformerClassifierConfig,
    /// Label names in output order, e.g. ["fake", "real"]
    pub labels: Vec<String>,
    #[serde(default = "default_fake_label")]
    pub fake_label: String,
    #[serde(default = "default_pad_token")]
    pub pad_token: String,
    #[serde(default = "default_cls_token")]
    pub cls_token: String,
    #[serde(default = "default_sep_token")]
    pub sep_token: String,
}

impl ClassifierManifest {
    pub fn new(model: TransformerClassifierConfig, labels: Vec<String>) -> Self {
        Self {
            model,
            labels,
            fake_label: default_fake_label(),
            pad_token:  default_pad_token(),
            cls_token:  default_cls_token(),
            sep_token:  default_sep_token(),
        }
    }

    /// Position of the fake label; the manifest is unusable without it.
    pub fn fake_index(&self) -> Result<usize> {
        if self.labels.len() != self.model.num_labels {
            bail!(
                "manifest lists {} labels but the model has {} outputs",
                self.labels.len(),
                self.model.num_labels
            );
        }
        self.labels
            .iter()
            .position(|l| l.eq_ignore_ascii_case(&self.fake_label))
            .with_context(|| {
                format!("label '{}' not found in {:?}", self.fake_label, self.labels)
            })
    }
}

/// Reads and writes the files of one model directory.
pub struct CheckpointManager {
    /// Path to the model directory
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the manifest written next to the weights.
    pub fn load_manifest(&self) -> Result<ClassifierManifest> {
        let path = self.dir.join(MANIFEST_FILE);

        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read classifier config from '{}'. \
                 Is --model-dir pointing at an exported model?",
                path.display()
            )
        })?;

        // Deserialise JSON back into ClassifierManifest struct
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed classifier config '{}'", path.display()))
    }

    pub fn save_manifest(&self, manifest: &ClassifierManifest) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;
        let path = self.dir.join(MANIFEST_FILE);

        // serde_json::to_string_pretty adds indentation for readability
        fs::write(&path, serde_json::to_string_pretty(manifest)?)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved classifier config to '{}'", path.display());
        Ok(())
    }

    /// Load weights into a freshly initialised model.
    ///
    /// The model must have the architecture the weights were
    /// saved with, or loading fails.
    pub fn load_model<B: Backend>(
        &self,
        model:  TransformerClassifier<B>,
        device: &B::Device,
    ) -> Result<TransformerClassifier<B>> {
        let path = self.dir.join(WEIGHTS_STEM);

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| format!("Cannot load weights '{}.mpk.gz'", path.display()))?;

        tracing::info!("Loaded classifier weights from '{}'", self.dir.display());
        Ok(model.load_record(record))
    }

    /// Write model weights as model.mpk.gz.
    pub fn save_model<B: Backend>(&self, model: &TransformerClassifier<B>) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;
        let path = self.dir.join(WEIGHTS_STEM);

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save weights to '{}'", path.display()))?;

        tracing::debug!("Saved classifier weights to '{}.mpk.gz'", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> ClassifierManifest {
        ClassifierManifest::new(
            TransformerClassifierConfig::new(32, 16, 8, 2, 1, 16),
            vec!["fake".into(), "real".into()],
        )
    }

    #[test]
    fn test_manifest_round_trip_on_disk() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path());
        ckpt.save_manifest(&manifest()).unwrap();

        let loaded = ckpt.load_manifest().unwrap();
        assert_eq!(loaded.labels, vec!["fake", "real"]);
        assert_eq!(loaded.model.d_model, 8);
        assert_eq!(loaded.fake_index().unwrap(), 0);
    }

    #[test]
    fn test_fake_index_requires_matching_labels() {
        let mut m = manifest();
        m.labels = vec!["REAL".into(), "FAKE".into()];
        assert_eq!(m.fake_index().unwrap(), 1);

        m.labels = vec!["true".into(), "false".into()];
        assert!(m.fake_index().is_err());

        m.labels = vec!["fake".into()];
        assert!(m.fake_index().is_err());
    }

    #[test]
    fn test_missing_manifest_mentions_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = CheckpointManager::new(dir.path()).load_manifest().unwrap_err();
        assert!(format!("{err:#}").contains(MANIFEST_FILE));
    }
}
