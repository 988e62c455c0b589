// ============================================================
// Layer 6 — Pronouncing Dictionary
// ============================================================
// Loads a CMU Pronouncing Dictionary file for syllable counts.
//
// File format (cmudict-0.7b / cmudict.dict):
//   ;;; comment lines start with three semicolons
//   ABANDON  AH0 B AE1 N D AH0 N
//   ABANDON(1)  ...alternative pronunciation
//
// Vowel phonemes carry a stress digit (AH0, AE1, ...), so the
// syllable count of a pronunciation is the number of phonemes
// ending in a digit. Words with several pronunciations keep the
// largest count.
//
// Reference: http://www.speech.cs.cmu.edu/cgi-bin/cmudict

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::{fs, path::Path};

#[derive(Debug, Clone, Default)]
pub struct PronouncingDictionary {
    syllables: HashMap<String, usize>,
}

impl PronouncingDictionary {
    /// Load a dictionary file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Cannot read pronouncing dictionary '{}'", path.display()))?;
        let dict = Self::parse(&text);
        tracing::info!(
            "Loaded pronouncing dictionary with {} words from '{}'",
            dict.len(),
            path.display()
        );
        Ok(dict)
    }

    /// Parse dictionary text. Malformed lines are skipped.
    pub fn parse(text: &str) -> Self {
        let mut syllables: HashMap<String, usize> = HashMap::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }

            let mut parts = line.split_whitespace();
            let Some(head) = parts.next() else { continue };

            // "ABANDON(1)" → "abandon"
            let word = head
                .split('(')
                .next()
                .unwrap_or(head)
                .to_lowercase();

            let count = parts
                .filter(|p| p.ends_with(|c: char| c.is_ascii_digit()))
                .count();

            let entry = syllables.entry(word).or_insert(0);
            *entry = (*entry).max(count);
        }

        Self { syllables }
    }

    /// Syllables for a lower-cased word, if the dictionary knows it.
    pub fn syllables(&self, word: &str) -> Option<usize> {
        self.syllables.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.syllables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.syllables.is_empty()
    }
}
