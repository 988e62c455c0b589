// ============================================================
// Metric Calculators — Reading Ease
// ============================================================
// Flesch reading ease:
//
//   206.835 - 1.015 * (words / sentences) - 84.6 * (syllables / words)
//
// Higher is easier; plain English lands around 60-70, dense
// diplomatic prose often below 30.
//
// Syllables come from the pronouncing dictionary when one is
// loaded and knows the word; otherwise every run of vowels
// (a, e, i, o, u, y) counts as one syllable.

use regex::Regex;
use std::sync::Arc;

use crate::data::segmenter::Segmenter;
use crate::infra::pronouncing::PronouncingDictionary;

pub struct SyllableCounter {
    dictionary: Option<Arc<PronouncingDictionary>>,
    vowel_runs: Regex,
}

impl SyllableCounter {
    /// Counter using only the vowel-cluster heuristic.
    pub fn heuristic() -> Self {
        Self {
            dictionary: None,
            vowel_runs: Regex::new(r"[aeiouy]+").expect("vowel pattern is a valid regex"),
        }
    }

    /// Counter that consults `dictionary` first.
    pub fn with_dictionary(dictionary: Arc<PronouncingDictionary>) -> Self {
        Self {
            dictionary: Some(dictionary),
            ..Self::heuristic()
        }
    }

    pub fn count(&self, word: &str) -> usize {
        let word = word.to_lowercase();
        if let Some(n) = self.dictionary.as_ref().and_then(|d| d.syllables(&word)) {
            return n;
        }
        self.vowel_runs.find_iter(&word).count()
    }
}

impl Default for SyllableCounter {
    fn default() -> Self {
        Self::heuristic()
    }
}

/// Flesch reading ease; None when there are no sentences or no words.
pub fn reading_ease(segmenter: &Segmenter, syllables: &SyllableCounter, text: &str) -> Option<f64> {
    let sentences = segmenter.sentences(text).count();
    let (words, syllable_total) = segmenter
        .words(text)
        .fold((0usize, 0usize), |(w, s), word| (w + 1, s + syllables.count(word)));

    if sentences == 0 || words == 0 {
        return None;
    }

    let words = words as f64;
    Some(206.835 - 1.015 * (words / sentences as f64) - 84.6 * (syllable_total as f64 / words))
}
