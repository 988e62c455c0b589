// ============================================================
// Metric Calculators — Lexical Measures
// ============================================================
// Token-level measures that need nothing but the token stream:
//
//   mattr()             — Moving Average Type-Token Ratio
//   closed_class_rate() — share of tokens from a fixed word list
//   average_sentence_length()
//
// MATTR
//   Slide a window of W tokens across the text one token at a
//   time; for every window take distinct/W; average over all
//   windows. A text with n >= W tokens has n - W + 1 windows.
//   If n < W the window shrinks to n, giving exactly one window
//   whose ratio is distinct(text)/n.
//
//   Counts are kept in a HashMap and updated as the window
//   slides, so the whole pass is O(n) rather than O(n·W).

use std::collections::HashMap;
use std::hash::Hash;

use crate::data::segmenter::Segmenter;

/// Window used for the document-level lexical diversity.
pub const DOCUMENT_WINDOW: usize = 100;

/// Window used for the corpus-level moving type-token ratio.
pub const CORPUS_WINDOW: usize = 500;

/// Negation words counted by the negation rate.
pub const NEGATION_WORDS: &[&str] = &[
    "no", "none", "not", "nothing", "nobody", "nowhere", "neither", "nor", "never",
];

/// First-person-singular pronouns.
pub const FIRST_PERSON_SINGULAR: &[&str] = &["i", "me", "my", "mine", "myself"];

/// Number of windows MATTR averages over for `n` tokens.
pub fn window_count(n: usize, window: usize) -> usize {
    match effective_window(n, window) {
        0 => 0,
        w => n - w + 1,
    }
}

fn effective_window(n: usize, window: usize) -> usize {
    if window == 0 { n } else { window.min(n) }
}

/// Moving Average Type-Token Ratio; None for an empty token list.
pub fn mattr<T: Eq + Hash>(tokens: &[T], window: usize) -> Option<f64> {
    let n = tokens.len();
    let w = effective_window(n, window);
    if w == 0 {
        return None;
    }

    let mut counts: HashMap<&T, usize> = HashMap::with_capacity(w);
    for t in &tokens[..w] {
        *counts.entry(t).or_insert(0) += 1;
    }

    let mut ratio_sum = counts.len() as f64 / w as f64;

    for i in w..n {
        let leaving = &tokens[i - w];
        if let Some(c) = counts.get_mut(leaving) {
            *c -= 1;
            if *c == 0 {
                counts.remove(leaving);
            }
        }
        *counts.entry(&tokens[i]).or_insert(0) += 1;
        ratio_sum += counts.len() as f64 / w as f64;
    }

    Some(ratio_sum / window_count(n, window) as f64)
}

/// Fraction of `tokens` that appear in `words`.
/// Tokens are expected to be lower-cased already. 0.0 when no
/// token matches, None only when there are no tokens.
pub fn closed_class_rate<S: AsRef<str>>(tokens: &[S], words: &[&str]) -> Option<f64> {
    if tokens.is_empty() {
        return None;
    }
    let hits = tokens
        .iter()
        .filter(|t| words.contains(&t.as_ref()))
        .count();
    Some(hits as f64 / tokens.len() as f64)
}

/// Mean number of word tokens per sentence. Punctuation-only
/// sentences ("...") have no words and are not counted.
pub fn average_sentence_length(segmenter: &Segmenter, text: &str) -> Option<f64> {
    let (sentences, words) = segmenter
        .sentence_words(text)
        .filter(|sentence| !sentence.is_empty())
        .fold((0usize, 0usize), |(s, w), sentence| (s + 1, w + sentence.len()));
    if sentences == 0 {
        return None;
    }
    Some(words as f64 / sentences as f64)
}
