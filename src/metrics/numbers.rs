// ============================================================
// Metric Calculators — Meaningful-Number Density
// ============================================================
// Counts numbers that carry information ("fifty", "1,500",
// "3.5", "1946") and divides by the word-token count.
//
// Bare one- and two-digit numbers are dropped: in these
// transcripts they are overwhelmingly page and paragraph
// references left over from conversion, not content.

use regex::Regex;

use crate::data::segmenter::Segmenter;

const NUMBER_WORDS: &[&str] = &[
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen",
    "eighteen", "nineteen", "twenty", "thirty", "forty", "fifty", "sixty", "seventy",
    "eighty", "ninety", "hundred", "thousand", "million", "billion", "trillion",
];

pub struct NumberMatcher {
    pattern: Regex,
    short:   Regex,
}

impl NumberMatcher {
    pub fn new() -> Self {
        let words = NUMBER_WORDS.join("|");
        let pattern = format!(r"(?i)\b(?:{words})\b|\b\d+(?:[.,]\d+)?\b");
        Self {
            pattern: Regex::new(&pattern).expect("number pattern is a valid regex"),
            short:   Regex::new(r"^\d{1,2}$").expect("short number pattern is a valid regex"),
        }
    }

    /// Every meaningful number mention, in text order.
    pub fn find<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pattern
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(move |m| !self.short.is_match(m))
    }

    /// Meaningful numbers per word token; None without word tokens.
    pub fn density(&self, segmenter: &Segmenter, text: &str) -> Option<f64> {
        let words = segmenter.words(text).count();
        if words == 0 {
            return None;
        }
        Some(self.find(text).count() as f64 / words as f64)
    }
}

impl Default for NumberMatcher {
    fn default() -> Self {
        Self::new()
    }
}
