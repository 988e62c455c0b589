// ============================================================
// Layer 4 — Segmenter
// ============================================================
// Splits normalised text into sentences and word tokens.
//
// Sentences are found in three passes:
//   1. paragraphs: only a blank line ends a paragraph, so hard
//      wrapped lines stay together
//   2. candidate boundaries inside a paragraph come from Unicode
//      Standard Annex #29 (split_sentence_bound_indices)
//   3. a candidate is kept only when the text before it ends in
//      . ! ? or … (closing quotes and brackets allowed) and the
//      last token is not a title or Latin abbreviation such as
//      "Mr." or "e.g."; otherwise it is merged with what follows
//
// Words come from unicode_words(), which skips punctuation, so
// "The war is bad." is four words.
//
// Every method returns a fresh iterator that borrows the input;
// calling it again restarts the sequence.
//
// Whitespace tokens (split_whitespace) are exposed separately
// because the document-level lexical diversity is measured over
// raw whitespace words, punctuation attached.
//
// Reference: unicode-segmentation crate documentation
//            Rust Book §13 (Iterators)

use unicode_segmentation::UnicodeSegmentation;

/// Tokens that end in a period without ending the sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr.", "mrs.", "ms.", "messrs.", "dr.", "prof.", "st.", "sr.", "jr.",
    "gen.", "rev.", "hon.", "e.g.", "i.e.", "vs.",
];

const TERMINATORS: &[char] = &['.', '!', '?', '…'];
const CLOSERS: &[char] = &['"', '\'', ')', ']', '”', '’', '»'];

#[derive(Debug, Clone, Copy, Default)]
pub struct Segmenter;

/// Paragraphs as (byte offset, slice); blank lines separate them.
fn paragraphs(text: &str) -> Vec<(usize, &str)> {
    let mut found  = Vec::new();
    let mut start  = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            if let Some(s) = start.take() {
                found.push((s, &text[s..offset]));
            }
        } else if start.is_none() {
            start = Some(offset);
        }
        offset += line.len();
    }
    if let Some(s) = start {
        found.push((s, &text[s..]));
    }
    found
}

/// Whether a trimmed candidate sentence really ends here.
fn closes_sentence(candidate: &str) -> bool {
    let core = candidate.trim_end_matches(CLOSERS);
    if !core.ends_with(TERMINATORS) {
        return false;
    }
    let last = core.rsplit(char::is_whitespace).next().unwrap_or(core);
    !ABBREVIATIONS.contains(&last.to_lowercase().as_str())
}

impl Segmenter {
    pub fn new() -> Self {
        Self
    }

    /// Sentences in document order, trimmed, empty ones skipped.
    pub fn sentences<'a>(&self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let mut sentences = Vec::new();

        for (base, paragraph) in paragraphs(text) {
            let mut pending: Option<usize> = None;

            for (offset, piece) in paragraph.split_sentence_bound_indices() {
                if piece.trim().is_empty() {
                    continue;
                }
                let begin = pending.unwrap_or(base + offset);
                let end   = base + offset + piece.len();
                let candidate = text[begin..end].trim();

                if closes_sentence(candidate) {
                    sentences.push(candidate);
                    pending = None;
                } else {
                    pending = Some(begin);
                }
            }

            // Paragraph end closes whatever is left
            if let Some(begin) = pending {
                let rest = text[begin..base + paragraph.len()].trim();
                if !rest.is_empty() {
                    sentences.push(rest);
                }
            }
        }

        sentences.into_iter()
    }

    /// Case-preserving word tokens, punctuation excluded.
    pub fn words<'a>(&self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        text.unicode_words()
    }

    /// Lower-cased word tokens, for closed-class rate calculations.
    pub fn lower_words<'a>(&self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        text.unicode_words().map(str::to_lowercase)
    }

    /// Raw whitespace-delimited tokens.
    pub fn whitespace_tokens<'a>(&self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        text.split_whitespace()
    }

    /// Word tokens grouped per sentence.
    pub fn sentence_words<'a>(&self, text: &'a str) -> impl Iterator<Item = Vec<&'a str>> + 'a {
        let words = *self;
        self.sentences(text).map(move |s| words.words(s).collect())
    }
}
