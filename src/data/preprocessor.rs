// ============================================================
// Layer 4 — Text Normalizer
// ============================================================
// Strips enumeration labels from raw transcript text.
//
// Why do we need this?
//   The transcripts were converted from numbered paragraphs,
//   so many lines start with "74. " or "75. ". Those numbers
//   would otherwise be counted as tokens, as numbers, and as
//   syllables, and every metric would drift.
//
// Two scopes are supported:
//   LineStart (default) — only labels at the start of a line,
//                         the rest of the line and all newlines
//                         are preserved
//   Anywhere            — any "\b<digits>.<space>" in the text,
//                         what the per-sentence model scoring
//                         used
//
// Both scopes are idempotent: normalize(normalize(t)) == normalize(t).
//
// Reference: regex crate documentation (multi-line mode)

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelScope {
    #[default]
    LineStart,
    Anywhere,
}

impl std::str::FromStr for LabelScope {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "line-start" => Ok(Self::LineStart),
            "anywhere"   => Ok(Self::Anywhere),
            other => anyhow::bail!(
                "unknown label scope '{}' (expected 'line-start' or 'anywhere')",
                other
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    scope:   LabelScope,
    pattern: Regex,
}

impl Normalizer {
    /// Build a normalizer for the given label scope.
    pub fn new(scope: LabelScope) -> Self {
        let pattern = match scope {
            // `[^\S\n]` is "whitespace except newline" so the match
            // never swallows the line break. The repetition removes
            // stacked labels like "1. 2. " in one pass.
            LabelScope::LineStart => r"(?m)^(?:\d+\.[^\S\n]+)+",
            LabelScope::Anywhere  => r"\b\d+\.\s+",
        };
        Self {
            scope,
            pattern: Regex::new(pattern).expect("label pattern is a valid regex"),
        }
    }

    /// Remove enumeration labels and return the cleaned text.
    pub fn normalize(&self, text: &str) -> String {
        let mut current = self.pattern.replace_all(text, "").into_owned();

        // Removing a label mid-text can glue two fragments into a new
        // label ("1. 2. x" with Anywhere), so repeat until stable.
        if self.scope == LabelScope::Anywhere {
            loop {
                let next = self.pattern.replace_all(&current, "");
                if next == current {
                    break;
                }
                current = next.into_owned();
            }
        }

        current
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(LabelScope::default())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_line_leading_labels() {
        let n = Normalizer::default();
        let input = "1. The war is bad.\n2. It harms people.";
        assert_eq!(n.normalize(input), "The war is bad.\nIt harms people.");
    }

    #[test]
    fn test_keeps_mid_line_numbers() {
        let n = Normalizer::default();
        assert_eq!(
            n.normalize("We met in 1946. 51 states joined."),
            "We met in 1946. 51 states joined."
        );
    }

    #[test]
    fn test_preserves_line_structure() {
        let n = Normalizer::default();
        let input = "74. First paragraph\n\nplain line\n75.  Second";
        assert_eq!(n.normalize(input), "First paragraph\n\nplain line\nSecond");
    }

    #[test]
    fn test_label_without_space_is_kept() {
        let n = Normalizer::default();
        assert_eq!(n.normalize("3.5 percent\n12.\nnext"), "3.5 percent\n12.\nnext");
    }

    #[test]
    fn test_line_start_is_idempotent() {
        let n = Normalizer::default();
        for input in [
            "1. 2. 3. stacked labels",
            "10. a\n  11. indented\n12. b",
            "",
            "no labels at all",
            "7. \n8. ",
        ] {
            let once = n.normalize(input);
            assert_eq!(n.normalize(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_anywhere_scope_strips_inline_labels() {
        let n = Normalizer::new(LabelScope::Anywhere);
        assert_eq!(
            n.normalize("1. The war is bad. 2. It harms people."),
            "The war is bad. It harms people."
        );
    }

    #[test]
    fn test_anywhere_scope_is_idempotent() {
        let n = Normalizer::new(LabelScope::Anywhere);
        for input in ["1. 2. x", "a 3.3. b", "see 4.  and 5. also"] {
            let once = n.normalize(input);
            assert_eq!(n.normalize(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_empty_string() {
        let n = Normalizer::default();
        assert_eq!(n.normalize(""), "");
    }

    #[test]
    fn test_scope_parsing() {
        assert_eq!("line-start".parse::<LabelScope>().unwrap(), LabelScope::LineStart);
        assert_eq!("anywhere".parse::<LabelScope>().unwrap(), LabelScope::Anywhere);
        assert!("everywhere".parse::<LabelScope>().is_err());
    }
}
