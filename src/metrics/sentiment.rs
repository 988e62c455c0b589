// ============================================================
// Metric Calculators — Opinion Lexicon Scorer
// ============================================================
// Pattern-style sentiment: every word found in the lexicon
// carries a polarity in [-1, 1] and a subjectivity in [0, 1].
// The document score is the mean over all lexicon hits.
//
// Modifiers apply to the next lexicon hit only:
//   intensifier ("very", "extremely", ...) multiplies polarity
//               and subjectivity by its factor
//   negator ("not", "never", "no", "...n't") multiplies the
//           polarity by -0.5
//
// Any other word between a modifier and a hit clears the
// modifier. Results are clamped to their ranges.
//
// The bundled lexicon (opinion_lexicon.tsv, a few hundred words
// common in diplomatic speech) and any extra file share one
// tab-separated format:
//   word<TAB>polarity<TAB>subjectivity
// Lines starting with '#' are comments.

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::{fs, path::Path};

use crate::data::segmenter::Segmenter;
use crate::domain::traits::{Opinion, OpinionScorer};

const NEGATION_FACTOR: f64 = -0.5;

/// Bundled lexicon, same format as the files `load_extra` reads.
const BUNDLED_LEXICON: &str = include_str!("opinion_lexicon.tsv");

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.2),
    ("extremely", 1.5),
    ("highly", 1.3),
    ("deeply", 1.3),
    ("most", 1.2),
    ("so", 1.2),
    ("quite", 1.1),
];

const NEGATORS: &[&str] = &["not", "never", "no"];

#[derive(Debug, Clone, Copy, PartialEq)]
struct Entry {
    polarity:     f64,
    subjectivity: f64,
}

enum Modifier {
    Intensify(f64),
    Negate,
}

pub struct LexiconScorer {
    segmenter:    Segmenter,
    entries:      HashMap<String, Entry>,
    intensifiers: HashMap<&'static str, f64>,
}

impl LexiconScorer {
    pub fn new() -> Self {
        let mut scorer = Self {
            segmenter:    Segmenter::new(),
            entries:      HashMap::new(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        };
        let bundled = parse_lexicon(BUNDLED_LEXICON, "opinion_lexicon.tsv")
            .expect("bundled lexicon is well-formed");
        for (word, polarity, subjectivity) in bundled {
            scorer.insert(&word, polarity, subjectivity);
        }
        scorer
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add or override an entry.
    pub fn insert(&mut self, word: &str, polarity: f64, subjectivity: f64) {
        self.entries.insert(
            word.to_lowercase(),
            Entry {
                polarity:     polarity.clamp(-1.0, 1.0),
                subjectivity: subjectivity.clamp(0.0, 1.0),
            },
        );
    }

    /// Merge entries from a tab-separated lexicon file.
    pub fn load_extra(&mut self, path: &Path) -> Result<usize> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Cannot read lexicon '{}'", path.display()))?;

        let parsed = parse_lexicon(&text, &path.display().to_string())?;
        let added  = parsed.len();
        for (word, polarity, subjectivity) in parsed {
            self.insert(&word, polarity, subjectivity);
        }

        tracing::info!("Loaded {} lexicon entries from '{}'", added, path.display());
        Ok(added)
    }

    fn modifier(&self, word: &str) -> Option<Modifier> {
        if NEGATORS.contains(&word) || word.ends_with("n't") {
            return Some(Modifier::Negate);
        }
        self.intensifiers.get(word).map(|&f| Modifier::Intensify(f))
    }
}

/// Parse `word<TAB>polarity<TAB>subjectivity` lines; `origin`
/// prefixes error positions as "origin:line".
fn parse_lexicon(text: &str, origin: &str) -> Result<Vec<(String, f64, f64)>> {
    let mut parsed = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        if fields.len() != 3 {
            bail!("{}:{}: expected 'word<TAB>polarity<TAB>subjectivity'", origin, lineno + 1);
        }
        let polarity: f64 = fields[1]
            .parse()
            .with_context(|| format!("{}:{}: bad polarity", origin, lineno + 1))?;
        let subjectivity: f64 = fields[2]
            .parse()
            .with_context(|| format!("{}:{}: bad subjectivity", origin, lineno + 1))?;
        parsed.push((fields[0].to_string(), polarity, subjectivity));
    }
    Ok(parsed)
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl OpinionScorer for LexiconScorer {
    fn score(&self, text: &str) -> Option<Opinion> {
        let mut words = 0usize;
        let mut hits: Vec<Entry> = Vec::new();
        let mut pending: Option<Modifier> = None;

        for word in self.segmenter.lower_words(text) {
            words += 1;

            if let Some(m) = self.modifier(&word) {
                pending = Some(m);
                continue;
            }

            match self.entries.get(&word) {
                Some(&entry) => {
                    let entry = match pending.take() {
                        Some(Modifier::Intensify(f)) => Entry {
                            polarity:     entry.polarity * f,
                            subjectivity: entry.subjectivity * f,
                        },
                        Some(Modifier::Negate) => Entry {
                            polarity:     entry.polarity * NEGATION_FACTOR,
                            subjectivity: entry.subjectivity,
                        },
                        None => entry,
                    };
                    hits.push(entry);
                }
                None => pending = None,
            }
        }

        if words == 0 {
            return None;
        }
        if hits.is_empty() {
            return Some(Opinion { polarity: 0.0, subjectivity: 0.0 });
        }

        let n = hits.len() as f64;
        let polarity     = hits.iter().map(|e| e.polarity).sum::<f64>() / n;
        let subjectivity = hits.iter().map(|e| e.subjectivity).sum::<f64>() / n;
        Some(Opinion {
            polarity:     polarity.clamp(-1.0, 1.0),
            subjectivity: subjectivity.clamp(0.0, 1.0),
        })
    }
}
