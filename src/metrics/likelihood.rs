// ============================================================
// Metric Calculators — Fake-News Likelihood
// ============================================================
// Runs the classifier over a whole document and reports the
// mean probability of the "fake" label.
//
// Two ways to cut the document into classifier inputs:
//
//   Chunked      greedy token-budgeted chunks (see Chunker);
//                every word is seen exactly once
//   PerSentence  one input per sentence, each truncated by the
//                classifier to its maximum length
//
// A failure on any input fails the whole document for this
// metric only; the caller turns that into an absent result.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::chunker::Chunker;
use crate::data::segmenter::Segmenter;
use crate::domain::traits::Classifier;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LikelihoodMode {
    #[default]
    Chunked,
    PerSentence,
}

impl std::str::FromStr for LikelihoodMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "chunked"      => Ok(Self::Chunked),
            "per-sentence" => Ok(Self::PerSentence),
            other => anyhow::bail!(
                "unknown likelihood mode '{}' (expected 'chunked' or 'per-sentence')",
                other
            ),
        }
    }
}

/// Mean fake probability over the document's inputs.
/// None when the document yields no inputs at all.
pub fn fake_likelihood(
    text:       &str,
    classifier: &dyn Classifier,
    chunker:    &Chunker,
    mode:       LikelihoodMode,
    segmenter:  &Segmenter,
) -> Result<Option<f64>> {
    let inputs: Vec<String> = match mode {
        LikelihoodMode::Chunked => chunker
            .chunk(text, classifier.tokenizer())?
            .into_iter()
            .map(|c| c.text)
            .collect(),
        LikelihoodMode::PerSentence => segmenter.sentences(text).map(str::to_string).collect(),
    };

    if inputs.is_empty() {
        return Ok(None);
    }

    let mut total = 0.0f64;
    for input in &inputs {
        total += classifier.fake_probability(input)? as f64;
    }

    tracing::debug!("Scored {} classifier inputs ({:?})", inputs.len(), mode);
    Ok(Some(total / inputs.len() as f64))
}
