// ============================================================
// Layer 4b — Corpus Aggregator
// ============================================================
// Walks the corpus year by year, scores every document with one
// metric, and folds the per-document results into per-year
// (or per-session) means.
//
//   CorpusAggregator::collect()  — corpus → Vec<MetricResult>
//   aggregate_by_year()          — results → YearSeries
//   aggregate_by_session()       — results → Vec<SessionMean>
//   corpus_stats()               — token-count results → Vec<YearStats>
//
// Collection and aggregation are split so the pure folding
// functions can be tested without touching the filesystem.
//
// Rules:
//   - deny-listed years are skipped before any document is read
//   - a document that cannot be read or scored yields an absent
//     result and a warning; the year carries on
//   - the year mean is taken over defined results only, and a
//     year with no defined result is left out of the series
//
// Reference: Rust Book §8 (Collections: HashMap / BTreeMap)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::data::preprocessor::Normalizer;
use crate::domain::document::Document;
use crate::domain::metric::{MetricKind, MetricResult};
use crate::domain::series::{SessionMean, YearSeries, YearStats};
use crate::domain::traits::CorpusSource;
use crate::metrics::MetricEngine;

/// Years that never enter a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearPolicy {
    deny: BTreeSet<i32>,
}

impl YearPolicy {
    pub fn new(deny: impl IntoIterator<Item = i32>) -> Self {
        Self { deny: deny.into_iter().collect() }
    }

    /// Policy that lets every year through.
    pub fn none() -> Self {
        Self { deny: BTreeSet::new() }
    }

    pub fn is_denied(&self, year: i32) -> bool {
        self.deny.contains(&year)
    }
}

impl Default for YearPolicy {
    /// 1948 and 1949 are left out of every chart.
    fn default() -> Self {
        Self::new([1948, 1949])
    }
}

pub struct CorpusAggregator<'a> {
    source:     &'a dyn CorpusSource,
    engine:     &'a MetricEngine,
    normalizer: &'a Normalizer,
    policy:     &'a YearPolicy,
}

impl<'a> CorpusAggregator<'a> {
    pub fn new(
        source:     &'a dyn CorpusSource,
        engine:     &'a MetricEngine,
        normalizer: &'a Normalizer,
        policy:     &'a YearPolicy,
    ) -> Self {
        Self { source, engine, normalizer, policy }
    }

    /// Score every document of every allowed year, in year order.
    /// Fails only when the corpus itself cannot be enumerated.
    pub fn collect(&self, kind: MetricKind) -> Result<Vec<MetricResult>> {
        let mut results = Vec::new();

        for year in self.source.years()? {
            if self.policy.is_denied(year) {
                tracing::info!("Skipping deny-listed year {}", year);
                continue;
            }

            let Some(listing) = self.source.session(year)? else {
                tracing::warn!("Session for {} disappeared during the run", year);
                continue;
            };

            let before = results.len();
            for entry in &listing.entries {
                let result = match self.source.read(entry) {
                    Ok(document) => self.score(kind, &document),
                    Err(e) => {
                        tracing::warn!("{}: unreadable, skipped: {:#}", entry.key, e);
                        MetricResult::new(kind, entry.key.clone(), None)
                    }
                };
                results.push(result);
            }

            let defined = results[before..].iter().filter(|r| r.is_defined()).count();
            tracing::info!(
                "{} ({}): {}/{} documents scored",
                year,
                kind,
                defined,
                listing.entries.len()
            );
        }

        Ok(results)
    }

    fn score(&self, kind: MetricKind, document: &Document) -> MetricResult {
        let result = self.engine.score_document(kind, document, self.normalizer);
        tracing::debug!("{}: {} = {:?}", document.key, kind, result.value);
        result
    }
}

/// Per-year mean over defined results; years without any defined
/// result are dropped.
pub fn aggregate_by_year(results: &[MetricResult], policy: &YearPolicy) -> YearSeries {
    let mut acc: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for r in results {
        let Some(v) = r.value else { continue };
        if policy.is_denied(r.document.year) {
            continue;
        }
        let slot = acc.entry(r.document.year).or_insert((0.0, 0));
        slot.0 += v;
        slot.1 += 1;
    }

    let mut series = YearSeries::new();
    for (year, (sum, n)) in acc {
        series.push(year, sum / n as f64);
    }
    series
}

/// Per-session mean over defined results, ordered by (year, session).
pub fn aggregate_by_session(results: &[MetricResult], policy: &YearPolicy) -> Vec<SessionMean> {
    let mut acc: BTreeMap<(i32, &str), (f64, usize)> = BTreeMap::new();
    for r in results {
        let Some(v) = r.value else { continue };
        if policy.is_denied(r.document.year) {
            continue;
        }
        let slot = acc
            .entry((r.document.year, r.document.session_id.as_str()))
            .or_insert((0.0, 0));
        slot.0 += v;
        slot.1 += 1;
    }

    acc.into_iter()
        .map(|((year, session_id), (sum, n))| SessionMean {
            year,
            session_id: session_id.to_string(),
            mean:       sum / n as f64,
            documents:  n,
        })
        .collect()
}

/// Document count and token total per year, from token-count results.
/// Unlike the metric series these are sums, not means.
pub fn corpus_stats(results: &[MetricResult], policy: &YearPolicy) -> Vec<YearStats> {
    let mut acc: BTreeMap<i32, YearStats> = BTreeMap::new();
    for r in results {
        debug_assert_eq!(r.kind, MetricKind::TokenCount);
        let Some(v) = r.value else { continue };
        let year = r.document.year;
        if policy.is_denied(year) {
            continue;
        }
        let stats = acc.entry(year).or_insert(YearStats { year, documents: 0, tokens: 0 });
        stats.documents += 1;
        stats.tokens    += v as usize;
    }
    acc.into_values().collect()
}
