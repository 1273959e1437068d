use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// Tag n-gram counts gathered from training data.
///
/// Nested maps keep lookups allocation-free for `&str` keys. Absent keys
/// mean a count of zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionMatrix {
    unigrams: HashMap<String, u64>,
    bigrams: HashMap<String, HashMap<String, u64>>,
    trigrams: HashMap<String, HashMap<String, HashMap<String, u64>>>,
    total: u64,
}

impl TransitionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_unigram(&mut self, tag: &str, by: u64) {
        *self.unigrams.entry(tag.to_string()).or_insert(0) += by;
        self.total += by;
    }

    pub fn increment_bigram(&mut self, prev: &str, tag: &str, by: u64) {
        *self
            .bigrams
            .entry(prev.to_string())
            .or_default()
            .entry(tag.to_string())
            .or_insert(0) += by;
    }

    pub fn increment_trigram(&mut self, prev_prev: &str, prev: &str, tag: &str, by: u64) {
        *self
            .trigrams
            .entry(prev_prev.to_string())
            .or_default()
            .entry(prev.to_string())
            .or_default()
            .entry(tag.to_string())
            .or_insert(0) += by;
    }

    pub fn unigram_count(&self, tag: &str) -> u64 {
        self.unigrams.get(tag).copied().unwrap_or(0)
    }

    pub fn bigram_count(&self, prev: &str, tag: &str) -> u64 {
        self.bigrams
            .get(prev)
            .and_then(|m| m.get(tag))
            .copied()
            .unwrap_or(0)
    }

    pub fn trigram_count(&self, prev_prev: &str, prev: &str, tag: &str) -> u64 {
        self.trigrams
            .get(prev_prev)
            .and_then(|m| m.get(prev))
            .and_then(|m| m.get(tag))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of all unigram counts.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Distinct tags with a unigram count, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.unigrams.keys().map(String::as_str).collect();
        set.into_iter().collect()
    }

    /// Number of distinct tags, at least 1.
    pub fn tag_count(&self) -> usize {
        self.unigrams.len().max(1)
    }

    pub fn is_empty(&self) -> bool {
        self.unigrams.is_empty() && self.bigrams.is_empty() && self.trigrams.is_empty()
    }

    pub(super) fn unigram_iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.unigrams.iter().map(|(t, &c)| (t.as_str(), c))
    }

    pub(super) fn bigram_iter(&self) -> impl Iterator<Item = (&str, &str, u64)> {
        self.bigrams.iter().flat_map(|(p, m)| {
            m.iter().map(move |(t, &c)| (p.as_str(), t.as_str(), c))
        })
    }

    pub(crate) fn trigram_iter(&self) -> impl Iterator<Item = (&str, &str, &str, u64)> {
        self.trigrams.iter().flat_map(|(pp, m)| {
            m.iter().flat_map(move |(p, m)| {
                m.iter()
                    .map(move |(t, &c)| (pp.as_str(), p.as_str(), t.as_str(), c))
            })
        })
    }

    /// Maximum-likelihood unigram probability, 0 when untrained.
    pub fn unigram_mle(&self, tag: &str) -> f64 {
        ratio(self.unigram_count(tag), self.total)
    }

    /// Maximum-likelihood bigram probability P(tag | prev), 0 when unseen.
    pub fn bigram_mle(&self, prev: &str, tag: &str) -> f64 {
        ratio(self.bigram_count(prev, tag), self.unigram_count(prev))
    }

    /// Maximum-likelihood trigram probability P(tag | prev_prev, prev), 0 when unseen.
    pub fn trigram_mle(&self, prev_prev: &str, prev: &str, tag: &str) -> f64 {
        ratio(
            self.trigram_count(prev_prev, prev, tag),
            self.bigram_count(prev_prev, prev),
        )
    }

    /// Trigram interpolation weights `[λ1, λ2, λ3]` (unigram, bigram, trigram)
    /// computed by deleted interpolation.
    ///
    /// Each observed trigram votes, weighted by its count, for whichever of the
    /// unigram, bigram or trigram estimates is largest (ties prefer the lower
    /// order). Weights are normalized to sum to 1; an empty matrix yields
    /// equal weights.
    pub fn trigram_weights(&self) -> [f64; 3] {
        let mut lambdas = [0.0f64; 3];
        for (pp, p, t, count) in self.trigram_iter() {
            if count == 0 {
                continue;
            }
            let uni = self.unigram_mle(t);
            let bi = self.bigram_mle(p, t);
            let tri = self.trigram_mle(pp, p, t);
            let slot = if uni >= bi && uni >= tri {
                0
            } else if bi >= tri {
                1
            } else {
                2
            };
            lambdas[slot] += count as f64;
        }
        let sum: f64 = lambdas.iter().sum();
        if sum > 0.0 {
            lambdas.map(|l| l / sum)
        } else {
            [1.0 / 3.0; 3]
        }
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
