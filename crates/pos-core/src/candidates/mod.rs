//! Candidate tag generation.
//!
//! A `CandidateSource` turns a spelling into a non-empty set of candidate
//! tags with counts. `LexiconCandidates` resolves known words through the
//! lexicon and unknown words through suffix analysis and fixed heuristics;
//! `RegexpCandidates` lets ordered pattern rules override another source.

mod guesser;
mod regexp;

pub use guesser::{GuesserConfig, LexiconCandidates};
pub use regexp::{RegexpCandidates, RegexpRule};

use std::sync::Arc;

/// Where a candidate set came from; selects the statistics used to smooth it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagOrigin {
    Lexicon,
    Suffix,
    Heuristic,
    Rule,
}

/// Candidate tags for one spelling, sorted by tag, never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordTags {
    origin: TagOrigin,
    tags: Vec<(String, u64)>,
}

impl WordTags {
    /// Returns `None` for an empty tag list.
    pub fn new(origin: TagOrigin, mut tags: Vec<(String, u64)>) -> Option<Self> {
        if tags.is_empty() {
            return None;
        }
        tags.sort_by(|a, b| a.0.cmp(&b.0));
        tags.dedup_by(|a, b| {
            if a.0 == b.0 {
                b.1 += a.1;
                true
            } else {
                false
            }
        });
        Some(Self { origin, tags })
    }

    pub fn single(origin: TagOrigin, tag: &str, count: u64) -> Self {
        Self {
            origin,
            tags: vec![(tag.to_string(), count)],
        }
    }

    pub fn origin(&self) -> TagOrigin {
        self.origin
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|(t, _)| t.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.tags.iter().map(|(t, c)| (t.as_str(), *c))
    }

    pub fn count(&self, tag: &str) -> u64 {
        self.tags
            .binary_search_by(|(t, _)| t.as_str().cmp(tag))
            .map_or(0, |i| self.tags[i].1)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags
            .binary_search_by(|(t, _)| t.as_str().cmp(tag))
            .is_ok()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Highest-count tag; ties go to the lexically smallest tag.
    pub fn most_frequent(&self) -> &str {
        let mut best = &self.tags[0];
        for entry in &self.tags[1..] {
            if entry.1 > best.1 {
                best = entry;
            }
        }
        &best.0
    }
}

/// Source of candidate tags and the category totals behind them.
pub trait CandidateSource: Send + Sync {
    /// Candidate tags for a spelling. Never empty.
    fn candidates(&self, spelling: &str) -> Arc<WordTags>;

    /// Total count of `tag` in the statistics a candidate set of `origin` was
    /// drawn from.
    fn category_total(&self, origin: TagOrigin, tag: &str) -> u64;

    /// Cache (hits, misses), if the source memoizes.
    fn cache_counters(&self) -> (u64, u64) {
        (0, 0)
    }
}
