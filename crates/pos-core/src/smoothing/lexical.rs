use std::sync::Arc;

use tracing::warn;

use super::LexicalSmoother;
use crate::cache::BoundedCache;
use crate::candidates::CandidateSource;
use crate::probability::Probability;

type LexicalCache = BoundedCache<(String, String), Probability>;

/// Substitute 1.0 for an estimate outside (0, 1].
///
/// This keeps decoding going on degenerate inputs (for example `delta = 0`
/// with an unseen word/tag pair) at the price of letting that state dominate
/// its column.
fn checked(value: f64, spelling: &str, tag: &str) -> Probability {
    Probability::new(value).unwrap_or_else(|_| {
        warn!(spelling, tag, value, "degenerate lexical probability, using 1.0");
        Probability::ONE
    })
}

/// Additive (Lidstone) smoothing:
///
/// `P(w|t) = (count(w,t) + δ) / (max(total(t), 1) + δ * |candidates(w)|)`
pub struct AdditiveLexicalSmoother {
    candidates: Arc<dyn CandidateSource>,
    delta: f64,
    cache: LexicalCache,
}

impl AdditiveLexicalSmoother {
    pub fn new(candidates: Arc<dyn CandidateSource>, delta: f64, cache_capacity: usize) -> Self {
        Self {
            candidates,
            delta,
            cache: BoundedCache::new(cache_capacity),
        }
    }

    fn compute(&self, spelling: &str, tag: &str) -> Probability {
        let tags = self.candidates.candidates(spelling);
        let count = tags.count(tag) as f64;
        let total = self.candidates.category_total(tags.origin(), tag).max(1) as f64;
        let value = (count + self.delta) / (total + self.delta * tags.len() as f64);
        checked(value, spelling, tag)
    }
}

impl LexicalSmoother for AdditiveLexicalSmoother {
    fn lexical_probability(&self, spelling: &str, tag: &str) -> Probability {
        self.cache
            .get_or_insert_with((spelling.to_string(), tag.to_string()), || {
                self.compute(spelling, tag)
            })
    }

    fn cache_counters(&self) -> (u64, u64) {
        self.cache.counters()
    }
}

/// Maximum-likelihood estimate with a backoff for unseen pairs:
///
/// `P(w|t) = count(w,t) / max(total(t), 1)` when the pair was seen, otherwise
/// `1 / (2 * (total(t) + |candidates(w)|))`, which stays below the estimate
/// for a single observation.
pub struct MleBackoffLexicalSmoother {
    candidates: Arc<dyn CandidateSource>,
    cache: LexicalCache,
}

impl MleBackoffLexicalSmoother {
    pub fn new(candidates: Arc<dyn CandidateSource>, cache_capacity: usize) -> Self {
        Self {
            candidates,
            cache: BoundedCache::new(cache_capacity),
        }
    }

    fn compute(&self, spelling: &str, tag: &str) -> Probability {
        let tags = self.candidates.candidates(spelling);
        let count = tags.count(tag);
        let total = self.candidates.category_total(tags.origin(), tag);
        let value = if count > 0 {
            count as f64 / total.max(1) as f64
        } else {
            1.0 / (2.0 * (total as f64 + tags.len() as f64))
        };
        checked(value, spelling, tag)
    }
}

impl LexicalSmoother for MleBackoffLexicalSmoother {
    fn lexical_probability(&self, spelling: &str, tag: &str) -> Probability {
        self.cache
            .get_or_insert_with((spelling.to_string(), tag.to_string()), || {
                self.compute(spelling, tag)
            })
    }

    fn cache_counters(&self) -> (u64, u64) {
        self.cache.counters()
    }
}
