use std::sync::Arc;

use tracing::debug;

use super::ContextualSmoother;
use crate::cache::BoundedCache;
use crate::lexicon::TransitionMatrix;
use crate::probability::Probability;

type BigramCache = BoundedCache<(String, String), Probability>;
type TrigramCache = BoundedCache<(String, String, String), Probability>;

fn combined_counters(bigrams: &BigramCache, trigrams: &TrigramCache) -> (u64, u64) {
    let (bh, bm) = bigrams.counters();
    let (th, tm) = trigrams.counters();
    (bh + th, bm + tm)
}

/// Additive smoothing with strict backoff.
///
/// - trigram: `(c(pp,p,t) + δ) / (c(pp,p) + δ|T|)`, or the bigram estimate
///   when the context `(pp, p)` was never seen
/// - bigram: `(c(p,t) + δ) / (c(p) + δ|T|)`, or the unigram estimate
///   `(c(t) + δ) / (N + δ|T|)` when `p` was never seen
///
/// `|T|` is the number of distinct tags in the matrix. Estimates are clamped
/// into `[floor, 1]`.
pub struct AdditiveContextualSmoother {
    matrix: Arc<TransitionMatrix>,
    delta: f64,
    floor: Probability,
    bigrams: BigramCache,
    trigrams: TrigramCache,
}

impl AdditiveContextualSmoother {
    pub fn new(
        matrix: Arc<TransitionMatrix>,
        delta: f64,
        floor: Probability,
        cache_capacity: usize,
    ) -> Self {
        Self {
            matrix,
            delta,
            floor,
            bigrams: BoundedCache::new(cache_capacity),
            trigrams: BoundedCache::new(cache_capacity),
        }
    }

    fn smoothed(&self, count: u64, context: u64) -> Probability {
        let tags = self.matrix.tag_count() as f64;
        let value = (count as f64 + self.delta) / (context as f64 + self.delta * tags);
        Probability::floored(value, self.floor)
    }

    fn unigram(&self, tag: &str) -> Probability {
        self.smoothed(self.matrix.unigram_count(tag), self.matrix.total())
    }

    fn bigram(&self, tag: &str, prev: &str) -> Probability {
        let context = self.matrix.unigram_count(prev);
        if context == 0 {
            return self.unigram(tag);
        }
        self.smoothed(self.matrix.bigram_count(prev, tag), context)
    }

    fn trigram(&self, tag: &str, prev: &str, prev_prev: &str) -> Probability {
        let context = self.matrix.bigram_count(prev_prev, prev);
        if context == 0 {
            return self.bigram(tag, prev);
        }
        self.smoothed(self.matrix.trigram_count(prev_prev, prev, tag), context)
    }
}

impl ContextualSmoother for AdditiveContextualSmoother {
    fn bigram_probability(&self, tag: &str, prev: &str) -> Probability {
        self.bigrams
            .get_or_insert_with((prev.to_string(), tag.to_string()), || {
                self.bigram(tag, prev)
            })
    }

    fn trigram_probability(&self, tag: &str, prev: &str, prev_prev: &str) -> Probability {
        self.trigrams.get_or_insert_with(
            (prev_prev.to_string(), prev.to_string(), tag.to_string()),
            || self.trigram(tag, prev, prev_prev),
        )
    }

    fn cache_counters(&self) -> (u64, u64) {
        combined_counters(&self.bigrams, &self.trigrams)
    }
}

/// Linear interpolation of maximum-likelihood estimates.
///
/// - bigram: `λ1·P(t) + λ2·P(t|p)` with fixed weights from settings
/// - trigram: `λ1·P(t) + λ2·P(t|p) + λ3·P(t|pp,p)` with weights computed once
///   by deleted interpolation over the matrix
///
/// Results below `floor` (unseen tags) are raised to it.
pub struct InterpolatedContextualSmoother {
    matrix: Arc<TransitionMatrix>,
    bigram_weights: [f64; 2],
    trigram_weights: [f64; 3],
    floor: Probability,
    bigrams: BigramCache,
    trigrams: TrigramCache,
}

impl InterpolatedContextualSmoother {
    pub fn new(
        matrix: Arc<TransitionMatrix>,
        bigram_weights: [f64; 2],
        floor: Probability,
        cache_capacity: usize,
    ) -> Self {
        let trigram_weights = matrix.trigram_weights();
        debug!(
            lambda1 = trigram_weights[0],
            lambda2 = trigram_weights[1],
            lambda3 = trigram_weights[2],
            "trigram interpolation weights"
        );
        Self {
            matrix,
            bigram_weights,
            trigram_weights,
            floor,
            bigrams: BoundedCache::new(cache_capacity),
            trigrams: BoundedCache::new(cache_capacity),
        }
    }

    pub fn trigram_weights(&self) -> [f64; 3] {
        self.trigram_weights
    }

    fn bigram(&self, tag: &str, prev: &str) -> Probability {
        let [l1, l2] = self.bigram_weights;
        let value = l1 * self.matrix.unigram_mle(tag) + l2 * self.matrix.bigram_mle(prev, tag);
        Probability::floored(value, self.floor)
    }

    fn trigram(&self, tag: &str, prev: &str, prev_prev: &str) -> Probability {
        let [l1, l2, l3] = self.trigram_weights;
        let value = l1 * self.matrix.unigram_mle(tag)
            + l2 * self.matrix.bigram_mle(prev, tag)
            + l3 * self.matrix.trigram_mle(prev_prev, prev, tag);
        Probability::floored(value, self.floor)
    }
}

impl ContextualSmoother for InterpolatedContextualSmoother {
    fn bigram_probability(&self, tag: &str, prev: &str) -> Probability {
        self.bigrams
            .get_or_insert_with((prev.to_string(), tag.to_string()), || {
                self.bigram(tag, prev)
            })
    }

    fn trigram_probability(&self, tag: &str, prev: &str, prev_prev: &str) -> Probability {
        self.trigrams.get_or_insert_with(
            (prev_prev.to_string(), prev.to_string(), tag.to_string()),
            || self.trigram(tag, prev, prev_prev),
        )
    }

    fn cache_counters(&self) -> (u64, u64) {
        combined_counters(&self.bigrams, &self.trigrams)
    }
}
