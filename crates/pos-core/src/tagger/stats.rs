use std::sync::atomic::{AtomicU64, Ordering};

/// Running counters for one tagger. Shared across worker threads.
#[derive(Debug, Default)]
pub(crate) struct TaggingStats {
    sentences: AtomicU64,
    words: AtomicU64,
    beam_rejections: AtomicU64,
    retagger_changes: AtomicU64,
}

/// Point-in-time copy of a tagger's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub sentences: u64,
    pub words: u64,
    pub beam_rejections: u64,
    pub retagger_changes: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

impl TaggingStats {
    /// Record one finished sentence. Returns the sentence count including it.
    pub fn record(&self, words: usize, rejections: u64, retagger_changes: usize) -> u64 {
        self.words.fetch_add(words as u64, Ordering::Relaxed);
        self.beam_rejections
            .fetch_add(rejections, Ordering::Relaxed);
        self.retagger_changes
            .fetch_add(retagger_changes as u64, Ordering::Relaxed);
        self.sentences.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn snapshot(&self, cache: (u64, u64)) -> StatsSnapshot {
        StatsSnapshot {
            sentences: self.sentences.load(Ordering::Relaxed),
            words: self.words.load(Ordering::Relaxed),
            beam_rejections: self.beam_rejections.load(Ordering::Relaxed),
            retagger_changes: self.retagger_changes.load(Ordering::Relaxed),
            cache_hits: cache.0,
            cache_misses: cache.1,
        }
    }
}
