use std::sync::Arc;

use tracing::trace;

use super::{CandidateSource, TagOrigin, WordTags};
use crate::cache::BoundedCache;
use crate::lexicon::Lexicon;
use crate::numeric::{is_number, is_ordinal};
use crate::settings::GuesserSettings;
use crate::tagset::TagSet;
use crate::unicode::{has_capital, has_letter, is_capitalized, is_punctuation_or_symbol};

#[derive(Debug, Clone)]
pub struct GuesserConfig {
    pub max_suffix_len: usize,
    pub cache_capacity: usize,
    pub number_tag: String,
    pub proper_noun_tag: String,
    pub noun_tag: String,
    /// When false the word lexicon is bypassed and every word is guessed
    /// (suffix tagger).
    pub use_word_lexicon: bool,
}

impl From<&GuesserSettings> for GuesserConfig {
    fn from(s: &GuesserSettings) -> Self {
        Self {
            max_suffix_len: s.max_suffix_len,
            cache_capacity: s.cache_capacity,
            number_tag: s.number_tag.clone(),
            proper_noun_tag: s.proper_noun_tag.clone(),
            noun_tag: s.noun_tag.clone(),
            use_word_lexicon: true,
        }
    }
}

/// Lexicon lookup with suffix and heuristic fallback.
///
/// Resolution order:
/// 1. word lexicon (exact, recapitalized all-caps, lowercase)
/// 2. longest matching suffix of the lowercase spelling in the suffix
///    lexicon, for spellings containing a letter that are not ordinals
///    ("3rd"); proper-noun tags are dropped unless the word has a capital,
///    compound tags unless it has an apostrophe, and an emptied set moves on
///    to the next shorter suffix
/// 3. number → number tag, capitalized → proper noun, punctuation or
///    symbol → itself, anything else → noun
///
/// Results are memoized per spelling in a bounded cache.
pub struct LexiconCandidates {
    lexicon: Arc<Lexicon>,
    suffixes: Arc<Lexicon>,
    tagset: Arc<dyn TagSet>,
    config: GuesserConfig,
    cache: BoundedCache<String, Arc<WordTags>>,
}

impl LexiconCandidates {
    pub fn new(
        lexicon: Arc<Lexicon>,
        suffixes: Arc<Lexicon>,
        tagset: Arc<dyn TagSet>,
        config: GuesserConfig,
    ) -> Self {
        let cache = BoundedCache::new(config.cache_capacity);
        Self {
            lexicon,
            suffixes,
            tagset,
            config,
            cache,
        }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    fn resolve(&self, spelling: &str) -> WordTags {
        if self.config.use_word_lexicon {
            if let Some(found) = self.from_lexicon(spelling) {
                return found;
            }
        }
        if let Some(found) = self.from_suffix(spelling) {
            trace!(spelling, tags = found.len(), "suffix guess");
            return found;
        }
        self.from_heuristics(spelling)
    }

    fn from_lexicon(&self, spelling: &str) -> Option<WordTags> {
        let (_, entry) = self.lexicon.lookup(spelling)?;
        let tags = entry
            .categories
            .iter()
            .map(|(tag, cat)| (tag.clone(), cat.count))
            .collect();
        WordTags::new(TagOrigin::Lexicon, tags)
    }

    fn from_suffix(&self, spelling: &str) -> Option<WordTags> {
        if !has_letter(spelling) || is_ordinal(spelling) || self.suffixes.is_empty() {
            return None;
        }
        let lower: Vec<char> = spelling.to_lowercase().chars().collect();
        let keep_proper = has_capital(spelling);
        let keep_compound = spelling.contains('\'');
        let longest = self.config.max_suffix_len.min(lower.len());
        for len in (1..=longest).rev() {
            let suffix: String = lower[lower.len() - len..].iter().collect();
            let Some(entry) = self.suffixes.entry(&suffix) else {
                continue;
            };
            let tags: Vec<(String, u64)> = entry
                .categories
                .iter()
                .filter(|(tag, _)| keep_proper || !self.tagset.is_proper_noun(tag))
                .filter(|(tag, _)| keep_compound || !self.tagset.is_compound(tag))
                .map(|(tag, cat)| (tag.clone(), cat.count))
                .collect();
            if let Some(found) = WordTags::new(TagOrigin::Suffix, tags) {
                return Some(found);
            }
        }
        None
    }

    fn from_heuristics(&self, spelling: &str) -> WordTags {
        let tag = if is_number(spelling) || is_ordinal(spelling) {
            self.config.number_tag.as_str()
        } else if is_capitalized(spelling) {
            self.config.proper_noun_tag.as_str()
        } else if is_punctuation_or_symbol(spelling) {
            spelling
        } else {
            self.config.noun_tag.as_str()
        };
        let count = self.lexicon.category_total(tag).max(1);
        WordTags::single(TagOrigin::Heuristic, tag, count)
    }
}

impl CandidateSource for LexiconCandidates {
    fn candidates(&self, spelling: &str) -> Arc<WordTags> {
        self.cache
            .get_or_insert_with(spelling.to_string(), || Arc::new(self.resolve(spelling)))
    }

    fn category_total(&self, origin: TagOrigin, tag: &str) -> u64 {
        match origin {
            TagOrigin::Suffix => self.suffixes.category_total(tag),
            TagOrigin::Lexicon | TagOrigin::Heuristic | TagOrigin::Rule => {
                self.lexicon.category_total(tag)
            }
        }
    }

    fn cache_counters(&self) -> (u64, u64) {
        self.cache.counters()
    }
}
