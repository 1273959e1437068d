use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::entry::{CategoryCount, LexiconEntry};
use crate::unicode::{capitalize_first, has_letter, is_all_uppercase};

/// In-memory word lexicon: spelling → categories with counts and lemmata.
///
/// Also used for suffix lexicons, whose entries are lowercase word endings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lexicon {
    entries: HashMap<String, LexiconEntry>,
    category_totals: BTreeMap<String, u64>,
    longest_entry: usize,
    shortest_entry: usize,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` occurrences of `spelling` as `tag`.
    ///
    /// The lemma is recorded the first time a non-empty one is seen for the
    /// category.
    pub fn add_entry(&mut self, spelling: &str, tag: &str, lemma: &str, count: u64) {
        let entry = self.entry_mut(spelling);
        entry.count += count;
        let cat = entry.categories.entry(tag.to_string()).or_default();
        cat.count += count;
        if cat.lemma.is_empty() && !lemma.is_empty() {
            cat.lemma = lemma.to_string();
        }
        *self.category_totals.entry(tag.to_string()).or_insert(0) += count;
    }

    /// Set the count of one category to an absolute value.
    ///
    /// The entry count and the category total move by the same delta.
    pub fn update_entry_count(&mut self, spelling: &str, tag: &str, lemma: &str, count: u64) {
        let entry = self.entry_mut(spelling);
        let cat = entry.categories.entry(tag.to_string()).or_default();
        let old = std::mem::replace(&mut cat.count, count);
        if !lemma.is_empty() {
            cat.lemma = lemma.to_string();
        }
        entry.count = (entry.count + count).saturating_sub(old);
        let total = self.category_totals.entry(tag.to_string()).or_insert(0);
        *total = (*total + count).saturating_sub(old);
    }

    /// Insert or merge a complete entry (used by the text loader).
    pub(super) fn merge_entry(&mut self, spelling: &str, incoming: LexiconEntry) {
        for (tag, cat) in &incoming.categories {
            *self.category_totals.entry(tag.clone()).or_insert(0) += cat.count;
        }
        let entry = self.entry_mut(spelling);
        entry.count += incoming.count;
        for (tag, cat) in incoming.categories {
            let existing = entry.categories.entry(tag).or_default();
            existing.count += cat.count;
            if existing.lemma.is_empty() {
                existing.lemma = cat.lemma;
            }
        }
    }

    fn entry_mut(&mut self, spelling: &str) -> &mut LexiconEntry {
        let len = spelling.chars().count();
        if self.entries.is_empty() {
            self.longest_entry = len;
            self.shortest_entry = len;
        } else {
            self.longest_entry = self.longest_entry.max(len);
            self.shortest_entry = self.shortest_entry.min(len);
        }
        self.entries.entry(spelling.to_string()).or_default()
    }

    /// Exact lookup, no case folding.
    pub fn entry(&self, spelling: &str) -> Option<&LexiconEntry> {
        self.entries.get(spelling)
    }

    /// Lookup with case fallbacks: exact, then an all-caps spelling with only
    /// its first letter capitalized, then lowercase.
    ///
    /// Returns the key that matched together with its entry.
    pub fn lookup(&self, spelling: &str) -> Option<(&str, &LexiconEntry)> {
        if let Some((key, entry)) = self.entries.get_key_value(spelling) {
            return Some((key.as_str(), entry));
        }
        if is_all_uppercase(spelling) && spelling.chars().count() > 1 {
            let recapped = capitalize_first(spelling);
            if let Some((key, entry)) = self.entries.get_key_value(&recapped) {
                return Some((key.as_str(), entry));
            }
        }
        if has_letter(spelling) {
            let lower = spelling.to_lowercase();
            if lower != spelling {
                if let Some((key, entry)) = self.entries.get_key_value(&lower) {
                    return Some((key.as_str(), entry));
                }
            }
        }
        None
    }

    pub fn contains(&self, spelling: &str) -> bool {
        self.lookup(spelling).is_some()
    }

    /// Categories for a spelling in lexical tag order (case fallbacks apply).
    pub fn categories(&self, spelling: &str) -> Vec<&str> {
        self.lookup(spelling)
            .map(|(_, e)| e.tags().collect())
            .unwrap_or_default()
    }

    pub fn category_count(&self, spelling: &str, tag: &str) -> u64 {
        self.lookup(spelling)
            .map_or(0, |(_, e)| e.category_count(tag))
    }

    /// Total count of `tag` across all spellings.
    pub fn category_total(&self, tag: &str) -> u64 {
        self.category_totals.get(tag).copied().unwrap_or(0)
    }

    pub fn largest_category(&self, spelling: &str) -> Option<&str> {
        self.lookup(spelling).and_then(|(_, e)| e.largest_category())
    }

    pub fn lemma(&self, spelling: &str, tag: &str) -> Option<&str> {
        self.lookup(spelling).and_then(|(_, e)| e.lemma(tag))
    }

    /// Number of spellings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every tag with a non-zero total, in lexical order.
    pub fn all_categories(&self) -> impl Iterator<Item = (&str, u64)> {
        self.category_totals
            .iter()
            .filter(|(_, n)| **n > 0)
            .map(|(tag, n)| (tag.as_str(), *n))
    }

    /// Sum of all category counts.
    pub fn total_count(&self) -> u64 {
        self.category_totals.values().sum()
    }

    /// Longest entry length in characters.
    pub fn longest_entry_len(&self) -> usize {
        self.longest_entry
    }

    /// Shortest entry length in characters.
    pub fn shortest_entry_len(&self) -> usize {
        self.shortest_entry
    }

    /// Spellings in sorted order.
    pub fn spellings(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Build a suffix lexicon from alphabetic entries.
    ///
    /// Every lowercase ending of length 1..=`max_len` (shorter than the word
    /// itself) accumulates the category counts of the words that end with it.
    pub fn build_suffix_lexicon(&self, max_len: usize) -> Lexicon {
        let mut suffixes = Lexicon::new();
        for (spelling, entry) in &self.entries {
            if !spelling.chars().all(char::is_alphabetic) {
                continue;
            }
            let lower: Vec<char> = spelling.to_lowercase().chars().collect();
            let limit = max_len.min(lower.len().saturating_sub(1));
            for len in 1..=limit {
                let suffix: String = lower[lower.len() - len..].iter().collect();
                for (tag, CategoryCount { count, .. }) in &entry.categories {
                    if *count > 0 {
                        suffixes.add_entry(&suffix, tag, "", *count);
                    }
                }
            }
        }
        suffixes
    }
}
