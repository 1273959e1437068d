use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Count and lemma for one category of a spelling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub count: u64,
    pub lemma: String,
}

/// All categories observed for one spelling.
///
/// Categories are kept in a `BTreeMap` so iteration (and therefore tie
/// breaking in `largest_category`) follows lexical tag order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconEntry {
    /// Total occurrences of the spelling.
    pub count: u64,
    pub categories: BTreeMap<String, CategoryCount>,
}

impl LexiconEntry {
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn category_count(&self, tag: &str) -> u64 {
        self.categories.get(tag).map_or(0, |c| c.count)
    }

    pub fn lemma(&self, tag: &str) -> Option<&str> {
        self.categories
            .get(tag)
            .map(|c| c.lemma.as_str())
            .filter(|l| !l.is_empty())
    }

    /// Category with the highest count; ties go to the lexically smallest tag.
    pub fn largest_category(&self) -> Option<&str> {
        let mut best: Option<(&str, u64)> = None;
        for (tag, cat) in &self.categories {
            match best {
                Some((_, count)) if cat.count <= count => {}
                _ => best = Some((tag, cat.count)),
            }
        }
        best.map(|(tag, _)| tag)
    }
}
