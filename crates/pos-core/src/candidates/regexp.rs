use std::sync::Arc;

use regex::Regex;
use tracing::warn;

use super::{CandidateSource, TagOrigin, WordTags};
use crate::lexicon::LoadReport;

/// A whole-spelling pattern and the tag it assigns.
#[derive(Debug, Clone)]
pub struct RegexpRule {
    pattern: Regex,
    tag: String,
}

impl RegexpRule {
    pub fn new(pattern: &str, tag: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(&format!("^(?:{pattern})$"))?,
            tag: tag.to_string(),
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn matches(&self, spelling: &str) -> bool {
        self.pattern.is_match(spelling)
    }

    /// Parse `pattern \t tag` lines. Blank lines and `#` comments are ignored;
    /// lines with a missing tag or an invalid pattern are skipped and counted.
    pub fn parse_rules(text: &str) -> (Vec<RegexpRule>, LoadReport) {
        let mut rules = Vec::new();
        let mut report = LoadReport::default();
        for (lineno, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let parsed = match line.rsplit_once('\t') {
                Some((pattern, tag)) if !tag.trim().is_empty() => {
                    RegexpRule::new(pattern.trim(), tag.trim()).map_err(|e| e.to_string())
                }
                _ => Err("expected pattern and tag separated by a tab".to_string()),
            };
            match parsed {
                Ok(rule) => {
                    rules.push(rule);
                    report.loaded += 1;
                }
                Err(reason) => {
                    warn!(line = lineno + 1, %reason, "skipping malformed regexp rule");
                    report.skipped += 1;
                }
            }
        }
        (rules, report)
    }
}

/// Ordered pattern rules in front of another candidate source.
///
/// The first rule whose pattern matches the whole spelling decides the tag;
/// spellings no rule matches are resolved by the fallback.
pub struct RegexpCandidates {
    rules: Vec<RegexpRule>,
    fallback: Arc<dyn CandidateSource>,
}

impl RegexpCandidates {
    pub fn new(rules: Vec<RegexpRule>, fallback: Arc<dyn CandidateSource>) -> Self {
        Self { rules, fallback }
    }

    pub fn rules(&self) -> &[RegexpRule] {
        &self.rules
    }
}

impl CandidateSource for RegexpCandidates {
    fn candidates(&self, spelling: &str) -> Arc<WordTags> {
        match self.rules.iter().find(|r| r.matches(spelling)) {
            Some(rule) => {
                let count = self
                    .fallback
                    .category_total(TagOrigin::Lexicon, &rule.tag)
                    .max(1);
                Arc::new(WordTags::single(TagOrigin::Rule, &rule.tag, count))
            }
            None => self.fallback.candidates(spelling),
        }
    }

    fn category_total(&self, origin: TagOrigin, tag: &str) -> u64 {
        match origin {
            TagOrigin::Rule => self.fallback.category_total(TagOrigin::Lexicon, tag),
            other => self.fallback.category_total(other, tag),
        }
    }

    fn cache_counters(&self) -> (u64, u64) {
        self.fallback.cache_counters()
    }
}
