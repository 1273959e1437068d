//! Transformation-rule retagging in Hepple's decision-list form.
//!
//! A rule line reads `from to CONTEXT word`, whitespace separated. Rules are
//! keyed by `from`, the most frequent candidate tag of the word being
//! retagged. A rule applies only when `to` is itself one of the word's
//! candidate tags, and the first rule whose context matches decides the tag.
//! Contexts look at neighbouring spellings only; positions outside the
//! sentence read as [`SENTENCE_EDGE`].

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug_span, warn};

use super::retagger::Retagger;
use crate::candidates::CandidateSource;
use crate::lexicon::{LexiconError, LoadReport};
use crate::sentence::Sentence;

/// Spelling seen by a context that reaches past either end of the sentence.
pub const SENTENCE_EDGE: &str = "STAART";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleContext {
    /// `PREVWD w`: the previous word is `w`.
    PrevWord(String),
    /// `NEXTWD w`: the next word is `w`.
    NextWord(String),
    /// `PREV1OR2WD w`: one of the two previous words is `w`.
    Prev1Or2Word(String),
    /// `NEXT1OR2WD w`: one of the two following words is `w`.
    Next1Or2Word(String),
}

fn word_at<'a>(words: &[&'a str], i: usize, offset: isize) -> &'a str {
    i.checked_add_signed(offset)
        .and_then(|j| words.get(j))
        .copied()
        .unwrap_or(SENTENCE_EDGE)
}

impl RuleContext {
    fn parse(id: &str, args: &[&str]) -> Result<Self, String> {
        let [word] = args else {
            return Err(format!("{id} takes one word, got {}", args.len()));
        };
        let word = word.to_string();
        match id {
            "PREVWD" => Ok(Self::PrevWord(word)),
            "NEXTWD" => Ok(Self::NextWord(word)),
            "PREV1OR2WD" => Ok(Self::Prev1Or2Word(word)),
            "NEXT1OR2WD" => Ok(Self::Next1Or2Word(word)),
            other => Err(format!("unknown rule type {other}")),
        }
    }

    fn matches(&self, words: &[&str], i: usize) -> bool {
        let at = |offset| word_at(words, i, offset);
        match self {
            Self::PrevWord(w) => at(-1) == w.as_str(),
            Self::NextWord(w) => at(1) == w.as_str(),
            Self::Prev1Or2Word(w) => at(-1) == w.as_str() || at(-2) == w.as_str(),
            Self::Next1Or2Word(w) => at(1) == w.as_str() || at(2) == w.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeppleRule {
    pub from: String,
    pub to: String,
    pub context: RuleContext,
}

impl HeppleRule {
    fn parse(line: &str) -> Result<Self, String> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let [from, to, id, args @ ..] = parts.as_slice() else {
            return Err(format!("expected from, to and rule type, got {} fields", parts.len()));
        };
        Ok(Self {
            from: from.to_string(),
            to: to.to_string(),
            context: RuleContext::parse(id, args)?,
        })
    }
}

/// Rules grouped by `from` tag, each group in file order.
#[derive(Debug, Clone, Default)]
pub struct HeppleRules {
    by_from: HashMap<String, Vec<HeppleRule>>,
    len: usize,
}

impl HeppleRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: HeppleRule) {
        self.by_from.entry(rule.from.clone()).or_default().push(rule);
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn rules_for(&self, from: &str) -> &[HeppleRule] {
        self.by_from.get(from).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Parse one rule per line. Blank lines and `#` comments are ignored;
    /// malformed lines and unknown rule types are skipped and counted.
    pub fn from_text(text: &str) -> (Self, LoadReport) {
        let mut rules = Self::new();
        let mut report = LoadReport::default();
        for (lineno, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            match HeppleRule::parse(trimmed) {
                Ok(rule) => {
                    rules.push(rule);
                    report.loaded += 1;
                }
                Err(reason) => {
                    warn!(line = lineno + 1, %reason, "skipping malformed hepple rule");
                    report.skipped += 1;
                }
            }
        }
        (rules, report)
    }

    pub fn load(path: &Path) -> Result<(Self, LoadReport), LexiconError> {
        let _span = debug_span!("hepple_rules_load", path = %path.display()).entered();
        let text = fs::read_to_string(path)?;
        Ok(Self::from_text(&text))
    }
}

/// Applies a `HeppleRules` table to a tagged sentence.
///
/// Rule selection depends only on spellings and candidate tags, never on the
/// incoming tags, so a second run changes nothing.
pub struct HeppleRetagger {
    rules: Arc<HeppleRules>,
    candidates: Arc<dyn CandidateSource>,
}

impl HeppleRetagger {
    pub fn new(rules: Arc<HeppleRules>, candidates: Arc<dyn CandidateSource>) -> Self {
        Self { rules, candidates }
    }
}

impl Retagger for HeppleRetagger {
    fn name(&self) -> &'static str {
        "hepple"
    }

    fn can_add_or_delete_words(&self) -> bool {
        false
    }

    fn retag(&self, sentence: &mut Sentence) -> usize {
        if self.rules.is_empty() {
            return 0;
        }
        let spellings: Vec<String> = sentence.words().iter().map(|w| w.spelling.clone()).collect();
        let words: Vec<&str> = spellings.iter().map(String::as_str).collect();
        let mut changes = 0;
        for (i, word) in sentence.words_mut().iter_mut().enumerate() {
            let candidates = self.candidates.candidates(&word.standard_spelling);
            let fired = self
                .rules
                .rules_for(candidates.most_frequent())
                .iter()
                .find(|rule| candidates.contains(&rule.to) && rule.context.matches(&words, i));
            if let Some(rule) = fired {
                if word.tag != rule.to {
                    word.tag = rule.to.clone();
                    changes += 1;
                }
            }
        }
        changes
    }
}
