use std::sync::Arc;

use tracing::trace;

use crate::sentence::{AdornedWord, Sentence};
use crate::tagset::TagSet;
use crate::unicode::{has_letter, is_capitalized};

/// A deterministic pass that corrects known classes of tagging errors.
///
/// Every pass is idempotent on its own output. Passes that report
/// `can_add_or_delete_words` may change the sentence length; the pipeline
/// resynchronizes indices and offsets after them.
pub trait Retagger: Send + Sync {
    fn name(&self) -> &'static str;

    fn can_add_or_delete_words(&self) -> bool;

    /// Rewrite tags (and possibly words) in place. Returns the number of
    /// words changed or inserted.
    fn retag(&self, sentence: &mut Sentence) -> usize;
}

/// Run all retaggers in order. Returns the total number of changes.
pub fn run_retaggers(retaggers: &[Box<dyn Retagger>], sentence: &mut Sentence) -> usize {
    let mut changes = 0;
    for rt in retaggers {
        let changed = rt.retag(sentence);
        if changed > 0 && rt.can_add_or_delete_words() {
            sentence.resync();
        }
        trace!(retagger = rt.name(), changed, "retag pass");
        changes += changed;
    }
    changes
}

/// Downgrades proper-noun tags on uncapitalized spellings to the common-noun
/// equivalent, and proper-adjective tags to the plain adjective.
///
/// The first word is left alone: its capitalization says nothing about
/// whether it is a name.
pub struct ProperNounRetagger {
    tagset: Arc<dyn TagSet>,
}

impl ProperNounRetagger {
    pub fn new(tagset: Arc<dyn TagSet>) -> Self {
        Self { tagset }
    }
}

impl Retagger for ProperNounRetagger {
    fn name(&self) -> &'static str {
        "proper-noun"
    }

    fn can_add_or_delete_words(&self) -> bool {
        false
    }

    fn retag(&self, sentence: &mut Sentence) -> usize {
        let mut changes = 0;
        for word in sentence.words_mut().iter_mut().skip(1) {
            if is_capitalized(&word.spelling) {
                continue;
            }
            let replacement = if self.tagset.is_proper_noun(&word.tag) {
                self.tagset.common_equivalent(&word.tag)
            } else if self.tagset.is_proper_adjective(&word.tag) {
                Some(self.tagset.adjective().to_string())
            } else {
                None
            };
            if let Some(tag) = replacement.filter(|t| *t != word.tag) {
                word.tag = tag;
                changes += 1;
            }
        }
        changes
    }
}

/// Splits a pronoun spelled with a trailing period ("I.") into the pronoun
/// and a separate period token.
///
/// Only a single trailing period is split off. A stem that still ends in a
/// period ("I..") is left alone so the pass stays idempotent.
///
/// The new period word has no offset of its own; `Sentence::resync` derives
/// it from the shortened pronoun.
pub struct PronounPeriodRetagger {
    tagset: Arc<dyn TagSet>,
}

impl PronounPeriodRetagger {
    pub fn new(tagset: Arc<dyn TagSet>) -> Self {
        Self { tagset }
    }

    fn should_split(&self, word: &AdornedWord) -> bool {
        self.tagset.is_pronoun(&word.tag)
            && word
                .spelling
                .strip_suffix('.')
                .is_some_and(|stem| has_letter(stem) && !stem.ends_with('.'))
    }
}

fn strip_period(s: &mut String) {
    if s.ends_with('.') {
        s.pop();
    }
}

impl Retagger for PronounPeriodRetagger {
    fn name(&self) -> &'static str {
        "pronoun-period"
    }

    fn can_add_or_delete_words(&self) -> bool {
        true
    }

    fn retag(&self, sentence: &mut Sentence) -> usize {
        let mut changes = 0;
        let mut i = 0;
        while i < sentence.len() {
            if sentence.get(i).is_some_and(|w| self.should_split(w)) {
                let word = &mut sentence.words_mut()[i];
                strip_period(&mut word.token);
                strip_period(&mut word.spelling);
                strip_period(&mut word.standard_spelling);
                let period = self.tagset.period();
                sentence.insert(i + 1, AdornedWord::new(period).with_tag(period));
                changes += 1;
                i += 1;
            }
            i += 1;
        }
        changes
    }
}
