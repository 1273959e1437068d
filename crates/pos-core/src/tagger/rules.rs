use std::sync::Arc;

use crate::sentence::Sentence;
use crate::tagset::TagSet;

/// Ordered suffix and context rules applied on top of most-frequent-tag
/// assignment. Cheap and low accuracy; meant as a backup tagger, not as a
/// correction pass after HMM decoding.
///
/// Rules run in this order, each free to overwrite the result of an earlier
/// one. Except for the first, every rule tests the word's incoming tag, not
/// the one an earlier rule assigned.
/// 1. previous word tagged as a determiner, verb → singular noun
/// 2. common noun ending in "ed" → past participle
/// 3. anything ending in "ly" → adverb
/// 4. common noun ending in "al" → adjective
/// 5. common noun after "would" → base verb
/// 6. singular noun ending in "s" → plural noun
/// 7. common noun ending in "ing" → present participle
pub struct BackupRules {
    tagset: Arc<dyn TagSet>,
}

impl BackupRules {
    pub fn new(tagset: Arc<dyn TagSet>) -> Self {
        Self { tagset }
    }

    fn is_common_noun(&self, tag: &str) -> bool {
        self.tagset.is_noun(tag) && !self.tagset.is_proper_noun(tag)
    }

    fn rewrite(&self, spelling: &str, tag: &str, prev: Option<(&str, &str)>) -> String {
        let ts = self.tagset.as_ref();
        let mut out = tag.to_string();
        if let Some((_, prev_tag)) = prev {
            if ts.is_determiner(prev_tag) && ts.is_verb(tag) {
                out = ts.singular_noun().to_string();
            }
        }
        if self.is_common_noun(tag) && spelling.ends_with("ed") {
            out = ts.past_participle().to_string();
        }
        if spelling.ends_with("ly") {
            out = ts.adverb().to_string();
        }
        if self.is_common_noun(tag) && spelling.ends_with("al") {
            out = ts.adjective().to_string();
        }
        if let Some((prev_spelling, _)) = prev {
            if self.is_common_noun(tag) && prev_spelling.eq_ignore_ascii_case("would") {
                out = ts.base_verb().to_string();
            }
        }
        if tag == ts.singular_noun() && spelling.ends_with('s') {
            out = ts.plural_noun().to_string();
        }
        if self.is_common_noun(tag) && spelling.ends_with("ing") {
            out = ts.present_participle().to_string();
        }
        out
    }

    /// Apply the rules left to right. The previous word's tag seen by rule 1
    /// is its tag after rewriting. Returns the number of words changed.
    pub fn apply(&self, sentence: &mut Sentence) -> usize {
        let mut changes = 0;
        let mut prev: Option<(String, String)> = None;
        for word in sentence.words_mut() {
            let tag = self.rewrite(
                &word.spelling,
                &word.tag,
                prev.as_ref().map(|(s, t)| (s.as_str(), t.as_str())),
            );
            if tag != word.tag {
                word.tag = tag;
                changes += 1;
            }
            prev = Some((word.spelling.clone(), word.tag.clone()));
        }
        changes
    }
}
