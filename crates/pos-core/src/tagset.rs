//! Part-of-speech tag set abstraction.
//!
//! Retaggers, the guesser and the rule-based tagger ask tag-class questions
//! through `TagSet` rather than hard-coding tag strings, so a tagger trained
//! on a different tag inventory only needs another implementation.

use crate::unicode::is_punctuation_or_symbol;

pub trait TagSet: Send + Sync {
    fn is_proper_noun(&self, tag: &str) -> bool;
    fn is_proper_adjective(&self, tag: &str) -> bool;
    /// Common counterpart of a proper noun or proper adjective tag.
    fn common_equivalent(&self, tag: &str) -> Option<String>;
    fn is_pronoun(&self, tag: &str) -> bool;
    fn is_determiner(&self, tag: &str) -> bool;
    fn is_verb(&self, tag: &str) -> bool;
    fn is_noun(&self, tag: &str) -> bool;
    /// Tags for contracted forms such as "don't" or "I'm".
    fn is_compound(&self, tag: &str) -> bool;

    fn is_punctuation(&self, tag: &str) -> bool {
        is_punctuation_or_symbol(tag)
    }

    fn past_participle(&self) -> &str;
    fn present_participle(&self) -> &str;
    fn adverb(&self) -> &str;
    fn adjective(&self) -> &str;
    fn base_verb(&self) -> &str;
    fn singular_noun(&self) -> &str;
    fn plural_noun(&self) -> &str;
    /// Tag given to the period split off a pronoun.
    fn period(&self) -> &str;
}

/// Penn Treebank tag set.
#[derive(Debug, Clone, Copy, Default)]
pub struct PennTagSet;

impl TagSet for PennTagSet {
    fn is_proper_noun(&self, tag: &str) -> bool {
        matches!(tag, "NNP" | "NNPS")
    }

    fn is_proper_adjective(&self, _tag: &str) -> bool {
        false
    }

    fn common_equivalent(&self, tag: &str) -> Option<String> {
        match tag {
            "NNP" => Some("NN".to_string()),
            "NNPS" => Some("NNS".to_string()),
            _ => None,
        }
    }

    fn is_pronoun(&self, tag: &str) -> bool {
        matches!(tag, "PRP" | "PRP$" | "WP" | "WP$")
    }

    fn is_determiner(&self, tag: &str) -> bool {
        matches!(tag, "DT" | "PDT" | "WDT")
    }

    fn is_verb(&self, tag: &str) -> bool {
        tag.starts_with("VB") || tag == "MD"
    }

    fn is_noun(&self, tag: &str) -> bool {
        tag.starts_with("NN")
    }

    fn is_compound(&self, tag: &str) -> bool {
        tag.contains('|')
    }

    fn past_participle(&self) -> &str {
        "VBN"
    }

    fn present_participle(&self) -> &str {
        "VBG"
    }

    fn adverb(&self) -> &str {
        "RB"
    }

    fn adjective(&self) -> &str {
        "JJ"
    }

    fn base_verb(&self) -> &str {
        "VB"
    }

    fn singular_noun(&self) -> &str {
        "NN"
    }

    fn plural_noun(&self) -> &str {
        "NNS"
    }

    fn period(&self) -> &str {
        "."
    }
}
