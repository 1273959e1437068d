use std::sync::Arc;

use proptest::prelude::*;

use crate::sentence::{AdornedWord, Sentence};
use crate::tagger::{
    run_retaggers, BackupRules, PronounPeriodRetagger, ProperNounRetagger, Retagger,
};
use crate::tagset::{PennTagSet, TagSet};

fn penn() -> Arc<dyn TagSet> {
    Arc::new(PennTagSet)
}

fn tagged(pairs: &[(&str, &str)]) -> Sentence {
    Sentence::new(
        pairs
            .iter()
            .map(|(w, t)| AdornedWord::new(*w).with_tag(*t))
            .collect(),
    )
}

#[test]
fn proper_noun_downgraded_when_lowercase() {
    let mut s = tagged(&[
        ("The", "DT"),
        ("paris", "NNP"),
        ("Paris", "NNP"),
        ("smiths", "NNPS"),
    ]);
    let changed = ProperNounRetagger::new(penn()).retag(&mut s);
    assert_eq!(changed, 2);
    assert_eq!(s.tags(), vec!["DT", "NN", "NNP", "NNS"]);
}

/// A tag set that marks proper adjectives ("JJP") as well as proper nouns.
struct ProperAdjectiveTagSet;

impl TagSet for ProperAdjectiveTagSet {
    fn is_proper_noun(&self, tag: &str) -> bool {
        tag == "NP"
    }
    fn is_proper_adjective(&self, tag: &str) -> bool {
        tag == "JJP"
    }
    fn common_equivalent(&self, tag: &str) -> Option<String> {
        (tag == "NP").then(|| "N".to_string())
    }
    fn is_pronoun(&self, tag: &str) -> bool {
        tag == "PRO"
    }
    fn is_determiner(&self, tag: &str) -> bool {
        tag == "DET"
    }
    fn is_verb(&self, tag: &str) -> bool {
        tag.starts_with('V')
    }
    fn is_noun(&self, tag: &str) -> bool {
        tag.starts_with('N')
    }
    fn is_compound(&self, _tag: &str) -> bool {
        false
    }
    fn past_participle(&self) -> &str {
        "VN"
    }
    fn present_participle(&self) -> &str {
        "VG"
    }
    fn adverb(&self) -> &str {
        "ADV"
    }
    fn adjective(&self) -> &str {
        "ADJ"
    }
    fn base_verb(&self) -> &str {
        "V"
    }
    fn singular_noun(&self) -> &str {
        "N"
    }
    fn plural_noun(&self) -> &str {
        "NS"
    }
    fn period(&self) -> &str {
        "."
    }
}

#[test]
fn proper_adjective_downgraded_when_lowercase() {
    let mut s = tagged(&[
        ("A", "DET"),
        ("french", "JJP"),
        ("French", "JJP"),
        ("paris", "NP"),
    ]);
    let changed = ProperNounRetagger::new(Arc::new(ProperAdjectiveTagSet)).retag(&mut s);
    assert_eq!(changed, 2);
    assert_eq!(s.tags(), vec!["DET", "ADJ", "JJP", "N"]);
}

#[test]
fn proper_noun_skips_first_word() {
    let mut s = tagged(&[("paris", "NNP"), ("is", "VBZ")]);
    assert_eq!(ProperNounRetagger::new(penn()).retag(&mut s), 0);
    assert_eq!(s.tags(), vec!["NNP", "VBZ"]);
}

#[test]
fn pronoun_period_split_keeps_offsets() {
    let mut s = Sentence::from_tokens(&[("I.", 0), ("went", 3)]);
    s.words_mut()[0].tag = "PRP".to_string();
    s.words_mut()[1].tag = "VBD".to_string();
    let retaggers: Vec<Box<dyn Retagger>> = vec![Box::new(PronounPeriodRetagger::new(penn()))];
    assert_eq!(run_retaggers(&retaggers, &mut s), 1);

    assert_eq!(s.spellings(), vec!["I", ".", "went"]);
    assert_eq!(s.tags(), vec!["PRP", ".", "VBD"]);
    let offsets: Vec<Option<usize>> = s.words().iter().map(|w| w.offset).collect();
    assert_eq!(offsets, vec![Some(0), Some(1), Some(3)]);
    let word = s.get(2).unwrap();
    assert_eq!((word.index, word.token.as_str()), (2, "went"));
}

#[test]
fn pronoun_period_leaves_other_words() {
    let mut s = tagged(&[("Mr.", "NNP"), (".", "PRP"), ("we", "PRP"), ("you.", "PRP")]);
    let changed = PronounPeriodRetagger::new(penn()).retag(&mut s);
    assert_eq!(changed, 1);
    assert_eq!(s.spellings(), vec!["Mr.", ".", "we", "you", "."]);
}

#[test]
fn pronoun_with_repeated_periods_is_left_alone() {
    let retaggers: Vec<Box<dyn Retagger>> = vec![Box::new(PronounPeriodRetagger::new(penn()))];
    let mut s = tagged(&[("So", "RB"), ("I..", "PRP")]);
    assert_eq!(run_retaggers(&retaggers, &mut s), 0);
    assert_eq!(s.spellings(), vec!["So", "I.."]);
    assert_eq!(run_retaggers(&retaggers, &mut s), 0);
}

#[test]
fn pipeline_runs_in_order() {
    let retaggers: Vec<Box<dyn Retagger>> = vec![
        Box::new(ProperNounRetagger::new(penn())),
        Box::new(PronounPeriodRetagger::new(penn())),
    ];
    let mut s = tagged(&[("So", "RB"), ("london", "NNP"), ("I.", "PRP")]);
    assert_eq!(run_retaggers(&retaggers, &mut s), 2);
    assert_eq!(s.tags(), vec!["RB", "NN", "PRP", "."]);
    assert_eq!(s.get(3).unwrap().index, 3);
}

#[test]
fn backup_rules_each_fire() {
    let rules = BackupRules::new(penn());
    let cases = [
        (vec![("the", "DT"), ("walk", "VB")], vec!["DT", "NN"]),
        (vec![("bred", "NN")], vec!["VBN"]),
        (vec![("early", "JJ")], vec!["RB"]),
        (vec![("tribal", "NN")], vec!["JJ"]),
        (vec![("would", "MD"), ("dog", "NN")], vec!["MD", "VB"]),
        (vec![("bus", "NN")], vec!["NNS"]),
        (vec![("building", "NN")], vec!["VBG"]),
        (vec![("Boston", "NNP"), ("Ingred", "NNP")], vec!["NNP", "NNP"]),
    ];
    for (words, expected) in cases {
        let mut s = tagged(&words);
        rules.apply(&mut s);
        assert_eq!(s.tags(), expected, "{words:?}");
    }
}

#[test]
fn backup_rules_test_incoming_tag() {
    let rules = BackupRules::new(penn());
    // Rule 1 turns "sings" into NN, but rule 6 looks at the incoming VBZ.
    let mut s = tagged(&[("the", "DT"), ("sings", "VBZ")]);
    assert_eq!(rules.apply(&mut s), 1);
    assert_eq!(s.tags(), vec!["DT", "NN"]);
}

#[test]
fn backup_rules_see_rewritten_previous_tag() {
    let rules = BackupRules::new(penn());
    // "early" becomes RB, so the verb after it is not preceded by a determiner.
    let mut s = tagged(&[("early", "DT"), ("runs", "VBZ")]);
    rules.apply(&mut s);
    assert_eq!(s.tags(), vec!["RB", "VBZ"]);
}

const SPELLINGS: [&str; 10] = [
    "Paris", "paris", "dog", "I.", "you.", "the", ".", "Smiths", "I..", "we...",
];
const TAGS: [&str; 6] = ["NNP", "NNPS", "NN", "PRP", "DT", "."];

fn sentence_strategy() -> impl Strategy<Value = Sentence> {
    proptest::collection::vec((0..SPELLINGS.len(), 0..TAGS.len()), 0..8).prop_map(|words| {
        Sentence::new(
            words
                .into_iter()
                .map(|(w, t)| AdornedWord::new(SPELLINGS[w]).with_tag(TAGS[t]))
                .collect(),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn proper_noun_is_idempotent(mut s in sentence_strategy()) {
        let rt = ProperNounRetagger::new(penn());
        let len = s.len();
        rt.retag(&mut s);
        prop_assert_eq!(s.len(), len);
        let once = s.clone();
        prop_assert_eq!(rt.retag(&mut s), 0);
        prop_assert_eq!(s, once);
    }

    #[test]
    fn pronoun_period_is_idempotent(mut s in sentence_strategy()) {
        let retaggers: Vec<Box<dyn Retagger>> =
            vec![Box::new(PronounPeriodRetagger::new(penn()))];
        run_retaggers(&retaggers, &mut s);
        let once = s.clone();
        prop_assert_eq!(run_retaggers(&retaggers, &mut s), 0);
        prop_assert_eq!(s, once);
    }
}
