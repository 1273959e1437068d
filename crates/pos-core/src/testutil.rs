//! Small hand-built model shared by unit tests.

use std::sync::Arc;

use crate::candidates::{GuesserConfig, LexiconCandidates};
use crate::lexicon::{Lexicon, TaggerModel, TransitionMatrix};
use crate::tagset::PennTagSet;

pub(crate) fn test_lexicon() -> Lexicon {
    let mut lex = Lexicon::new();
    for (spelling, tag, lemma, count) in [
        ("dog", "NN", "dog", 10),
        ("cat", "NN", "cat", 8),
        ("barks", "VBZ", "bark", 5),
        ("barks", "NNS", "bark", 1),
        ("runs", "VBZ", "run", 4),
        ("runs", "NNS", "run", 2),
        ("the", "DT", "the", 30),
        ("a", "DT", "a", 20),
        ("I", "PRP", "I", 10),
        ("I.", "PRP", "I", 1),
        ("went", "VBD", "go", 5),
        ("walked", "VBD", "walk", 3),
        ("walked", "VBN", "walk", 2),
        ("Paris", "NNP", "Paris", 4),
        ("quickly", "RB", "quickly", 2),
        ("would", "MD", "would", 3),
        (".", ".", ".", 20),
        (",", ",", ",", 10),
    ] {
        lex.add_entry(spelling, tag, lemma, count);
    }
    lex
}

pub(crate) fn test_matrix() -> TransitionMatrix {
    let text = "\
.\t20\nNN\t20\nVBZ\t10\nNNS\t4\nDT\t15\nPRP\t5\nVBD\t5\n\
.\tNN\t8\n.\tDT\t10\n.\tPRP\t5\nDT\tNN\t12\nNN\tVBZ\t9\nNN\tNNS\t1\n\
VBZ\t.\t9\nNNS\t.\t3\nPRP\tVBD\t5\nVBD\t.\t5\nNN\t.\t5\n\
.\t.\tNN\t4\n.\t.\tDT\t6\n.\tNN\tVBZ\t6\n.\tDT\tNN\t8\nDT\tNN\tVBZ\t5\n\
NN\tVBZ\t.\t8\n.\t.\tPRP\t4\n.\tPRP\tVBD\t4\nPRP\tVBD\t.\t4\nNN\tNNS\t.\t1\n";
    TransitionMatrix::from_text(text).0
}

pub(crate) fn test_model() -> TaggerModel {
    let lexicon = test_lexicon();
    let suffix_lexicon = lexicon.build_suffix_lexicon(3);
    TaggerModel::new(lexicon, suffix_lexicon, test_matrix())
}

pub(crate) fn test_guesser_config() -> GuesserConfig {
    GuesserConfig {
        max_suffix_len: 3,
        cache_capacity: 64,
        number_tag: "CD".to_string(),
        proper_noun_tag: "NNP".to_string(),
        noun_tag: "NN".to_string(),
        use_word_lexicon: true,
    }
}

pub(crate) fn test_candidates() -> LexiconCandidates {
    let model = test_model();
    LexiconCandidates::new(
        Arc::new(model.lexicon),
        Arc::new(model.suffix_lexicon),
        Arc::new(PennTagSet),
        test_guesser_config(),
    )
}
