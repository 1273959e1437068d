use std::sync::Arc;

use proptest::prelude::*;

use super::*;
use crate::candidates::{CandidateSource, LexiconCandidates};
use crate::lexicon::{Lexicon, TransitionMatrix};
use crate::probability::Probability;
use crate::tagset::PennTagSet;
use crate::testutil::{test_candidates, test_guesser_config, test_matrix};

fn floor() -> Probability {
    Probability::new(1e-7).unwrap()
}

fn candidates_for(lexicon: Lexicon) -> Arc<dyn CandidateSource> {
    let suffixes = lexicon.build_suffix_lexicon(3);
    Arc::new(LexiconCandidates::new(
        Arc::new(lexicon),
        Arc::new(suffixes),
        Arc::new(PennTagSet),
        test_guesser_config(),
    ))
}

#[test]
fn additive_lexical_formula() {
    let smoother = AdditiveLexicalSmoother::new(Arc::new(test_candidates()), 0.5, 128);
    // barks: VBZ 5, NNS 1. VBZ total = barks 5 + runs 4.
    let p = smoother.lexical_probability("barks", "VBZ");
    assert!((p.value() - (5.5 / (9.0 + 1.0))).abs() < 1e-12);
    // NNS total = barks 1 + runs 2.
    let p = smoother.lexical_probability("barks", "NNS");
    assert!((p.value() - (1.5 / (3.0 + 1.0))).abs() < 1e-12);
}

#[test]
fn additive_lexical_unseen_pair_is_positive() {
    let smoother = AdditiveLexicalSmoother::new(Arc::new(test_candidates()), 0.5, 128);
    let p = smoother.lexical_probability("dog", "VBZ");
    assert!(p.value() > 0.0);
    assert!(p < smoother.lexical_probability("dog", "NN"));
}

#[test]
fn additive_lexical_floors_zero_total() {
    let mut lex = Lexicon::new();
    lex.add_entry("odd", "JJ", "odd", 0);
    let smoother = AdditiveLexicalSmoother::new(candidates_for(lex), 0.5, 16);
    // (0 + 0.5) / (max(0, 1) + 0.5 * 1)
    let p = smoother.lexical_probability("odd", "JJ");
    assert!((p.value() - 0.5 / 1.5).abs() < 1e-12);
}

/// A degenerate estimate falls back to exactly 1.0. This pins the current
/// behavior; changing it is a model decision, not a bug fix.
#[test]
fn degenerate_lexical_probability_falls_back_to_one() {
    let smoother = AdditiveLexicalSmoother::new(Arc::new(test_candidates()), 0.0, 128);
    let p = smoother.lexical_probability("dog", "VBZ");
    assert_eq!(p, Probability::ONE);
    assert_eq!(p.value(), 1.0);
}

#[test]
fn lexical_results_are_cached() {
    let smoother = AdditiveLexicalSmoother::new(Arc::new(test_candidates()), 0.5, 128);
    smoother.lexical_probability("dog", "NN");
    smoother.lexical_probability("dog", "NN");
    smoother.lexical_probability("dog", "VB");
    assert_eq!(smoother.cache_counters(), (1, 2));
}

#[test]
fn mle_backoff_seen_and_unseen() {
    let smoother = MleBackoffLexicalSmoother::new(Arc::new(test_candidates()), 128);
    let p = smoother.lexical_probability("barks", "VBZ");
    assert!((p.value() - 5.0 / 9.0).abs() < 1e-12);
    let unseen = smoother.lexical_probability("barks", "JJ");
    // JJ total 0, two candidates.
    assert!((unseen.value() - 0.25).abs() < 1e-12);
}

#[test]
fn additive_contextual_bigram_and_backoff() {
    let matrix = Arc::new(test_matrix());
    let tags = matrix.tag_count() as f64;
    let smoother = AdditiveContextualSmoother::new(matrix.clone(), 0.001, floor(), 128);
    let p = smoother.bigram_probability("VBZ", "NN");
    assert!((p.value() - (9.001 / (20.0 + 0.001 * tags))).abs() < 1e-12);

    // Unseen previous tag backs off to the unigram estimate.
    let p = smoother.bigram_probability("NN", "XX");
    let expected = (20.0 + 0.001) / (matrix.total() as f64 + 0.001 * tags);
    assert!((p.value() - expected).abs() < 1e-12);
}

#[test]
fn additive_contextual_trigram_backs_off_to_bigram() {
    let matrix = Arc::new(test_matrix());
    let smoother = AdditiveContextualSmoother::new(matrix, 0.001, floor(), 128);
    // (VBD, NN) never occurs as a bigram context.
    let tri = smoother.trigram_probability("VBZ", "NN", "VBD");
    let bi = smoother.bigram_probability("VBZ", "NN");
    assert_eq!(tri, bi);
    // (DT, NN) does.
    let tri = smoother.trigram_probability("VBZ", "NN", "DT");
    assert!((tri.value() - (5.001 / (12.0 + 0.001 * 7.0))).abs() < 1e-12);
}

#[test]
fn interpolated_bigram_uses_fixed_weights() {
    let matrix = Arc::new(test_matrix());
    let smoother =
        InterpolatedContextualSmoother::new(matrix.clone(), [0.03, 0.97], floor(), 128);
    let p = smoother.bigram_probability("VBZ", "NN");
    let expected = 0.03 * (10.0 / matrix.total() as f64) + 0.97 * (9.0 / 20.0);
    assert!((p.value() - expected).abs() < 1e-12);
}

#[test]
fn interpolated_unseen_tag_hits_floor() {
    let matrix = Arc::new(test_matrix());
    let smoother = InterpolatedContextualSmoother::new(matrix, [0.03, 0.97], floor(), 128);
    assert_eq!(smoother.bigram_probability("JJ", "NN"), floor());
    assert_eq!(smoother.trigram_probability("JJ", "NN", "DT"), floor());
}

#[test]
fn interpolated_trigram_weights_sum_to_one() {
    let smoother =
        InterpolatedContextualSmoother::new(Arc::new(test_matrix()), [0.03, 0.97], floor(), 8);
    let w = smoother.trigram_weights();
    assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
}

#[test]
fn contextual_caches_are_bounded() {
    let smoother =
        AdditiveContextualSmoother::new(Arc::new(test_matrix()), 0.001, floor(), 2);
    for prev in ["NN", "DT", "VBZ", "PRP"] {
        smoother.bigram_probability("NN", prev);
    }
    // Evicted entries are recomputed to the same value.
    let again = smoother.bigram_probability("NN", "NN");
    assert_eq!(again, smoother.bigram_probability("NN", "NN"));
    assert_eq!(smoother.cache_counters().0, 1);
}

#[test]
fn smoother_kinds_parse() {
    assert_eq!(
        "mle-backoff".parse::<LexicalSmootherKind>().unwrap(),
        LexicalSmootherKind::MleBackoff
    );
    assert_eq!(
        "interpolated".parse::<ContextualSmootherKind>().unwrap(),
        ContextualSmootherKind::Interpolated
    );
    assert!("kneser-ney".parse::<ContextualSmootherKind>().is_err());
    assert_eq!(LexicalSmootherKind::Additive.to_string(), "additive");
}

fn lexical_with_count(count: u64, other: u64, delta: f64) -> f64 {
    let mut lex = Lexicon::new();
    lex.add_entry("word", "NN", "", count);
    lex.add_entry("word", "VB", "", other);
    lex.add_entry("other", "NN", "", 7);
    let smoother = AdditiveLexicalSmoother::new(candidates_for(lex), delta, 16);
    smoother.lexical_probability("word", "NN").value()
}

fn mle_with_count(count: u64, other: u64) -> f64 {
    let mut lex = Lexicon::new();
    lex.update_entry_count("word", "NN", "", count);
    lex.add_entry("word", "VB", "", other);
    lex.add_entry("other", "NN", "", 7);
    let smoother = MleBackoffLexicalSmoother::new(candidates_for(lex), 16);
    smoother.lexical_probability("word", "NN").value()
}

fn bigram_matrix(count_a: u64, count_b: u64) -> TransitionMatrix {
    let mut m = TransitionMatrix::new();
    m.increment_unigram("P", count_a + count_b + 1);
    m.increment_unigram("A", 10);
    m.increment_unigram("B", 10);
    m.increment_bigram("P", "A", count_a);
    m.increment_bigram("P", "B", count_b);
    m
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn additive_lexical_is_monotone_in_count(
        c in 0u64..500,
        extra in 1u64..500,
        other in 0u64..500,
        delta in 0.01f64..2.0,
    ) {
        let low = lexical_with_count(c, other, delta);
        let high = lexical_with_count(c + extra, other, delta);
        prop_assert!(high >= low, "count {} -> {}: {} < {}", c, c + extra, high, low);
    }

    #[test]
    fn mle_backoff_is_monotone_in_count(
        c in 0u64..500,
        extra in 1u64..500,
        other in 0u64..500,
    ) {
        let low = mle_with_count(c, other);
        let high = mle_with_count(c + extra, other);
        prop_assert!(high >= low);
    }

    #[test]
    fn contextual_prefers_better_supported_transition(
        count_a in 0u64..200,
        extra in 0u64..200,
    ) {
        // A and B have equal unigram support; A→ has at least as many P→ observations.
        let matrix = Arc::new(bigram_matrix(count_a + extra, count_a));
        let additive = AdditiveContextualSmoother::new(matrix.clone(), 0.001, floor(), 16);
        prop_assert!(
            additive.bigram_probability("A", "P") >= additive.bigram_probability("B", "P")
        );
        let interpolated =
            InterpolatedContextualSmoother::new(matrix, [0.03, 0.97], floor(), 16);
        prop_assert!(
            interpolated.bigram_probability("A", "P")
                >= interpolated.bigram_probability("B", "P")
        );
    }

    #[test]
    fn contextual_probability_never_zero(count_a in 0u64..50, count_b in 0u64..50) {
        let matrix = Arc::new(bigram_matrix(count_a, count_b));
        let additive = AdditiveContextualSmoother::new(matrix.clone(), 0.001, floor(), 16);
        let interpolated =
            InterpolatedContextualSmoother::new(matrix, [0.03, 0.97], floor(), 16);
        for tag in ["A", "B", "Z"] {
            prop_assert!(additive.bigram_probability(tag, "P").value() > 0.0);
            prop_assert!(interpolated.trigram_probability(tag, "P", "Q").value() > 0.0);
        }
    }
}
