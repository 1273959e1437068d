//! Sentence tagging: Viterbi decoding over pluggable strategies, followed by
//! retagging passes.
//!
//! A `Tagger` is assembled by `TaggerBuilder` from a candidate-tag source, a
//! lexical smoother and a contextual smoother. Non-HMM kinds (unigram,
//! rule-based, suffix, regexp) carry no smoothers and pick the most frequent
//! candidate per word.

mod hepple;
mod retagger;
mod rules;
mod stats;
#[cfg(test)]
mod tests;
mod viterbi;

pub use hepple::{HeppleRetagger, HeppleRule, HeppleRules, RuleContext, SENTENCE_EDGE};
pub use retagger::{run_retaggers, PronounPeriodRetagger, ProperNounRetagger, Retagger};
pub use rules::BackupRules;
pub use stats::StatsSnapshot;
pub use viterbi::{BestPath, Trellis};

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use serde::Deserialize;
use tracing::{debug, debug_span, info, warn};

use crate::candidates::{
    CandidateSource, GuesserConfig, LexiconCandidates, RegexpCandidates, RegexpRule,
};
use crate::lexicon::{Lexicon, TaggerModel, TransitionMatrix};
use crate::probability::Probability;
use crate::sentence::Sentence;
use crate::settings::Settings;
use crate::smoothing::{
    AdditiveContextualSmoother, AdditiveLexicalSmoother, ContextualSmoother,
    ContextualSmootherKind, InterpolatedContextualSmoother, LexicalSmoother, LexicalSmootherKind,
    MleBackoffLexicalSmoother,
};
use crate::tagset::{PennTagSet, TagSet};
use stats::TaggingStats;

#[derive(Debug, thiserror::Error)]
pub enum TaggerError {
    #[error("unknown tagger: {0}")]
    UnknownTagger(String),
    #[error("unknown smoother: {0}")]
    UnknownSmoother(String),
    #[error("unknown retagger: {0}")]
    UnknownRetagger(String),
    #[error("no {0} supplied to tagger builder")]
    MissingModel(&'static str),
    #[error("invalid {field}: {value}")]
    InvalidParameter { field: &'static str, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaggerKind {
    Unigram,
    Bigram,
    Trigram,
    RuleBased,
    Suffix,
    Regexp,
}

impl TaggerKind {
    pub const ALL: [TaggerKind; 6] = [
        Self::Unigram,
        Self::Bigram,
        Self::Trigram,
        Self::RuleBased,
        Self::Suffix,
        Self::Regexp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unigram => "unigram",
            Self::Bigram => "bigram",
            Self::Trigram => "trigram",
            Self::RuleBased => "rule-based",
            Self::Suffix => "suffix",
            Self::Regexp => "regexp",
        }
    }

    fn order(self) -> Option<Order> {
        match self {
            Self::Bigram => Some(Order::Bigram),
            Self::Trigram => Some(Order::Trigram),
            _ => None,
        }
    }
}

impl FromStr for TaggerKind {
    type Err = TaggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| TaggerError::UnknownTagger(s.to_string()))
    }
}

impl fmt::Display for TaggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RetaggerKind {
    ProperNoun,
    PronounPeriod,
    Hepple,
}

impl RetaggerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProperNoun => "proper-noun",
            Self::PronounPeriod => "pronoun-period",
            Self::Hepple => "hepple",
        }
    }

    fn build(
        self,
        tagset: &Arc<dyn TagSet>,
        candidates: &Arc<dyn CandidateSource>,
        hepple_rules: &Arc<HeppleRules>,
    ) -> Box<dyn Retagger> {
        match self {
            Self::ProperNoun => Box::new(ProperNounRetagger::new(tagset.clone())),
            Self::PronounPeriod => Box::new(PronounPeriodRetagger::new(tagset.clone())),
            Self::Hepple => Box::new(HeppleRetagger::new(
                hepple_rules.clone(),
                candidates.clone(),
            )),
        }
    }
}

impl FromStr for RetaggerKind {
    type Err = TaggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "proper-noun" => Ok(Self::ProperNoun),
            "pronoun-period" => Ok(Self::PronounPeriod),
            "hepple" => Ok(Self::Hepple),
            other => Err(TaggerError::UnknownRetagger(other.to_string())),
        }
    }
}

impl fmt::Display for RetaggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Order {
    Bigram,
    Trigram,
}

/// How a tagger picks one tag per word.
enum Decoder {
    /// Most frequent candidate, no context.
    MostFrequent,
    Hmm {
        order: Order,
        lexical: Box<dyn LexicalSmoother>,
        contextual: Box<dyn ContextualSmoother>,
    },
}

pub struct Tagger {
    kind: TaggerKind,
    candidates: Arc<dyn CandidateSource>,
    decoder: Decoder,
    rules: Option<BackupRules>,
    retaggers: Vec<Box<dyn Retagger>>,
    beam_threshold: f64,
    boundary_tag: String,
    progress_interval: u64,
    stats: TaggingStats,
}

impl Tagger {
    pub fn kind(&self) -> TaggerKind {
        self.kind
    }

    pub fn candidates(&self) -> &dyn CandidateSource {
        self.candidates.as_ref()
    }

    pub fn retagger_names(&self) -> Vec<&'static str> {
        self.retaggers.iter().map(|r| r.name()).collect()
    }

    fn new_trellis(&self) -> Trellis {
        Trellis::new(self.beam_threshold, &self.boundary_tag)
    }

    /// Tag one sentence given as spellings.
    pub fn tag_sentence<S: AsRef<str>>(&self, words: &[S]) -> Sentence {
        let mut sentence = Sentence::from_spellings(words);
        self.tag_adorned(&mut sentence);
        sentence
    }

    /// Tag a prepared sentence in place, using each word's standard spelling
    /// for lookup. Retaggers may change the sentence length.
    pub fn tag_adorned(&self, sentence: &mut Sentence) {
        let mut trellis = self.new_trellis();
        self.tag_with(&mut trellis, sentence);
    }

    fn tag_with(&self, trellis: &mut Trellis, sentence: &mut Sentence) {
        let _span = debug_span!("tag_sentence", words = sentence.len()).entered();
        let words = sentence.len();
        match &self.decoder {
            Decoder::MostFrequent => self.assign_most_frequent(sentence),
            Decoder::Hmm {
                order,
                lexical,
                contextual,
            } => self.decode(
                trellis,
                sentence,
                *order,
                lexical.as_ref(),
                contextual.as_ref(),
            ),
        }
        let mut changes = self.rules.as_ref().map_or(0, |r| r.apply(sentence));
        changes += run_retaggers(&self.retaggers, sentence);
        let done = self
            .stats
            .record(words, trellis.take_rejections(), changes);
        if self.progress_interval > 0 && done % self.progress_interval == 0 {
            info!(sentences = done, "tagging progress");
        }
    }

    fn assign_most_frequent(&self, sentence: &mut Sentence) {
        for word in sentence.words_mut() {
            let tags = self.candidates.candidates(&word.standard_spelling);
            word.tag = tags.most_frequent().to_string();
        }
    }

    fn decode(
        &self,
        trellis: &mut Trellis,
        sentence: &mut Sentence,
        order: Order,
        lexical: &dyn LexicalSmoother,
        contextual: &dyn ContextualSmoother,
    ) {
        if sentence.is_empty() {
            return;
        }
        trellis.start(order == Order::Trigram);
        for word in sentence.words() {
            let spelling = word.standard_spelling.as_str();
            let candidates = self.candidates.candidates(spelling);
            let tags: Vec<&str> = candidates.tags().collect();
            let probs: Vec<Probability> = tags
                .iter()
                .map(|tag| lexical.lexical_probability(spelling, tag))
                .collect();
            match order {
                Order::Bigram => trellis.advance_bigram(&tags, &probs, |tag, prev| {
                    contextual.bigram_probability(tag, prev)
                }),
                Order::Trigram => {
                    trellis.advance_trigram(&tags, &probs, |tag, prev, prev_prev| {
                        contextual.trigram_probability(tag, prev, prev_prev)
                    })
                }
            }
        }
        match trellis.best_path() {
            Some(path) => {
                debug!(score = path.score, "best path");
                for (word, tag) in sentence.words_mut().iter_mut().zip(path.tags) {
                    word.tag = tag;
                }
            }
            None => warn!(words = sentence.len(), "no surviving path"),
        }
        trellis.reset();
    }

    /// Tag sentences one after another, reusing a single trellis.
    pub fn tag_sentences<S: AsRef<str>>(&self, sentences: &[Vec<S>]) -> Vec<Sentence> {
        let mut trellis = self.new_trellis();
        sentences
            .iter()
            .map(|words| {
                let mut sentence = Sentence::from_spellings(words);
                self.tag_with(&mut trellis, &mut sentence);
                sentence
            })
            .collect()
    }

    /// Tag sentences on the rayon pool, one trellis per worker. Output order
    /// matches input order.
    pub fn tag_sentences_parallel<S: AsRef<str> + Sync>(
        &self,
        sentences: &[Vec<S>],
    ) -> Vec<Sentence> {
        sentences
            .par_iter()
            .map_init(
                || self.new_trellis(),
                |trellis, words| {
                    let mut sentence = Sentence::from_spellings(words);
                    self.tag_with(trellis, &mut sentence);
                    sentence
                },
            )
            .collect()
    }

    /// Tag sentences until `cancel` is set. The flag is checked between
    /// sentences only; the returned vector holds the completed ones.
    pub fn tag_sentences_until<S: AsRef<str>>(
        &self,
        sentences: &[Vec<S>],
        cancel: &AtomicBool,
    ) -> Vec<Sentence> {
        let mut trellis = self.new_trellis();
        let mut done = Vec::with_capacity(sentences.len());
        for words in sentences {
            if cancel.load(Ordering::Relaxed) {
                info!(
                    completed = done.len(),
                    remaining = sentences.len() - done.len(),
                    "tagging cancelled"
                );
                break;
            }
            let mut sentence = Sentence::from_spellings(words);
            self.tag_with(&mut trellis, &mut sentence);
            done.push(sentence);
        }
        done
    }

    /// Counters accumulated since construction, with the combined cache
    /// counters of the candidate source and smoothers.
    pub fn stats(&self) -> StatsSnapshot {
        let mut cache = self.candidates.cache_counters();
        if let Decoder::Hmm {
            lexical,
            contextual,
            ..
        } = &self.decoder
        {
            for (h, m) in [lexical.cache_counters(), contextual.cache_counters()] {
                cache.0 += h;
                cache.1 += m;
            }
        }
        self.stats.snapshot(cache)
    }
}

#[derive(Clone)]
struct ModelParts {
    lexicon: Arc<Lexicon>,
    suffixes: Arc<Lexicon>,
    matrix: Arc<TransitionMatrix>,
}

/// Assembles a `Tagger` from settings, a trained model and optional
/// overrides.
#[derive(Clone)]
pub struct TaggerBuilder {
    kind: TaggerKind,
    lexical: LexicalSmootherKind,
    lexical_delta: f64,
    lexical_cache: usize,
    contextual: ContextualSmootherKind,
    contextual_delta: f64,
    bigram_lambdas: [f64; 2],
    floor: f64,
    contextual_cache: usize,
    beam_threshold: f64,
    boundary_tag: String,
    guesser: GuesserConfig,
    retaggers: Vec<RetaggerKind>,
    progress_interval: u64,
    model: Option<ModelParts>,
    tagset: Arc<dyn TagSet>,
    regexp_rules: Vec<RegexpRule>,
    hepple_rules: Arc<HeppleRules>,
}

impl TaggerBuilder {
    pub fn from_settings(s: &Settings) -> Self {
        Self {
            kind: s.tagger.kind,
            lexical: s.lexical.smoother,
            lexical_delta: s.lexical.delta,
            lexical_cache: s.lexical.cache_capacity,
            contextual: s.contextual.smoother,
            contextual_delta: s.contextual.delta,
            bigram_lambdas: s.contextual.bigram_lambdas,
            floor: s.contextual.floor,
            contextual_cache: s.contextual.cache_capacity,
            beam_threshold: s.decoder.beam_threshold,
            boundary_tag: s.decoder.boundary_tag.clone(),
            guesser: GuesserConfig::from(&s.guesser),
            retaggers: s.tagger.retaggers.clone(),
            progress_interval: s.tagger.progress_interval,
            model: None,
            tagset: Arc::new(PennTagSet),
            regexp_rules: Vec::new(),
            hepple_rules: Arc::new(HeppleRules::new()),
        }
    }

    pub fn model(mut self, model: TaggerModel) -> Self {
        self.model = Some(ModelParts {
            lexicon: Arc::new(model.lexicon),
            suffixes: Arc::new(model.suffix_lexicon),
            matrix: Arc::new(model.matrix),
        });
        self
    }

    pub fn kind(mut self, kind: TaggerKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn lexical_smoother(mut self, kind: LexicalSmootherKind) -> Self {
        self.lexical = kind;
        self
    }

    pub fn contextual_smoother(mut self, kind: ContextualSmootherKind) -> Self {
        self.contextual = kind;
        self
    }

    pub fn beam_threshold(mut self, threshold: f64) -> Self {
        self.beam_threshold = threshold;
        self
    }

    pub fn retaggers(mut self, retaggers: Vec<RetaggerKind>) -> Self {
        self.retaggers = retaggers;
        self
    }

    pub fn tagset(mut self, tagset: Arc<dyn TagSet>) -> Self {
        self.tagset = tagset;
        self
    }

    pub fn regexp_rules(mut self, rules: Vec<RegexpRule>) -> Self {
        self.regexp_rules = rules;
        self
    }

    /// Rule table for the `hepple` retagger. Without one it changes nothing.
    pub fn hepple_rules(mut self, rules: HeppleRules) -> Self {
        self.hepple_rules = Arc::new(rules);
        self
    }

    pub fn build(self) -> Result<Tagger, TaggerError> {
        let model = self.model.clone().ok_or(TaggerError::MissingModel("model"))?;
        if !(0.0..=1.0).contains(&self.beam_threshold) {
            return Err(TaggerError::InvalidParameter {
                field: "beam_threshold",
                value: self.beam_threshold,
            });
        }
        let candidates = self.candidate_source(&model);
        let decoder = match self.kind.order() {
            Some(order) => Decoder::Hmm {
                order,
                lexical: self.lexical_smoother_for(candidates.clone()),
                contextual: self.contextual_smoother_for(model.matrix.clone())?,
            },
            None => Decoder::MostFrequent,
        };
        let rules = (self.kind == TaggerKind::RuleBased)
            .then(|| BackupRules::new(self.tagset.clone()));
        let retaggers = self
            .retaggers
            .iter()
            .map(|k| k.build(&self.tagset, &candidates, &self.hepple_rules))
            .collect();
        debug!(
            kind = %self.kind,
            retaggers = self.retaggers.len(),
            beam = self.beam_threshold,
            "tagger built"
        );
        Ok(Tagger {
            kind: self.kind,
            candidates,
            decoder,
            rules,
            retaggers,
            beam_threshold: self.beam_threshold,
            boundary_tag: self.boundary_tag,
            progress_interval: self.progress_interval,
            stats: TaggingStats::default(),
        })
    }

    fn candidate_source(&self, model: &ModelParts) -> Arc<dyn CandidateSource> {
        let mut config = self.guesser.clone();
        config.use_word_lexicon = self.kind != TaggerKind::Suffix;
        let guesser: Arc<dyn CandidateSource> = Arc::new(LexiconCandidates::new(
            model.lexicon.clone(),
            model.suffixes.clone(),
            self.tagset.clone(),
            config,
        ));
        match self.kind {
            TaggerKind::Regexp => {
                Arc::new(RegexpCandidates::new(self.regexp_rules.clone(), guesser))
            }
            _ => guesser,
        }
    }

    fn lexical_smoother_for(
        &self,
        candidates: Arc<dyn CandidateSource>,
    ) -> Box<dyn LexicalSmoother> {
        match self.lexical {
            LexicalSmootherKind::Additive => Box::new(AdditiveLexicalSmoother::new(
                candidates,
                self.lexical_delta,
                self.lexical_cache,
            )),
            LexicalSmootherKind::MleBackoff => {
                Box::new(MleBackoffLexicalSmoother::new(candidates, self.lexical_cache))
            }
        }
    }

    fn contextual_smoother_for(
        &self,
        matrix: Arc<TransitionMatrix>,
    ) -> Result<Box<dyn ContextualSmoother>, TaggerError> {
        let floor = Probability::new(self.floor).map_err(|_| TaggerError::InvalidParameter {
            field: "floor",
            value: self.floor,
        })?;
        Ok(match self.contextual {
            ContextualSmootherKind::Additive => Box::new(AdditiveContextualSmoother::new(
                matrix,
                self.contextual_delta,
                floor,
                self.contextual_cache,
            )),
            ContextualSmootherKind::Interpolated => Box::new(InterpolatedContextualSmoother::new(
                matrix,
                self.bigram_lambdas,
                floor,
                self.contextual_cache,
            )),
        })
    }
}
