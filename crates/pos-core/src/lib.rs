//! Hidden-Markov-model part-of-speech tagging.
//!
//! A sentence flows from candidate-tag lookup (`candidates`) through the
//! lexical and contextual smoothers (`smoothing`) into a beam-pruned Viterbi
//! trellis (`tagger`), and the optimal tags are then corrected by retagging
//! passes. Trained counts live in `lexicon`; `training` builds them from a
//! tagged corpus.

pub mod cache;
pub mod candidates;
pub mod lexicon;
pub(crate) mod numeric;
pub mod probability;
pub mod sentence;
pub mod settings;
pub mod smoothing;
pub mod tagger;
pub mod tagset;
pub mod training;
pub mod unicode;

#[cfg(test)]
mod testutil;

pub use lexicon::{Lexicon, LexiconError, LoadReport, TaggerModel, TransitionMatrix};
pub use probability::Probability;
pub use sentence::{AdornedWord, Sentence};
pub use tagger::{Tagger, TaggerBuilder, TaggerError, TaggerKind};
