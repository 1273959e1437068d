//! Lexicon and transition-matrix storage.
//!
//! `Lexicon` maps a spelling to its part-of-speech categories with counts and
//! lemmata. `TransitionMatrix` stores unigram/bigram/trigram tag counts for
//! contextual scoring. `TaggerModel` bundles both for fast binary loading.

mod entry;
#[allow(clippy::module_inception)]
mod lexicon;
mod lexicon_io;
pub mod matrix;
mod matrix_io;
mod model;
#[cfg(test)]
mod tests;

pub use entry::{CategoryCount, LexiconEntry};
pub use lexicon::Lexicon;
pub use matrix::TransitionMatrix;
pub use model::TaggerModel;

use std::io;

/// Unified error type for lexicon, transition-matrix and model-bundle I/O.
///
/// Malformed lines in the text formats are not errors; they are skipped and
/// counted in a `LoadReport`.
#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid header (too short)")]
    InvalidHeader,

    #[error("invalid magic bytes (expected PTMD)")]
    InvalidMagic,

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    #[error("serialization error: {0}")]
    Serialize(bincode::Error),

    #[error("deserialization error: {0}")]
    Deserialize(bincode::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Outcome of loading a tab-separated text resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Lines that produced an entry.
    pub loaded: usize,
    /// Non-blank lines that were malformed and ignored.
    pub skipped: usize,
}
