//! Lexical and contextual probability smoothing.
//!
//! `LexicalSmoother` estimates P(word | tag) from candidate counts;
//! `ContextualSmoother` estimates P(tag | previous tags) from the transition
//! matrix. Every estimate is a `Probability`, so never zero, and is memoized
//! in a bounded LRU cache whose capacity comes from settings.

mod contextual;
mod lexical;
#[cfg(test)]
mod tests;

pub use contextual::{AdditiveContextualSmoother, InterpolatedContextualSmoother};
pub use lexical::{AdditiveLexicalSmoother, MleBackoffLexicalSmoother};

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::probability::Probability;
use crate::tagger::TaggerError;

pub trait LexicalSmoother: Send + Sync {
    /// P(spelling | tag).
    fn lexical_probability(&self, spelling: &str, tag: &str) -> Probability;

    /// Cache (hits, misses).
    fn cache_counters(&self) -> (u64, u64) {
        (0, 0)
    }
}

pub trait ContextualSmoother: Send + Sync {
    /// P(tag | prev).
    fn bigram_probability(&self, tag: &str, prev: &str) -> Probability;

    /// P(tag | prev_prev, prev).
    fn trigram_probability(&self, tag: &str, prev: &str, prev_prev: &str) -> Probability;

    /// Cache (hits, misses).
    fn cache_counters(&self) -> (u64, u64) {
        (0, 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LexicalSmootherKind {
    Additive,
    MleBackoff,
}

impl LexicalSmootherKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Additive => "additive",
            Self::MleBackoff => "mle-backoff",
        }
    }
}

impl FromStr for LexicalSmootherKind {
    type Err = TaggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "additive" => Ok(Self::Additive),
            "mle-backoff" => Ok(Self::MleBackoff),
            other => Err(TaggerError::UnknownSmoother(other.to_string())),
        }
    }
}

impl fmt::Display for LexicalSmootherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContextualSmootherKind {
    Additive,
    Interpolated,
}

impl ContextualSmootherKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Additive => "additive",
            Self::Interpolated => "interpolated",
        }
    }
}

impl FromStr for ContextualSmootherKind {
    type Err = TaggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "additive" => Ok(Self::Additive),
            "interpolated" => Ok(Self::Interpolated),
            other => Err(TaggerError::UnknownSmoother(other.to_string())),
        }
    }
}

impl fmt::Display for ContextualSmootherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
