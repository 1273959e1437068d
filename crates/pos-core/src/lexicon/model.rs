use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use tracing::debug_span;

use super::lexicon::Lexicon;
use super::lexicon_io::write_atomic;
use super::matrix::TransitionMatrix;
use super::LexiconError;

pub(super) const MAGIC: &[u8; 4] = b"PTMD";
pub(super) const VERSION: u8 = 1;
const HEADER_SIZE: usize = 5;

/// Trained tagger data: word lexicon, suffix lexicon and transition matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaggerModel {
    pub lexicon: Lexicon,
    pub suffix_lexicon: Lexicon,
    pub matrix: TransitionMatrix,
}

impl TaggerModel {
    pub fn new(lexicon: Lexicon, suffix_lexicon: Lexicon, matrix: TransitionMatrix) -> Self {
        Self {
            lexicon,
            suffix_lexicon,
            matrix,
        }
    }

    /// Serialize to bytes (PTMD format): magic, version, bincode body.
    pub fn to_bytes(&self) -> Result<Vec<u8>, LexiconError> {
        let body = bincode::serialize(self).map_err(LexiconError::Serialize)?;
        let mut buf = Vec::with_capacity(HEADER_SIZE + body.len());
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&body);
        Ok(buf)
    }

    /// Deserialize from bytes (PTMD format).
    pub fn from_bytes(data: &[u8]) -> Result<Self, LexiconError> {
        if data.len() < HEADER_SIZE {
            return Err(LexiconError::InvalidHeader);
        }
        if &data[..4] != MAGIC {
            return Err(LexiconError::InvalidMagic);
        }
        if data[4] != VERSION {
            return Err(LexiconError::UnsupportedVersion(data[4]));
        }
        bincode::deserialize(&data[HEADER_SIZE..]).map_err(LexiconError::Deserialize)
    }

    /// Atomic write: write to .tmp then rename.
    pub fn save(&self, path: &Path) -> Result<(), LexiconError> {
        write_atomic(path, &self.to_bytes()?)
    }

    pub fn open(path: &Path) -> Result<Self, LexiconError> {
        let _span = debug_span!("model_open", path = %path.display()).entered();
        let file = File::open(path)?;
        // SAFETY: The file is opened read-only and the mapping is immutable.
        // The mapping is dropped once the model has been decoded.
        let mmap = unsafe { Mmap::map(&file)? };
        Self::from_bytes(&mmap)
    }
}
