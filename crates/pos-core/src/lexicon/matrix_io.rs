use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::{debug_span, warn};

use super::lexicon_io::write_atomic;
use super::matrix::TransitionMatrix;
use super::{LexiconError, LoadReport};

impl TransitionMatrix {
    /// Build from tab-separated text.
    ///
    /// One n-gram per line, count last:
    /// `tag \t count`, `prev \t tag \t count` or `prev_prev \t prev \t tag \t count`.
    /// Blank lines are ignored; malformed lines are skipped and counted.
    pub fn from_text(text: &str) -> (Self, LoadReport) {
        let mut matrix = TransitionMatrix::new();
        let mut report = LoadReport::default();
        for (lineno, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            let parsed = match fields.split_last() {
                Some((count, tags)) if (1..=3).contains(&tags.len()) => {
                    if tags.iter().any(|t| t.is_empty()) {
                        Err("empty tag".to_string())
                    } else {
                        count
                            .parse::<u64>()
                            .map(|c| (tags, c))
                            .map_err(|e| format!("count '{count}': {e}"))
                    }
                }
                _ => Err(format!("expected 2 to 4 fields, got {}", fields.len())),
            };
            match parsed {
                Ok((tags, count)) => {
                    match tags {
                        [t] => matrix.increment_unigram(t, count),
                        [p, t] => matrix.increment_bigram(p, t, count),
                        [pp, p, t] => matrix.increment_trigram(pp, p, t, count),
                        _ => unreachable!("arity checked above"),
                    }
                    report.loaded += 1;
                }
                Err(reason) => {
                    warn!(line = lineno + 1, %reason, "skipping malformed matrix line");
                    report.skipped += 1;
                }
            }
        }
        (matrix, report)
    }

    /// Serialize to text: unigrams, then bigrams, then trigrams, each sorted.
    /// Zero counts are omitted.
    pub fn to_text(&self) -> String {
        let mut unigrams: Vec<_> = self.unigram_iter().filter(|e| e.1 > 0).collect();
        unigrams.sort_unstable();
        let mut bigrams: Vec<_> = self.bigram_iter().filter(|e| e.2 > 0).collect();
        bigrams.sort_unstable();
        let mut trigrams: Vec<_> = self.trigram_iter().filter(|e| e.3 > 0).collect();
        trigrams.sort_unstable();

        let mut out = String::new();
        for (t, c) in unigrams {
            let _ = writeln!(out, "{t}\t{c}");
        }
        for (p, t, c) in bigrams {
            let _ = writeln!(out, "{p}\t{t}\t{c}");
        }
        for (pp, p, t, c) in trigrams {
            let _ = writeln!(out, "{pp}\t{p}\t{t}\t{c}");
        }
        out
    }

    pub fn load(path: &Path) -> Result<(Self, LoadReport), LexiconError> {
        let _span = debug_span!("matrix_load", path = %path.display()).entered();
        let text = fs::read_to_string(path)?;
        Ok(Self::from_text(&text))
    }

    /// Atomic write: write to .tmp then rename.
    pub fn save(&self, path: &Path) -> Result<(), LexiconError> {
        write_atomic(path, self.to_text().as_bytes())
    }
}
