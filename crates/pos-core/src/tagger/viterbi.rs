use tracing::debug;

use crate::probability::Probability;

/// One trellis state. For a bigram model `prev_tag` is unused; for a trigram
/// model a state is the pair `(tag, prev_tag)`.
#[derive(Debug, Clone)]
struct State {
    tag: String,
    prev_tag: Option<String>,
    /// Cumulative natural-log score.
    score: f64,
    /// Index of the originating state in the previous column.
    back: Option<usize>,
    alive: bool,
}

/// Result of a completed decode.
#[derive(Debug, Clone, PartialEq)]
pub struct BestPath {
    pub tags: Vec<String>,
    /// Natural log of the path probability.
    pub score: f64,
}

/// Viterbi trellis with beam pruning.
///
/// Scores are kept as sums of natural logs, so the product in the recurrence
/// becomes a sum and the beam test `score < best * threshold` becomes
/// `score < best + ln(threshold)`. A threshold of 0 keeps every state.
///
/// Ties are broken by first-encountered maximum with a strict `>`: callers
/// pass candidate tags in lexical order and previous states are visited in
/// column order, so the lexically smallest tag wins. Pruned states are marked
/// dead rather than removed, keeping backpointer indices stable.
pub struct Trellis {
    columns: Vec<Vec<State>>,
    beam_ln: f64,
    boundary_tag: String,
    rejections: u64,
}

impl Trellis {
    pub fn new(beam_threshold: f64, boundary_tag: &str) -> Self {
        assert!(
            (0.0..=1.0).contains(&beam_threshold),
            "beam threshold must be in [0, 1], got {beam_threshold}"
        );
        Self {
            columns: Vec::new(),
            beam_ln: beam_threshold.ln(),
            boundary_tag: boundary_tag.to_string(),
            rejections: 0,
        }
    }

    /// Seed the start column with the boundary tag as the assumed previous
    /// context. For trigram decoding the boundary also fills the tag before it.
    pub fn start(&mut self, trigram: bool) {
        assert!(
            self.columns.is_empty(),
            "trellis must be reset between sentences"
        );
        self.columns.push(vec![State {
            tag: self.boundary_tag.clone(),
            prev_tag: trigram.then(|| self.boundary_tag.clone()),
            score: 0.0,
            back: None,
            alive: true,
        }]);
    }

    /// Clear all states, scores and backpointers. The rejection counter is
    /// kept; it is read by the caller after each sentence.
    pub fn reset(&mut self) {
        self.columns.clear();
    }

    pub fn take_rejections(&mut self) -> u64 {
        std::mem::take(&mut self.rejections)
    }

    /// Number of words decoded so far.
    pub fn positions(&self) -> usize {
        self.columns.len().saturating_sub(1)
    }

    /// Surviving states in the latest column.
    pub fn surviving(&self) -> usize {
        self.columns
            .last()
            .map_or(0, |c| c.iter().filter(|s| s.alive).count())
    }

    fn check_step(&self, tags: &[&str], lexical: &[Probability]) {
        assert!(!self.columns.is_empty(), "trellis stepped before start");
        assert!(!tags.is_empty(), "word has no candidate tags");
        assert_eq!(
            tags.len(),
            lexical.len(),
            "one lexical probability per candidate tag"
        );
    }

    /// Bigram step: one new state per candidate tag.
    ///
    /// `contextual(tag, prev)` is called once per (candidate, surviving
    /// previous state) pair.
    pub fn advance_bigram(
        &mut self,
        tags: &[&str],
        lexical: &[Probability],
        mut contextual: impl FnMut(&str, &str) -> Probability,
    ) {
        self.check_step(tags, lexical);
        let prev = self.columns.last().map(Vec::as_slice).unwrap_or_default();
        let mut column = Vec::with_capacity(tags.len());
        for (&tag, lex) in tags.iter().zip(lexical) {
            let mut best: Option<(f64, usize)> = None;
            for (j, state) in prev.iter().enumerate().filter(|(_, s)| s.alive) {
                let score = state.score + contextual(tag, state.tag.as_str()).ln() + lex.ln();
                if best.map_or(true, |(b, _)| score > b) {
                    best = Some((score, j));
                }
            }
            if let Some((score, j)) = best {
                column.push(State {
                    tag: tag.to_string(),
                    prev_tag: None,
                    score,
                    back: Some(j),
                    alive: true,
                });
            }
        }
        self.push_column(column);
    }

    /// Trigram step: one new state per (candidate tag, previous tag) pair.
    ///
    /// `contextual(tag, prev, prev_prev)` is called once per (candidate,
    /// surviving previous state) pair.
    pub fn advance_trigram(
        &mut self,
        tags: &[&str],
        lexical: &[Probability],
        mut contextual: impl FnMut(&str, &str, &str) -> Probability,
    ) {
        self.check_step(tags, lexical);
        let prev = self.columns.last().map(Vec::as_slice).unwrap_or_default();
        let mut column: Vec<State> = Vec::new();
        for (&tag, lex) in tags.iter().zip(lexical) {
            let first = column.len();
            for (j, state) in prev.iter().enumerate().filter(|(_, s)| s.alive) {
                let prev_prev = state.prev_tag.as_deref().unwrap_or(&self.boundary_tag);
                let score =
                    state.score + contextual(tag, state.tag.as_str(), prev_prev).ln() + lex.ln();
                match column[first..]
                    .iter_mut()
                    .find(|s| s.prev_tag.as_deref() == Some(state.tag.as_str()))
                {
                    Some(existing) => {
                        if score > existing.score {
                            existing.score = score;
                            existing.back = Some(j);
                        }
                    }
                    None => column.push(State {
                        tag: tag.to_string(),
                        prev_tag: Some(state.tag.clone()),
                        score,
                        back: Some(j),
                        alive: true,
                    }),
                }
            }
        }
        self.push_column(column);
    }

    fn push_column(&mut self, mut column: Vec<State>) {
        let best = column
            .iter()
            .map(|s| s.score)
            .fold(f64::NEG_INFINITY, f64::max);
        let cutoff = best + self.beam_ln;
        let mut pruned = 0u64;
        for state in &mut column {
            if state.score < cutoff {
                state.alive = false;
                pruned += 1;
            }
        }
        self.rejections += pruned;
        debug!(
            position = self.columns.len(),
            states = column.len(),
            pruned,
            "trellis step"
        );
        self.columns.push(column);
    }

    /// Highest-scoring surviving final state, walked back to the start.
    /// Returns `None` before `start`.
    pub fn best_path(&self) -> Option<BestPath> {
        let last = self.columns.last()?;
        let mut best: Option<(f64, usize)> = None;
        for (i, state) in last.iter().enumerate().filter(|(_, s)| s.alive) {
            if best.map_or(true, |(b, _)| state.score > b) {
                best = Some((state.score, i));
            }
        }
        let (score, mut idx) = best?;
        let mut tags = Vec::with_capacity(self.positions());
        for column in self.columns[1..].iter().rev() {
            let state = &column[idx];
            tags.push(state.tag.clone());
            idx = state.back.unwrap_or(0);
        }
        tags.reverse();
        Some(BestPath { tags, score })
    }
}
