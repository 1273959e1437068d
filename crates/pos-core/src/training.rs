//! Build a `TaggerModel` from a tagged corpus.
//!
//! Corpus format, one token per line: `spelling \t tag [\t lemma]`. Blank
//! lines are ignored and whitespace around each field is dropped. A line
//! holding only punctuation is tagged as itself.
//! Transition counts use a running two-tag context that starts at the
//! boundary tag and runs across the whole corpus.

use std::fs;
use std::path::Path;

use tracing::{debug_span, info, warn};

use crate::lexicon::{Lexicon, LexiconError, LoadReport, TaggerModel, TransitionMatrix};
use crate::unicode::is_punctuation_or_symbol;

#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub max_suffix_len: usize,
    pub boundary_tag: String,
}

impl TrainingConfig {
    pub fn from_settings(s: &crate::settings::Settings) -> Self {
        Self {
            max_suffix_len: s.guesser.max_suffix_len,
            boundary_tag: s.decoder.boundary_tag.clone(),
        }
    }
}

fn parse_token(line: &str) -> Result<(&str, &str, &str), String> {
    let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
    match fields[..] {
        [spelling] if is_punctuation_or_symbol(spelling) => Ok((spelling, spelling, spelling)),
        [spelling, tag] if !spelling.is_empty() && !tag.is_empty() => Ok((spelling, tag, "")),
        [spelling, tag, lemma] if !spelling.is_empty() && !tag.is_empty() => {
            Ok((spelling, tag, lemma))
        }
        _ => Err(format!("expected spelling, tag and optional lemma, got {line:?}")),
    }
}

/// Train from corpus text. Malformed lines are skipped and counted.
pub fn train_from_text(text: &str, config: &TrainingConfig) -> (TaggerModel, LoadReport) {
    let _span = debug_span!("train", bytes = text.len()).entered();
    let mut lexicon = Lexicon::new();
    let mut matrix = TransitionMatrix::new();
    let mut report = LoadReport::default();
    let mut prev_prev = config.boundary_tag.clone();
    let mut prev = config.boundary_tag.clone();

    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let (spelling, tag, lemma) = match parse_token(line) {
            Ok(token) => token,
            Err(reason) => {
                warn!(line = lineno + 1, %reason, "skipping malformed corpus line");
                report.skipped += 1;
                continue;
            }
        };
        lexicon.add_entry(spelling, tag, lemma, 1);
        matrix.increment_unigram(tag, 1);
        matrix.increment_bigram(&prev, tag, 1);
        matrix.increment_trigram(&prev_prev, &prev, tag, 1);
        prev_prev = std::mem::replace(&mut prev, tag.to_string());
        report.loaded += 1;
    }

    let suffixes = lexicon.build_suffix_lexicon(config.max_suffix_len);
    info!(
        tokens = report.loaded,
        skipped = report.skipped,
        words = lexicon.len(),
        suffixes = suffixes.len(),
        tags = matrix.tag_count(),
        "training finished"
    );
    (TaggerModel::new(lexicon, suffixes, matrix), report)
}

pub fn train_from_file(
    path: &Path,
    config: &TrainingConfig,
) -> Result<(TaggerModel, LoadReport), LexiconError> {
    let text = fs::read_to_string(path)?;
    Ok(train_from_text(&text, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{default_toml, parse_settings_toml};
    use crate::tagger::{TaggerBuilder, TaggerKind};

    fn config() -> TrainingConfig {
        TrainingConfig {
            max_suffix_len: 3,
            boundary_tag: ".".to_string(),
        }
    }

    const CORPUS: &str = "\
the\tDT\tthe
dog\tNN\tdog
barks\tVBZ\tbark
.

a\tDT
dog\tNN
barks\tVBZ
.\t.
the\tDT
dogs\tNNS\tdog
run\tVBP\trun
.
";

    #[test]
    fn counts_words_and_transitions() {
        let (model, report) = train_from_text(CORPUS, &config());
        assert_eq!(report, LoadReport { loaded: 12, skipped: 0 });
        assert_eq!(model.lexicon.category_count("dog", "NN"), 2);
        assert_eq!(model.lexicon.lemma("dogs", "NNS"), Some("dog"));
        assert_eq!(model.lexicon.category_count(".", "."), 3);

        let m = &model.matrix;
        assert_eq!(m.unigram_count("DT"), 3);
        assert_eq!(m.total(), 12);
        assert_eq!(m.bigram_count("DT", "NN"), 2);
        assert_eq!(m.bigram_count(".", "DT"), 3);
        assert_eq!(m.trigram_count(".", ".", "DT"), 1);
        assert_eq!(m.trigram_count("NN", "VBZ", "."), 2);
    }

    #[test]
    fn builds_suffix_lexicon() {
        let (model, _) = train_from_text(CORPUS, &config());
        assert!(model.suffix_lexicon.contains("rks"));
        assert!(!model.suffix_lexicon.contains("."));
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let text = "dog\tNN\nno-tag-here\n\tNN\ndog\t\na\tb\tc\td\ncat\tNN\n";
        let (model, report) = train_from_text(text, &config());
        assert_eq!(report, LoadReport { loaded: 2, skipped: 4 });
        assert_eq!(model.matrix.total(), 2);
    }

    #[test]
    fn trained_model_tags_its_corpus() {
        let (model, _) = train_from_text(CORPUS, &config());
        let settings = parse_settings_toml(default_toml()).unwrap();
        let tagger = TaggerBuilder::from_settings(&settings)
            .model(model)
            .kind(TaggerKind::Bigram)
            .build()
            .unwrap();
        let sentence = tagger.tag_sentence(&["the", "dog", "barks", "."]);
        assert_eq!(sentence.tags(), vec!["DT", "NN", "VBZ", "."]);
    }

    #[test]
    fn surrounding_whitespace_is_dropped() {
        let (model, report) = train_from_text("dog \t NN\t dog\n . \n", &config());
        assert_eq!(report, LoadReport { loaded: 2, skipped: 0 });
        assert_eq!(model.lexicon.spellings(), vec![".", "dog"]);
        assert_eq!(model.lexicon.lemma("dog", "NN"), Some("dog"));
        assert_eq!(model.matrix.bigram_count("NN", "."), 1);
    }

    #[test]
    fn trained_tables_survive_a_text_round_trip() {
        let text = format!("{CORPUS}dog \tNN\nPiano\tNNP \t piano\n");
        let (model, _) = train_from_text(&text, &config());

        let (lexicon, report) = Lexicon::from_text(&model.lexicon.to_text());
        assert_eq!(report.skipped, 0);
        assert_eq!(lexicon, model.lexicon);

        let (suffixes, _) = Lexicon::from_text(&model.suffix_lexicon.to_text());
        assert_eq!(suffixes, model.suffix_lexicon);

        let (matrix, report) = TransitionMatrix::from_text(&model.matrix.to_text());
        assert_eq!(report.skipped, 0);
        assert_eq!(matrix, model.matrix);
    }

    #[test]
    fn reads_corpus_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.tsv");
        std::fs::write(&path, CORPUS).unwrap();
        let (model, report) = train_from_file(&path, &config()).unwrap();
        assert_eq!(report.loaded, 12);
        assert_eq!(model.lexicon.category_count("barks", "VBZ"), 2);
    }
}
