use std::fs;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;

use pos_core::candidates::RegexpRule;
use pos_core::settings::Settings;
use pos_core::tagger::{HeppleRules, RetaggerKind};
use pos_core::{TaggerBuilder, TaggerKind};

use super::config_ops::load_settings;
use super::model_ops::open_model;

pub struct TagOptions<'a> {
    pub kind: Option<TaggerKind>,
    pub settings_file: Option<&'a str>,
    /// `pattern \t tag` rules for the regexp tagger.
    pub rules_file: Option<&'a str>,
    /// Rule table that switches on the hepple retagger.
    pub hepple_rules_file: Option<&'a str>,
    pub parallel: bool,
}

/// Apply `--rules` and `--hepple-rules`, reporting rule counts on stderr.
/// A hepple rule table also appends the hepple retagger when the settings
/// do not list it.
fn with_rule_files(
    mut builder: TaggerBuilder,
    settings: &Settings,
    opts: &TagOptions,
) -> Result<TaggerBuilder, String> {
    if let Some(file) = opts.rules_file {
        let text = fs::read_to_string(file).map_err(|e| format!("reading {file}: {e}"))?;
        let (rules, report) = RegexpRule::parse_rules(&text);
        eprintln!("{file}: {} rules, {} skipped", report.loaded, report.skipped);
        if opts.kind.unwrap_or(settings.tagger.kind) != TaggerKind::Regexp {
            eprintln!("Warning: --rules only affects the regexp tagger");
        }
        builder = builder.regexp_rules(rules);
    }
    if let Some(file) = opts.hepple_rules_file {
        let (rules, report) =
            HeppleRules::load(Path::new(file)).map_err(|e| format!("reading {file}: {e}"))?;
        eprintln!("{file}: {} rules, {} skipped", report.loaded, report.skipped);
        let mut retaggers = settings.tagger.retaggers.clone();
        if !retaggers.contains(&RetaggerKind::Hepple) {
            retaggers.push(RetaggerKind::Hepple);
        }
        builder = builder.hepple_rules(rules).retaggers(retaggers);
    }
    Ok(builder)
}

pub fn tag(model_file: &str, opts: &TagOptions) {
    let settings = load_settings(opts.settings_file);
    let mut builder = TaggerBuilder::from_settings(settings).model(open_model(model_file));
    if let Some(kind) = opts.kind {
        builder = builder.kind(kind);
    }
    builder = die!(with_rule_files(builder, settings, opts), "Error: {}");
    let tagger = die!(builder.build(), "Error: {}");

    let mut sentences: Vec<Vec<String>> = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = die!(line, "Error reading stdin: {}");
        sentences.push(line.split_whitespace().map(str::to_string).collect());
    }

    let tagged = if opts.parallel {
        tagger.tag_sentences_parallel(&sentences)
    } else {
        tagger.tag_sentences(&sentences)
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for sentence in &tagged {
        let line: Vec<String> = sentence
            .words()
            .iter()
            .map(|w| format!("{}/{}", w.spelling, w.tag))
            .collect();
        die!(writeln!(out, "{}", line.join(" ")), "Error writing output: {}");
    }
    die!(out.flush(), "Error writing output: {}");

    let stats = tagger.stats();
    eprintln!(
        "{} sentences, {} words, {} beam rejections, {} retagger changes, cache {}/{} hits",
        stats.sentences,
        stats.words,
        stats.beam_rejections,
        stats.retagger_changes,
        stats.cache_hits,
        stats.cache_hits + stats.cache_misses
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pos_core::settings::{default_toml, parse_settings_toml};
    use pos_core::training::{train_from_text, TrainingConfig};
    use pos_core::TaggerModel;

    const CORPUS: &str = "\
the\tDT\ndog\tNN\nbarks\tVBZ\n,\t,\n\
the\tDT\ndog\tNN\nbarks\tVBZ\n.\t.\n\
the\tDT\nbarks\tNNS\nwalked\tVBD\n.\t.\n";

    fn model(settings: &Settings) -> TaggerModel {
        train_from_text(CORPUS, &TrainingConfig::from_settings(settings)).0
    }

    fn options<'a>(
        kind: TaggerKind,
        rules_file: Option<&'a str>,
        hepple_rules_file: Option<&'a str>,
    ) -> TagOptions<'a> {
        TagOptions {
            kind: Some(kind),
            settings_file: None,
            rules_file,
            hepple_rules_file,
            parallel: false,
        }
    }

    #[test]
    fn regexp_rules_file_reaches_the_tagger() {
        let settings = parse_settings_toml(default_toml()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.tsv");
        std::fs::write(&path, "# verbs\nwalk.*\tVBN\n(unclosed\tNN\n").unwrap();
        let path = path.to_str().unwrap();

        let opts = options(TaggerKind::Regexp, Some(path), None);
        let builder = TaggerBuilder::from_settings(&settings)
            .model(model(&settings))
            .kind(TaggerKind::Regexp);
        let tagger = with_rule_files(builder, &settings, &opts)
            .unwrap()
            .build()
            .unwrap();
        let sentence = tagger.tag_sentence(&["walked", "dog"]);
        assert_eq!(sentence.tags(), vec!["VBN", "NN"]);
    }

    #[test]
    fn hepple_rules_file_enables_the_retagger() {
        let settings = parse_settings_toml(default_toml()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hepple.rules");
        std::fs::write(&path, "VBZ NNS NEXTWD ,\n").unwrap();
        let path = path.to_str().unwrap();

        let opts = options(TaggerKind::Unigram, None, Some(path));
        let builder = TaggerBuilder::from_settings(&settings)
            .model(model(&settings))
            .kind(TaggerKind::Unigram);
        let tagger = with_rule_files(builder, &settings, &opts)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            tagger.retagger_names(),
            vec!["proper-noun", "pronoun-period", "hepple"]
        );
        assert_eq!(tagger.tag_sentence(&["barks", ","]).tags(), vec!["NNS", ","]);
    }

    #[test]
    fn missing_rules_file_is_an_error() {
        let settings = parse_settings_toml(default_toml()).unwrap();
        let opts = options(TaggerKind::Regexp, Some("/nonexistent/rules.tsv"), None);
        let builder = TaggerBuilder::from_settings(&settings);
        let err = with_rule_files(builder, &settings, &opts).err().unwrap();
        assert!(err.contains("/nonexistent/rules.tsv"));
    }
}
