use std::fs;
use std::path::Path;

use pos_core::training::{train_from_file, TrainingConfig};
use pos_core::{TaggerBuilder, TaggerModel};

use super::config_ops::load_settings;

pub fn train(corpus: &str, out_dir: &str, settings_file: Option<&str>) {
    let settings = load_settings(settings_file);
    let config = TrainingConfig::from_settings(settings);
    let (model, report) = die!(
        train_from_file(Path::new(corpus), &config),
        "Error reading {corpus}: {}"
    );
    eprintln!("{} tokens, {} malformed lines skipped", report.loaded, report.skipped);

    let out = Path::new(out_dir);
    die!(fs::create_dir_all(out), "Error creating {out_dir}: {}");
    die!(model.lexicon.save(&out.join("lexicon.txt")), "Error writing lexicon: {}");
    die!(
        model.suffix_lexicon.save(&out.join("suffixes.txt")),
        "Error writing suffix lexicon: {}"
    );
    die!(model.matrix.save(&out.join("matrix.txt")), "Error writing matrix: {}");
    die!(model.save(&out.join("model.bin")), "Error writing model: {}");
    eprintln!(
        "Wrote {}: {} words, {} suffixes, {} tags",
        out.display(),
        model.lexicon.len(),
        model.suffix_lexicon.len(),
        model.matrix.tag_count()
    );
}

pub fn open_model(file: &str) -> TaggerModel {
    die!(TaggerModel::open(Path::new(file)), "Error opening {file}: {}")
}

pub fn info(file: &str) {
    let model = open_model(file);
    let lex = &model.lexicon;
    println!("Model: {file}");
    println!(
        "  words:    {} (length {}..={})",
        lex.len(),
        lex.shortest_entry_len(),
        lex.longest_entry_len()
    );
    println!("  suffixes: {}", model.suffix_lexicon.len());
    println!("  tokens:   {}", model.matrix.total());
    println!("  tags:     {}", model.matrix.tag_count());

    let mut categories: Vec<(&str, u64)> = lex.all_categories().collect();
    categories.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    println!("Most frequent tags:");
    for (tag, count) in categories.iter().take(10) {
        println!("  {tag:<8} {count}");
    }
}

pub fn lookup(file: &str, word: &str, settings_file: Option<&str>) {
    let settings = load_settings(settings_file);
    let model = open_model(file);
    if let Some(entry) = model.lexicon.entry(word) {
        for tag in entry.tags() {
            println!(
                "{word}\t{tag}\t{}\t{}",
                entry.category_count(tag),
                entry.lemma(tag).unwrap_or("")
            );
        }
        return;
    }
    let tagger = die!(
        TaggerBuilder::from_settings(settings).model(model).build(),
        "Error: {}"
    );
    let guessed = tagger.candidates().candidates(word);
    println!("{word}: not in lexicon, guessed from {:?}", guessed.origin());
    for (tag, count) in guessed.iter() {
        println!("{word}\t{tag}\t{count}");
    }
}
