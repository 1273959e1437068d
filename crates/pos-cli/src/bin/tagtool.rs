use clap::{Parser, Subcommand};

use pos_cli::commands::tag_ops::TagOptions;
use pos_cli::commands::{config_ops, model_ops, tag_ops};
use pos_cli::trace_init::init_tracing;
use pos_core::TaggerKind;

#[derive(Parser)]
#[command(name = "tagtool", about = "HMM part-of-speech tagger")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train a model from a tagged corpus (spelling \t tag [\t lemma] per line)
    Train {
        /// Tagged corpus file
        corpus: String,
        /// Output directory for text tables and model.bin
        out_dir: String,
        /// Settings TOML file
        #[arg(long)]
        settings: Option<String>,
    },
    /// Tag whitespace-tokenized sentences from stdin, one per line
    Tag {
        /// Model file (model.bin)
        model: String,
        /// Tagger kind (unigram, bigram, trigram, rule-based, suffix, regexp)
        #[arg(long)]
        tagger: Option<TaggerKind>,
        /// Settings TOML file
        #[arg(long)]
        settings: Option<String>,
        /// Regexp tagger rules, one `pattern <TAB> tag` per line
        #[arg(long)]
        rules: Option<String>,
        /// Hepple rule table (`from to TYPE word` per line); enables the hepple retagger
        #[arg(long)]
        hepple_rules: Option<String>,
        /// Tag sentences on the rayon thread pool
        #[arg(long)]
        parallel: bool,
    },
    /// Show model statistics
    Info {
        /// Model file
        model: String,
    },
    /// Show lexicon entries or guessed tags for a word
    Lookup {
        /// Model file
        model: String,
        /// Word to look up
        word: String,
        /// Settings TOML file
        #[arg(long)]
        settings: Option<String>,
    },
    /// Print the default settings TOML
    SettingsExport,
    /// Validate a settings TOML file
    SettingsValidate {
        /// Settings TOML file
        file: String,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Train {
            corpus,
            out_dir,
            settings,
        } => model_ops::train(&corpus, &out_dir, settings.as_deref()),
        Command::Tag {
            model,
            tagger,
            settings,
            rules,
            hepple_rules,
            parallel,
        } => tag_ops::tag(
            &model,
            &TagOptions {
                kind: tagger,
                settings_file: settings.as_deref(),
                rules_file: rules.as_deref(),
                hepple_rules_file: hepple_rules.as_deref(),
                parallel,
            },
        ),
        Command::Info { model } => model_ops::info(&model),
        Command::Lookup {
            model,
            word,
            settings,
        } => model_ops::lookup(&model, &word, settings.as_deref()),
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}
