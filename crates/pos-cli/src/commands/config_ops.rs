use std::fs;

use pos_core::settings::{self, Settings};

pub fn settings_export() {
    print!("{}", settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(settings::parse_settings_toml(&content), "Error: {}");
    println!(
        "OK: tagger.kind={}, lexical.smoother={}, contextual.smoother={}, decoder.beam_threshold={}",
        s.tagger.kind, s.lexical.smoother, s.contextual.smoother, s.decoder.beam_threshold
    );
}

/// Install settings from `file` when given, then return the active settings.
pub fn load_settings(file: Option<&str>) -> &'static Settings {
    if let Some(file) = file {
        let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
        die!(settings::init_custom(content), "Error in {file}: {}");
    }
    settings::settings()
}
