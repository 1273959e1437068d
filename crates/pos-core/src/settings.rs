//! Global settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`
//!
//! Taggers never read the singleton directly; `TaggerBuilder::from_settings`
//! copies values out of whichever `Settings` it is handed.

use std::sync::OnceLock;

use serde::Deserialize;

use crate::smoothing::{ContextualSmootherKind, LexicalSmootherKind};
use crate::tagger::{RetaggerKind, TaggerKind};

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub lexical: LexicalSettings,
    pub contextual: ContextualSettings,
    pub decoder: DecoderSettings,
    pub guesser: GuesserSettings,
    pub tagger: TaggerSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LexicalSettings {
    pub smoother: LexicalSmootherKind,
    pub delta: f64,
    pub cache_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContextualSettings {
    pub smoother: ContextualSmootherKind,
    pub delta: f64,
    pub bigram_lambdas: [f64; 2],
    pub floor: f64,
    pub cache_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecoderSettings {
    pub beam_threshold: f64,
    pub boundary_tag: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuesserSettings {
    pub max_suffix_len: usize,
    pub cache_capacity: usize,
    pub number_tag: String,
    pub proper_noun_tag: String,
    pub noun_tag: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaggerSettings {
    pub kind: TaggerKind,
    #[serde(default)]
    pub retaggers: Vec<RetaggerKind>,
    pub progress_interval: u64,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings =
        toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! invalid {
        ($field:expr, $reason:expr) => {
            return Err(SettingsError::InvalidValue {
                field: $field.to_string(),
                reason: $reason.to_string(),
            })
        };
    }
    macro_rules! check_positive_usize {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                invalid!(
                    concat!(stringify!($section), ".", stringify!($field)),
                    "must be positive"
                );
            }
        };
    }
    macro_rules! check_unit_interval {
        ($section:ident . $field:ident) => {
            let v = s.$section.$field;
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                invalid!(
                    concat!(stringify!($section), ".", stringify!($field)),
                    "must be within [0, 1]"
                );
            }
        };
    }
    macro_rules! check_non_empty {
        ($section:ident . $field:ident) => {
            if s.$section.$field.trim().is_empty() {
                invalid!(
                    concat!(stringify!($section), ".", stringify!($field)),
                    "must not be empty"
                );
            }
        };
    }

    if !s.lexical.delta.is_finite() || s.lexical.delta < 0.0 {
        invalid!("lexical.delta", "must be non-negative");
    }
    check_positive_usize!(lexical.cache_capacity);

    if !s.contextual.delta.is_finite() || s.contextual.delta <= 0.0 {
        invalid!("contextual.delta", "must be positive");
    }
    let [low, high] = s.contextual.bigram_lambdas;
    if low < 0.0 || high < 0.0 || ((low + high) - 1.0).abs() > 1e-9 {
        invalid!(
            "contextual.bigram_lambdas",
            "weights must be non-negative and sum to 1"
        );
    }
    check_unit_interval!(contextual.floor);
    if s.contextual.floor == 0.0 {
        invalid!("contextual.floor", "must be positive");
    }
    check_positive_usize!(contextual.cache_capacity);

    check_unit_interval!(decoder.beam_threshold);
    check_non_empty!(decoder.boundary_tag);

    check_positive_usize!(guesser.max_suffix_len);
    check_positive_usize!(guesser.cache_capacity);
    check_non_empty!(guesser.number_tag);
    check_non_empty!(guesser.proper_noun_tag);
    check_non_empty!(guesser.noun_tag);

    if s.tagger.progress_interval == 0 {
        invalid!("tagger.progress_interval", "must be positive");
    }

    Ok(())
}
