use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::{debug_span, warn};

use super::entry::{CategoryCount, LexiconEntry};
use super::lexicon::Lexicon;
use super::{LexiconError, LoadReport};

impl Lexicon {
    /// Build from tab-separated text.
    ///
    /// One entry per line: `spelling \t entryCount \t (tag \t lemma \t count)+`.
    /// Spellings, tags and lemmas are taken verbatim, so whatever `to_text`
    /// writes loads back unchanged. Blank lines are ignored; malformed lines
    /// are skipped and counted.
    pub fn from_text(text: &str) -> (Self, LoadReport) {
        let mut lexicon = Lexicon::new();
        let mut report = LoadReport::default();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.trim().is_empty() {
                continue;
            }
            match parse_entry_line(line) {
                Ok((spelling, entry)) => {
                    lexicon.merge_entry(spelling, entry);
                    report.loaded += 1;
                }
                Err(reason) => {
                    warn!(line = lineno + 1, %reason, "skipping malformed lexicon line");
                    report.skipped += 1;
                }
            }
        }
        (lexicon, report)
    }

    /// Serialize to the tab-separated text format, sorted by spelling.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for spelling in self.spellings() {
            let Some(entry) = self.entry(spelling) else {
                continue;
            };
            let _ = write!(out, "{spelling}\t{}", entry.count);
            for (tag, cat) in &entry.categories {
                let _ = write!(out, "\t{tag}\t{}\t{}", cat.lemma, cat.count);
            }
            out.push('\n');
        }
        out
    }

    pub fn load(path: &Path) -> Result<(Self, LoadReport), LexiconError> {
        let _span = debug_span!("lexicon_load", path = %path.display()).entered();
        let text = fs::read_to_string(path)?;
        Ok(Self::from_text(&text))
    }

    /// Atomic write: write to .tmp then rename.
    pub fn save(&self, path: &Path) -> Result<(), LexiconError> {
        write_atomic(path, self.to_text().as_bytes())
    }
}

pub(super) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), LexiconError> {
    let tmp = path.with_extension("tmp");
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn parse_entry_line(line: &str) -> Result<(&str, LexiconEntry), String> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 5 || (fields.len() - 2) % 3 != 0 {
        return Err(format!(
            "expected spelling, count and (tag, lemma, count) triples, got {} fields",
            fields.len()
        ));
    }
    let spelling = fields[0];
    if spelling.is_empty() {
        return Err("empty spelling".to_string());
    }
    let count: u64 = fields[1]
        .trim()
        .parse()
        .map_err(|e| format!("entry count '{}': {e}", fields[1]))?;

    let mut entry = LexiconEntry {
        count,
        ..Default::default()
    };
    for triple in fields[2..].chunks_exact(3) {
        let tag = triple[0];
        if tag.is_empty() {
            return Err("empty tag".to_string());
        }
        let cat_count: u64 = triple[2]
            .trim()
            .parse()
            .map_err(|e| format!("count for '{tag}': {e}"))?;
        let cat = entry
            .categories
            .entry(tag.to_string())
            .or_insert_with(CategoryCount::default);
        cat.count += cat_count;
        if cat.lemma.is_empty() {
            cat.lemma = triple[1].to_string();
        }
    }
    Ok((spelling, entry))
}
