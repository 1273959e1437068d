//! Character and spelling classification used by the guesser and retaggers.

/// Punctuation or symbol character (anything that is neither alphanumeric nor whitespace).
pub fn is_punctuation_or_symbol_char(c: char) -> bool {
    !c.is_alphanumeric() && !c.is_whitespace()
}

/// Non-empty spelling made entirely of punctuation or symbol characters.
pub fn is_punctuation_or_symbol(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_punctuation_or_symbol_char)
}

pub fn has_letter(s: &str) -> bool {
    s.chars().any(char::is_alphabetic)
}

pub fn has_capital(s: &str) -> bool {
    s.chars().any(char::is_uppercase)
}

/// First letter is uppercase. Leading non-letters (quotes, digits) are skipped.
pub fn is_capitalized(s: &str) -> bool {
    s.chars()
        .find(|c| c.is_alphabetic())
        .is_some_and(char::is_uppercase)
}

/// Every letter is uppercase and there is at least one letter.
pub fn is_all_uppercase(s: &str) -> bool {
    has_letter(s) && s.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase)
}

/// Uppercase the first character and lowercase the rest ("NASA" -> "Nasa").
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
