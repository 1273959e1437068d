//! Numeric literal recognition for unknown-word guessing.

/// Cardinal number such as `42`, `-3.5`, `1,000,000` or `1990s`.
pub fn is_number(s: &str) -> bool {
    let body = s.strip_prefix(['-', '+']).unwrap_or(s);
    let body = body.strip_suffix('s').unwrap_or(body);
    let mut seen_digit = false;
    let mut prev_sep = true;
    for c in body.chars() {
        if c.is_ascii_digit() {
            seen_digit = true;
            prev_sep = false;
        } else if matches!(c, ',' | '.') {
            if prev_sep {
                return false;
            }
            prev_sep = true;
        } else {
            return false;
        }
    }
    seen_digit && !prev_sep
}

/// Ordinal such as `1st`, `22nd`, `103rd` or `4th`.
pub fn is_ordinal(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    let Some(split) = lower.find(|c: char| !c.is_ascii_digit()) else {
        return false;
    };
    let (digits, suffix) = lower.split_at(split);
    if digits.is_empty() {
        return false;
    }
    let tens = digits
        .len()
        .checked_sub(2)
        .and_then(|i| digits.as_bytes().get(i))
        .copied();
    let last = digits.as_bytes()[digits.len() - 1];
    let expected = match (tens, last) {
        (Some(b'1'), _) => "th",
        (_, b'1') => "st",
        (_, b'2') => "nd",
        (_, b'3') => "rd",
        _ => "th",
    };
    suffix == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_numbers() {
        assert!(is_number("42"));
        assert!(is_number("-3.5"));
        assert!(is_number("1,000,000"));
        assert!(is_number("1990s"));
        assert!(!is_number("1,,0"));
        assert!(!is_number("3."));
        assert!(!is_number("abc"));
        assert!(!is_number(""));
        assert!(!is_number("-"));
    }

    #[test]
    fn ordinals() {
        assert!(is_ordinal("1st"));
        assert!(is_ordinal("22nd"));
        assert!(is_ordinal("103rd"));
        assert!(is_ordinal("11th"));
        assert!(is_ordinal("12TH"));
        assert!(!is_ordinal("11st"));
        assert!(!is_ordinal("2st"));
        assert!(!is_ordinal("th"));
        assert!(!is_ordinal("42"));
    }
}
