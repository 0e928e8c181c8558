//! Text folding applied to both queries and candidate fields before any
//! comparison.

use unicode_normalization::UnicodeNormalization;

/// The "Combining Diacritical Marks" block. Marks outside it (e.g. Indic
/// vowel signs) carry meaning and are kept.
const COMBINING_DIACRITICS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036f}';

/// Folds `text` for comparison: lowercase, canonical decomposition with
/// combining diacritics removed, internal whitespace collapsed to single
/// spaces, and leading/trailing whitespace trimmed.
///
/// `normalize(&normalize(s)) == normalize(s)` for every `s`.
#[must_use]
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !COMBINING_DIACRITICS.contains(c))
        .collect();

    let mut out = String::with_capacity(folded.len());
    for word in folded.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Splits an already-normalized query into its whitespace-separated tokens.
pub fn tokenize(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split_whitespace()
}
