//! Canonical form used for every substring and shingle comparison.
//!
//! Whitespace and anything outside the comparable alphabet (Hangul syllables,
//! ASCII letters, ASCII digits) is dropped and letters are lowercased, so
//! "제 1 조." and "제1조" compare equal.

use unicode_normalization::UnicodeNormalization;

const HANGUL_FIRST: char = '\u{AC00}';
const HANGUL_LAST: char = '\u{D7A3}';

/// True for characters that survive normalization.
pub fn is_comparable(c: char) -> bool {
    (HANGUL_FIRST..=HANGUL_LAST).contains(&c) || c.is_ascii_alphanumeric()
}

/// Normalize text for comparison.
///
/// Text is first composed to NFC so decomposed jamo from some OCR engines
/// become syllables rather than being filtered out. Idempotent.
pub fn normalize(text: &str) -> String {
    text.nfc()
        .filter(|c| is_comparable(*c))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// True when the normalized `needle` occurs in an already-normalized haystack.
pub(crate) fn contains_normalized(haystack: &str, needle: &str) -> bool {
    haystack.contains(normalize(needle).as_str())
}
