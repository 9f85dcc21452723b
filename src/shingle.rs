//! Character k-shingles over normalized text.

use std::collections::HashSet;

use crate::normalize::normalize;

/// Default shingle width in characters.
pub const DEFAULT_SHINGLE_WIDTH: usize = 3;

/// Set of distinct k-character windows of a normalized text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShingleSet {
    shingles: HashSet<String>,
}

impl ShingleSet {
    pub fn len(&self) -> usize {
        self.shingles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shingles.is_empty()
    }

    pub fn contains(&self, shingle: &str) -> bool {
        self.shingles.contains(shingle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.shingles.iter().map(String::as_str)
    }

    /// Size of the intersection, iterating over the smaller side.
    pub fn intersection_len(&self, other: &ShingleSet) -> usize {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.iter().filter(|s| large.contains(s)).count()
    }
}

impl FromIterator<String> for ShingleSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self {
            shingles: iter.into_iter().collect(),
        }
    }
}

/// Shingle `text` with window width `k`.
///
/// The text is normalized first. Anything shorter than `k` characters, and
/// any `k` of zero, gives an empty set.
pub fn shingle(text: &str, k: usize) -> ShingleSet {
    let normalized = normalize(text);
    shingle_normalized(&normalized, k)
}

pub(crate) fn shingle_normalized(normalized: &str, k: usize) -> ShingleSet {
    if k == 0 {
        return ShingleSet::default();
    }
    let chars: Vec<char> = normalized.chars().collect();
    if chars.len() < k {
        return ShingleSet::default();
    }
    chars.windows(k).map(|w| w.iter().collect::<String>()).collect()
}
