//! Set similarity over shingles.
//!
//! `containment(actual, reference)` tolerates a partial photograph,
//! `containment(reference, actual)` penalizes missing sections and
//! `jaccard` is the symmetric, noise-sensitive score. They are always
//! reported together.

use serde::{Deserialize, Serialize};

use crate::shingle::ShingleSet;

/// Fraction of `a` also present in `b`. Zero when `a` is empty.
pub fn containment(a: &ShingleSet, b: &ShingleSet) -> f64 {
    if a.is_empty() {
        return 0.0;
    }
    a.intersection_len(b) as f64 / a.len() as f64
}

/// |A ∩ B| / |A ∪ B|. Two empty sets are identical (1.0).
pub fn jaccard(a: &ShingleSet, b: &ShingleSet) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let inter = a.intersection_len(b);
    let union = a.len() + b.len() - inter;
    if union == 0 {
        return 0.0;
    }
    inter as f64 / union as f64
}

/// The three scores of one actual/reference pair, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Similarity {
    /// containment(actual → reference)
    pub actual_in_reference: f64,
    /// containment(reference → actual)
    pub reference_in_actual: f64,
    pub jaccard: f64,
}

impl Similarity {
    pub fn between(actual: &ShingleSet, reference: &ShingleSet) -> Self {
        Self {
            actual_in_reference: containment(actual, reference),
            reference_in_actual: containment(reference, actual),
            jaccard: jaccard(actual, reference),
        }
    }
}
