//! Template classification and structural completeness via anchor phrases.
//!
//! Each lease layout is a [`TemplateProfile`]: anchors in document order, a
//! hit threshold and optional title hints. Detection and the missing-anchor
//! check run over whatever profiles are configured, so a new layout is a
//! table entry rather than a new code path.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::normalize::{contains_normalized, normalize};

/// Default minimum anchor hits for a profile to be chosen.
pub const DEFAULT_MIN_HITS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateVariant {
    /// 주택임대차표준계약서
    Standard,
    /// 아파트 전세 계약서 layout
    AptVariant,
    Unknown,
}

impl TemplateVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateVariant::Standard => "standard",
            TemplateVariant::AptVariant => "apt_variant",
            TemplateVariant::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateProfile {
    pub variant: TemplateVariant,
    /// Anchor phrases in document order.
    pub anchors: Vec<String>,
    #[serde(default = "default_min_hits")]
    pub min_hits: usize,
    /// Title phrases that select this profile on their own.
    #[serde(default)]
    pub title_hints: Vec<String>,
}

fn default_min_hits() -> usize {
    DEFAULT_MIN_HITS
}

impl TemplateProfile {
    pub fn new<S: Into<String>>(variant: TemplateVariant, anchors: impl IntoIterator<Item = S>) -> Self {
        Self {
            variant,
            anchors: anchors.into_iter().map(Into::into).collect(),
            min_hits: DEFAULT_MIN_HITS,
            title_hints: Vec::new(),
        }
    }

    pub fn with_min_hits(mut self, min_hits: usize) -> Self {
        self.min_hits = min_hits;
        self
    }

    pub fn with_title_hints<S: Into<String>>(mut self, hints: impl IntoIterator<Item = S>) -> Self {
        self.title_hints = hints.into_iter().map(Into::into).collect();
        self
    }
}

lazy_static! {
    /// Built-in lease layouts, in classification priority order.
    pub static ref DEFAULT_PROFILES: Vec<TemplateProfile> = vec![
        TemplateProfile::new(
            TemplateVariant::Standard,
            ["임차주택의 표시", "계약내용", "특약사항", "제1조", "제2조", "제3조"],
        ),
        TemplateProfile::new(
            TemplateVariant::AptVariant,
            ["아파트의 표시", "계약내용", "특약사항", "제1조", "제2조", "제3조"],
        )
        // Known discrepancy: the title check has always compared this same
        // phrase twice. A second apartment title belongs in `title_hints`
        // config once confirmed; none is guessed here.
        .with_title_hints(["아파트전세계약서"]),
    ];
}

/// Classification outcome with the hit count of every profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub variant: TemplateVariant,
    pub hits: BTreeMap<TemplateVariant, usize>,
}

/// Number of `anchors` present in `text`, each counted once.
pub fn count_anchor_hits<S: AsRef<str>>(text: &str, anchors: &[S]) -> usize {
    let normalized = normalize(text);
    count_hits_normalized(&normalized, anchors)
}

fn count_hits_normalized<S: AsRef<str>>(normalized: &str, anchors: &[S]) -> usize {
    anchors
        .iter()
        .filter(|a| contains_normalized(normalized, a.as_ref()))
        .count()
}

/// Classify `text` against `profiles`, taken in priority order.
///
/// A profile wins when it reaches its threshold and no later profile has
/// more hits, or when one of its title hints appears. Nothing winning means
/// [`TemplateVariant::Unknown`].
pub fn detect(text: &str, profiles: &[TemplateProfile]) -> Detection {
    let normalized = normalize(text);
    let counts: Vec<usize> = profiles
        .iter()
        .map(|p| count_hits_normalized(&normalized, &p.anchors))
        .collect();

    let mut variant = TemplateVariant::Unknown;
    for (i, profile) in profiles.iter().enumerate() {
        let best_later = counts[i + 1..].iter().copied().max().unwrap_or(0);
        let by_anchors = counts[i] >= profile.min_hits && counts[i] >= best_later;
        let by_title = profile
            .title_hints
            .iter()
            .any(|hint| contains_normalized(&normalized, hint));
        if by_anchors || by_title {
            variant = profile.variant;
            break;
        }
    }

    let mut hits = BTreeMap::new();
    for (profile, count) in profiles.iter().zip(counts) {
        hits.insert(profile.variant, count);
    }
    tracing::debug!(variant = variant.as_str(), ?hits, "template detected");
    Detection { variant, hits }
}

/// Anchors absent from `text`, in their original order.
pub fn missing_anchors<S: AsRef<str>>(text: &str, anchors: &[S]) -> Vec<String> {
    let normalized = normalize(text);
    anchors
        .iter()
        .map(|a| a.as_ref())
        .filter(|a| !contains_normalized(&normalized, a))
        .map(|a| a.to_string())
        .collect()
}

/// Profile for `variant`, if configured.
pub fn profile_for(profiles: &[TemplateProfile], variant: TemplateVariant) -> Option<&TemplateProfile> {
    profiles.iter().find(|p| p.variant == variant)
}
