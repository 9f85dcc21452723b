//! One-shot comparison of a cleaned capture against the reference text.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::clean::{clean, normalize_line_endings};
use crate::config::CompareConfig;
use crate::error::Result;
use crate::normalize::normalize;
use crate::risk::{RiskFinding, RiskRule, scan_risk_findings};
use crate::shingle::{ShingleSet, shingle_normalized};
use crate::similarity::Similarity;
use crate::template::{TemplateProfile, TemplateVariant, detect, missing_anchors, profile_for};

/// Everything learned from one capture. Built once, never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub variant: TemplateVariant,
    pub anchor_hits: BTreeMap<TemplateVariant, usize>,
    /// Reference-profile anchors absent from the capture
    pub missing_reference_anchors: Vec<String>,
    /// Detected-profile anchors absent from the capture
    pub missing_detected_anchors: Vec<String>,
    pub risks: Vec<String>,
    pub risk_findings: Vec<RiskFinding>,
    /// `None` when no reference text was available.
    pub similarity: Option<Similarity>,
    /// Length of the cleaned capture in characters
    pub cleaned_len: usize,
    /// Number of raw inputs (images) behind the capture
    pub item_count: usize,
    /// ISO 639-3 code of the capture's language, when detectable
    pub language: Option<String>,
}

/// Validated configuration with compiled rules.
#[derive(Debug, Clone)]
pub struct Comparator {
    shingle_width: usize,
    reference_variant: TemplateVariant,
    profiles: Vec<TemplateProfile>,
    rules: Vec<RiskRule>,
    risk_context_chars: usize,
    diff_preview_chars: usize,
}

impl Default for Comparator {
    fn default() -> Self {
        let config = CompareConfig::default();
        Self {
            shingle_width: config.shingle_width,
            reference_variant: config.reference_variant,
            profiles: config.profiles,
            rules: crate::risk::DEFAULT_RISK_RULES.clone(),
            risk_context_chars: config.risk_context_chars,
            diff_preview_chars: config.diff_preview_chars,
        }
    }
}

impl Comparator {
    pub fn new(config: &CompareConfig) -> Result<Self> {
        config.validate()?;
        let rules = config
            .risk_rules
            .iter()
            .map(|rule| rule.compile())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            shingle_width: config.shingle_width,
            reference_variant: config.reference_variant,
            profiles: config.profiles.clone(),
            rules,
            risk_context_chars: config.risk_context_chars,
            diff_preview_chars: config.diff_preview_chars,
        })
    }

    pub fn profiles(&self) -> &[TemplateProfile] {
        &self.profiles
    }

    pub fn rules(&self) -> &[RiskRule] {
        &self.rules
    }

    pub fn shingle_width(&self) -> usize {
        self.shingle_width
    }

    pub fn diff_preview_chars(&self) -> usize {
        self.diff_preview_chars
    }

    /// Shingles of a reference text. Only line endings are touched before
    /// normalization.
    pub fn reference_shingles(&self, reference: &str) -> ShingleSet {
        let reference = normalize_line_endings(reference);
        shingle_normalized(&normalize(&reference), self.shingle_width)
    }

    /// Compare an already-cleaned capture against `reference`.
    pub fn compare(&self, cleaned: &str, reference: &str, item_count: usize) -> ComparisonResult {
        let reference = self.reference_shingles(reference);
        self.compare_with_shingles(cleaned, Some(&reference), item_count)
    }

    /// Structure and risk checks only, for when the reference is unavailable.
    pub fn compare_without_reference(&self, cleaned: &str, item_count: usize) -> ComparisonResult {
        self.compare_with_shingles(cleaned, None, item_count)
    }

    /// Clean `raw` first, then compare.
    pub fn compare_raw(&self, raw: &str, reference: &str, item_count: usize) -> ComparisonResult {
        self.compare(&clean(raw), reference, item_count)
    }

    /// Compare many independent raw captures against one reference, in
    /// parallel. Results keep the input order; each capture counts as one item.
    pub fn compare_batch<S: AsRef<str> + Sync>(&self, raws: &[S], reference: &str) -> Vec<ComparisonResult> {
        let reference = self.reference_shingles(reference);
        let results: Vec<ComparisonResult> = raws
            .par_iter()
            .map(|raw| self.compare_with_shingles(&clean(raw.as_ref()), Some(&reference), 1))
            .collect();
        info!(captures = results.len(), "batch comparison complete");
        results
    }

    /// Compare a cleaned capture against precomputed reference shingles.
    pub fn compare_with_shingles(
        &self,
        cleaned: &str,
        reference: Option<&ShingleSet>,
        item_count: usize,
    ) -> ComparisonResult {
        let detection = detect(cleaned, &self.profiles);

        let reference_anchors = self.anchors_for(self.reference_variant);
        let detected_anchors = match detection.variant {
            TemplateVariant::Unknown => reference_anchors,
            variant => self.anchors_for(variant),
        };
        let missing_reference_anchors = missing_anchors(cleaned, reference_anchors);
        let missing_detected_anchors = missing_anchors(cleaned, detected_anchors);

        let risk_findings = scan_risk_findings(cleaned, &self.rules, self.risk_context_chars);
        let risks = risk_findings.iter().map(|f| f.label.clone()).collect();

        let similarity = reference.map(|reference| {
            let actual = shingle_normalized(&normalize(cleaned), self.shingle_width);
            Similarity::between(&actual, reference)
        });

        let language = whatlang::detect(cleaned).map(|info| info.lang().code().to_string());

        let result = ComparisonResult {
            variant: detection.variant,
            anchor_hits: detection.hits,
            missing_reference_anchors,
            missing_detected_anchors,
            risks,
            risk_findings,
            similarity,
            cleaned_len: cleaned.chars().count(),
            item_count,
            language,
        };
        debug!(
            variant = result.variant.as_str(),
            missing = result.missing_detected_anchors.len(),
            risks = result.risks.len(),
            similarity = ?result.similarity,
            "comparison complete"
        );
        result
    }

    fn anchors_for(&self, variant: TemplateVariant) -> &[String] {
        profile_for(&self.profiles, variant)
            .map(|p| p.anchors.as_slice())
            .unwrap_or(&[])
    }
}
