//! Comparison configuration.
//!
//! Every table the engine consults (profiles, title hints, risk rules) and
//! every tunable (shingle width, thresholds, diff preview size) lives here
//! as data. All fields default to the built-in lease tables, so a JSON file
//! only needs the keys it overrides:
//!
//! ```json
//! {
//!   "shingle_width": 4,
//!   "risk_rules": [{ "label": "보증금 미반환", "pattern": "보증금.{0,20}반환하지\\s*않" }]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CompareError, Result};
use crate::risk::{RiskRuleConfig, default_rule_configs};
use crate::shingle::DEFAULT_SHINGLE_WIDTH;
use crate::template::{DEFAULT_PROFILES, TemplateProfile, TemplateVariant};

/// Characters of each text handed to a diff view.
pub const DEFAULT_DIFF_PREVIEW_CHARS: usize = 6000;

/// Characters of context kept around each risk match.
pub const DEFAULT_RISK_CONTEXT_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    pub shingle_width: usize,
    /// Profile describing the reference text.
    pub reference_variant: TemplateVariant,
    /// Layouts in classification priority order.
    pub profiles: Vec<TemplateProfile>,
    pub risk_rules: Vec<RiskRuleConfig>,
    pub risk_context_chars: usize,
    pub diff_preview_chars: usize,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            shingle_width: DEFAULT_SHINGLE_WIDTH,
            reference_variant: TemplateVariant::Standard,
            profiles: DEFAULT_PROFILES.clone(),
            risk_rules: default_rule_configs(),
            risk_context_chars: DEFAULT_RISK_CONTEXT_CHARS,
            diff_preview_chars: DEFAULT_DIFF_PREVIEW_CHARS,
        }
    }
}

impl CompareConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| CompareError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.shingle_width == 0 {
            return Err(CompareError::InvalidConfig(
                "shingle_width must be at least 1".into(),
            ));
        }
        if self.reference_variant == TemplateVariant::Unknown {
            return Err(CompareError::InvalidConfig(
                "reference_variant cannot be unknown".into(),
            ));
        }
        for (i, profile) in self.profiles.iter().enumerate() {
            if profile.variant == TemplateVariant::Unknown {
                return Err(CompareError::InvalidConfig(format!(
                    "profile {i} uses the reserved variant 'unknown'"
                )));
            }
            if self.profiles[..i].iter().any(|p| p.variant == profile.variant) {
                return Err(CompareError::InvalidConfig(format!(
                    "duplicate profile for variant '{}'",
                    profile.variant.as_str()
                )));
            }
        }
        if !self.profiles.iter().any(|p| p.variant == self.reference_variant) {
            return Err(CompareError::InvalidConfig(format!(
                "no profile for reference variant '{}'",
                self.reference_variant.as_str()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        let config = CompareConfig::default();
        config.validate().unwrap();
        assert_eq!(config.shingle_width, 3);
        assert_eq!(config.diff_preview_chars, 6000);
        assert_eq!(config.profiles.len(), 2);
        assert_eq!(config.profiles[0].min_hits, 4);
        assert_eq!(config.risk_rules.len(), 6);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = CompareConfig::from_json(r#"{ "shingle_width": 4 }"#).unwrap();
        assert_eq!(config.shingle_width, 4);
        assert_eq!(config.profiles, CompareConfig::default().profiles);
    }

    #[test]
    fn test_profile_json() {
        let json = r#"{
            "profiles": [
                { "variant": "standard", "anchors": ["제1조", "제2조"], "min_hits": 2 },
                { "variant": "apt_variant", "anchors": ["아파트의 표시"],
                  "title_hints": ["아파트전세계약서", "아파트 임대차 계약서"] }
            ]
        }"#;
        let config = CompareConfig::from_json(json).unwrap();
        assert_eq!(config.profiles[0].min_hits, 2);
        assert_eq!(config.profiles[1].min_hits, 4);
        assert_eq!(config.profiles[1].title_hints.len(), 2);
    }

    #[test]
    fn test_rejects_zero_width() {
        let err = CompareConfig::from_json(r#"{ "shingle_width": 0 }"#).unwrap_err();
        assert!(matches!(err, CompareError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_missing_reference_profile() {
        let json = r#"{ "profiles": [{ "variant": "apt_variant", "anchors": [] }] }"#;
        let err = CompareConfig::from_json(json).unwrap_err();
        assert!(matches!(err, CompareError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_unknown_and_duplicate_profiles() {
        let unknown = r#"{ "profiles": [
            { "variant": "standard", "anchors": [] },
            { "variant": "unknown", "anchors": [] }
        ] }"#;
        assert!(CompareConfig::from_json(unknown).is_err());

        let dup = r#"{ "profiles": [
            { "variant": "standard", "anchors": [] },
            { "variant": "standard", "anchors": [] }
        ] }"#;
        assert!(CompareConfig::from_json(dup).is_err());
    }

    #[test]
    fn test_bad_json() {
        let err = CompareConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, CompareError::Json(_)));
    }

    #[test]
    fn test_from_path_and_roundtrip() {
        let config = CompareConfig {
            diff_preview_chars: 100,
            ..Default::default()
        };
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_json().unwrap().as_bytes()).unwrap();
        let loaded = CompareConfig::from_path(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_from_missing_path() {
        let err = CompareConfig::from_path(Path::new("/nonexistent/lease.json")).unwrap_err();
        assert!(matches!(err, CompareError::ConfigRead { .. }));
    }
}
