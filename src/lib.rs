//! Lease-contract verification over OCR text.
//!
//! Cleans recognized text, scores it against a reference contract with
//! character-shingle similarity, classifies the template layout by anchor
//! phrases, lists missing sections and flags risky clauses.
//!
//! ```
//! use rust_lease_compare::{Comparator, TemplateVariant, clean};
//!
//! let reference = "1. 임차주택의 표시\n2. 계약내용\n제1조\n제2조\n제3조\n특약사항";
//! let raw = "1. 임차주택의 표시\n2. 계 약 내 용\n제1조\n제2조\n특약사항\n위약금은 전액 배상한다";
//!
//! let result = Comparator::default().compare(&clean(raw), reference, 1);
//! assert_eq!(result.variant, TemplateVariant::Standard);
//! assert_eq!(result.missing_detected_anchors, vec!["제3조"]);
//! assert_eq!(result.risks, vec!["과도한 위약금/배상"]);
//! ```

pub mod clean;
pub mod compare;
pub mod config;
mod error;
pub mod normalize;
pub mod risk;
pub mod shingle;
pub mod similarity;
pub mod template;
pub mod workflow;

#[cfg(feature = "python")]
mod python;

pub use clean::{CleanStats, clean, clean_with_stats};
pub use compare::{Comparator, ComparisonResult};
pub use config::CompareConfig;
pub use error::{CompareError, Result};
pub use normalize::normalize;
pub use risk::{RiskFinding, RiskRule, RiskRuleConfig, scan_risk_findings, scan_risks};
pub use shingle::{ShingleSet, shingle};
pub use similarity::{Similarity, containment, jaccard};
pub use template::{Detection, TemplateProfile, TemplateVariant, detect, missing_anchors};
pub use workflow::{
    Capture, DiffPreview, DiffRenderer, FileReference, ReferenceSource, Report, TextRecognizer,
    accumulate, verify,
};
