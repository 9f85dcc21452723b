//! Labeled risk-phrase scanning.
//!
//! Rules match the cleaned text as-is (case-sensitive, not normalized), so
//! patterns carry their own `\s*` where spacing varies. A rule either fires
//! or it doesn't; repeat matches don't change the outcome.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CompareError, Result};

/// Built-in rule table as (label, pattern) pairs.
pub const DEFAULT_RISK_PATTERNS: &[(&str, &str)] = &[
    ("면책/책임제한", r"(면책|책임\s*없|일체\s*책임|책임\s*제한)"),
    (
        "일방 해지/해제",
        r"(일방적(으로)?\s*(해지|해제)|임의\s*(해지|해제)|즉시\s*(해지|해제))",
    ),
    (
        "과도한 위약금/배상",
        r"(위약금|손해배상|배상금).{0,30}(전액|2배|배액|3배|삼배)",
    ),
    (
        "권리 포기 강요",
        r"(포기한다|권리를\s*포기|이의\s*제기\s*하지\s*않)",
    ),
    (
        "전속관할",
        r"(전속\s*관할|합의\s*관할|(임대인|갑)의?\s*(주소지|소재지)\s*(관할\s*)?법원)",
    ),
    (
        "중개사 책임 전면 부인",
        r"중개.{0,40}책임\s*(을|이|도)?\s*(지지\s*않|없|부담하지\s*않)",
    ),
];

lazy_static! {
    pub static ref DEFAULT_RISK_RULES: Vec<RiskRule> = DEFAULT_RISK_PATTERNS
        .iter()
        .map(|(label, pattern)| RiskRule::new(*label, pattern).unwrap())
        .collect();
}

/// Serializable form of a rule, compiled with [`RiskRuleConfig::compile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskRuleConfig {
    pub label: String,
    pub pattern: String,
}

impl RiskRuleConfig {
    pub fn compile(&self) -> Result<RiskRule> {
        RiskRule::new(self.label.clone(), &self.pattern)
    }
}

/// Default rule table in serializable form.
pub fn default_rule_configs() -> Vec<RiskRuleConfig> {
    DEFAULT_RISK_PATTERNS
        .iter()
        .map(|(label, pattern)| RiskRuleConfig {
            label: label.to_string(),
            pattern: pattern.to_string(),
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct RiskRule {
    pub label: String,
    pub pattern: Regex,
}

impl RiskRule {
    pub fn new(label: impl Into<String>, pattern: &str) -> Result<Self> {
        let label = label.into();
        let pattern = Regex::new(pattern).map_err(|source| CompareError::InvalidPattern {
            label: label.clone(),
            source,
        })?;
        Ok(Self { label, pattern })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// First passage that triggered a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFinding {
    pub label: String,
    pub matched: String,
    /// Match with surrounding context, whitespace collapsed
    pub excerpt: String,
}

/// Labels of every rule that matches `text`, once each, in table order.
pub fn scan_risks(text: &str, rules: &[RiskRule]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for rule in rules {
        if labels.iter().any(|l| *l == rule.label) {
            continue;
        }
        if rule.is_match(text) {
            labels.push(rule.label.clone());
        }
    }
    labels
}

/// Like [`scan_risks`], with the first match of each label and
/// `context_chars` characters of context on either side.
pub fn scan_risk_findings(text: &str, rules: &[RiskRule], context_chars: usize) -> Vec<RiskFinding> {
    let mut findings: Vec<RiskFinding> = Vec::new();
    for rule in rules {
        if findings.iter().any(|f| f.label == rule.label) {
            continue;
        }
        if let Some(m) = rule.pattern.find(text) {
            findings.push(RiskFinding {
                label: rule.label.clone(),
                matched: m.as_str().to_string(),
                excerpt: extract_context(text, m.start(), m.end(), context_chars),
            });
        }
    }
    findings
}

/// Extract context around a byte range (UTF-8 safe, counted in characters)
fn extract_context(text: &str, start: usize, end: usize, context_chars: usize) -> String {
    let ctx_start = text[..start]
        .char_indices()
        .rev()
        .take(context_chars)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(start);
    let ctx_end = text[end..]
        .char_indices()
        .nth(context_chars)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());

    let mut context = String::new();
    if ctx_start > 0 {
        context.push_str("...");
    }
    context.push_str(&text[ctx_start..ctx_end]);
    if ctx_end < text.len() {
        context.push_str("...");
    }

    context.split_whitespace().collect::<Vec<_>>().join(" ")
}
