//! Python bindings (feature `python`).

use std::collections::{HashMap, HashSet};
use std::fs;

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;

use crate::config::CompareConfig;
use crate::error::CompareError;
use crate::risk::DEFAULT_RISK_RULES;
use crate::shingle::ShingleSet;
use crate::template::DEFAULT_PROFILES;
use crate::{Comparator, ComparisonResult};

fn to_py_err(err: CompareError) -> PyErr {
    match err {
        CompareError::ReferenceLoad { .. } | CompareError::ConfigRead { .. } => {
            PyIOError::new_err(err.to_string())
        }
        other => PyValueError::new_err(other.to_string()),
    }
}

fn comparator_from(config_json: Option<String>) -> PyResult<Comparator> {
    match config_json {
        Some(json) => {
            let config = CompareConfig::from_json(&json).map_err(to_py_err)?;
            Comparator::new(&config).map_err(to_py_err)
        }
        None => Ok(Comparator::default()),
    }
}

fn to_json(result: &ComparisonResult) -> PyResult<String> {
    serde_json::to_string(result).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Clean OCR artifacts. Returns: (cleaned_text, lines_or_runs_changed)
#[pyfunction]
fn clean_text(text: String) -> PyResult<(String, u64)> {
    let (cleaned, stats) = crate::clean::clean_with_stats(&text);
    Ok((
        cleaned,
        stats.collapsed_runs + stats.noise_lines + stats.duplicate_lines,
    ))
}

#[pyfunction]
fn normalize_text(text: String) -> String {
    crate::normalize(&text)
}

#[pyfunction]
#[pyo3(signature = (text, k=3))]
fn shingle_text(text: String, k: usize) -> HashSet<String> {
    crate::shingle(&text, k).iter().map(str::to_string).collect()
}

#[pyfunction]
fn jaccard(a: HashSet<String>, b: HashSet<String>) -> f64 {
    let (a, b): (ShingleSet, ShingleSet) = (a.into_iter().collect(), b.into_iter().collect());
    crate::jaccard(&a, &b)
}

#[pyfunction]
fn containment(a: HashSet<String>, b: HashSet<String>) -> f64 {
    let (a, b): (ShingleSet, ShingleSet) = (a.into_iter().collect(), b.into_iter().collect());
    crate::containment(&a, &b)
}

/// Classify against the built-in profiles.
/// Returns: (variant, {variant: anchor_hits})
#[pyfunction]
fn detect_template(text: String) -> (String, HashMap<String, usize>) {
    let detection = crate::detect(&text, &DEFAULT_PROFILES);
    let hits = detection
        .hits
        .iter()
        .map(|(variant, count)| (variant.as_str().to_string(), *count))
        .collect();
    (detection.variant.as_str().to_string(), hits)
}

#[pyfunction]
fn find_missing_anchors(text: String, anchors: Vec<String>) -> Vec<String> {
    crate::missing_anchors(&text, &anchors)
}

/// Risk labels found by the built-in rule table, in table order
#[pyfunction]
fn scan_risk_labels(text: String) -> Vec<String> {
    crate::scan_risks(&text, &DEFAULT_RISK_RULES)
}

/// Compare cleaned text against a reference. Returns the result as JSON.
#[pyfunction]
#[pyo3(signature = (cleaned, reference, item_count=1, config_json=None))]
fn compare_texts(
    cleaned: String,
    reference: String,
    item_count: usize,
    config_json: Option<String>,
) -> PyResult<String> {
    let comparator = comparator_from(config_json)?;
    to_json(&comparator.compare(&cleaned, &reference, item_count))
}

/// Clean a raw OCR dump and compare it with a reference file, reading both
/// in Rust. Returns the result as JSON.
#[pyfunction]
#[pyo3(signature = (raw_path, reference_path, config_json=None))]
fn compare_files(
    raw_path: String,
    reference_path: String,
    config_json: Option<String>,
) -> PyResult<String> {
    let raw = fs::read_to_string(&raw_path)
        .map_err(|e| PyIOError::new_err(format!("Failed to read {}: {}", raw_path, e)))?;
    let reference = fs::read_to_string(&reference_path)
        .map_err(|e| PyIOError::new_err(format!("Failed to read {}: {}", reference_path, e)))?;

    let comparator = comparator_from(config_json)?;
    to_json(&comparator.compare_raw(&raw, &reference, 1))
}

/// Compare many raw captures against one reference in parallel.
/// Returns: one JSON result per capture, in input order
#[pyfunction]
#[pyo3(signature = (raws, reference, config_json=None))]
fn compare_batch(
    raws: Vec<String>,
    reference: String,
    config_json: Option<String>,
) -> PyResult<Vec<String>> {
    let comparator = comparator_from(config_json)?;
    comparator
        .compare_batch(&raws, &reference)
        .iter()
        .map(to_json)
        .collect()
}

/// Built-in configuration as JSON, as a starting point for overrides
#[pyfunction]
fn default_config_json() -> PyResult<String> {
    CompareConfig::default().to_json().map_err(to_py_err)
}

#[pymodule]
fn rust_lease_compare(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(clean_text, m)?)?;
    m.add_function(wrap_pyfunction!(normalize_text, m)?)?;
    m.add_function(wrap_pyfunction!(shingle_text, m)?)?;
    m.add_function(wrap_pyfunction!(jaccard, m)?)?;
    m.add_function(wrap_pyfunction!(containment, m)?)?;
    m.add_function(wrap_pyfunction!(detect_template, m)?)?;
    m.add_function(wrap_pyfunction!(find_missing_anchors, m)?)?;
    m.add_function(wrap_pyfunction!(scan_risk_labels, m)?)?;
    m.add_function(wrap_pyfunction!(compare_texts, m)?)?;
    m.add_function(wrap_pyfunction!(compare_files, m)?)?;
    m.add_function(wrap_pyfunction!(compare_batch, m)?)?;
    m.add_function(wrap_pyfunction!(default_config_json, m)?)?;
    Ok(())
}
