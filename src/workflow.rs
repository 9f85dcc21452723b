//! Glue between the comparison engine and its collaborators: the OCR
//! engine, the reference-text loader and the diff view.
//!
//! Collaborator failures never abort a run. They are collected into
//! [`Report::issues`] and whatever could still be computed is returned.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::clean::clean_with_stats;
use crate::compare::{Comparator, ComparisonResult};
use crate::error::{CompareError, Result};

/// Inserted between the texts of consecutive images.
pub const PAGE_BOUNDARY: &str = "\n\n";

/// OCR engine, called once per image.
pub trait TextRecognizer<I: ?Sized> {
    fn recognize(&self, image: &I) -> Result<String>;
}

impl<I: ?Sized, F> TextRecognizer<I> for F
where
    F: Fn(&I) -> Result<String>,
{
    fn recognize(&self, image: &I) -> Result<String> {
        self(image)
    }
}

/// Supplier of the reference contract text.
pub trait ReferenceSource {
    fn load(&self) -> Result<String>;
}

impl ReferenceSource for str {
    fn load(&self) -> Result<String> {
        Ok(self.to_string())
    }
}

impl ReferenceSource for String {
    fn load(&self) -> Result<String> {
        Ok(self.clone())
    }
}

/// Reference text stored in a UTF-8 file.
#[derive(Debug, Clone)]
pub struct FileReference {
    path: PathBuf,
}

impl FileReference {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ReferenceSource for FileReference {
    fn load(&self) -> Result<String> {
        std::fs::read_to_string(&self.path).map_err(|source| CompareError::ReferenceLoad {
            path: self.path.clone(),
            source,
        })
    }
}

/// The two texts a diff view shows, cut to a bounded prefix.
///
/// Only used for rendering; scores always come from the full texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffPreview {
    pub actual: String,
    pub reference: String,
    pub truncated: bool,
}

impl DiffPreview {
    pub fn new(actual: &str, reference: &str, max_chars: usize) -> Self {
        let (actual, cut_actual) = truncate_chars(actual, max_chars);
        let (reference, cut_reference) = truncate_chars(reference, max_chars);
        Self {
            actual: actual.to_string(),
            reference: reference.to_string(),
            truncated: cut_actual || cut_reference,
        }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((i, _)) => (&text[..i], true),
        None => (text, false),
    }
}

/// Diff view. Failing to render is reported, not fatal.
pub trait DiffRenderer {
    fn render(&self, preview: &DiffPreview) -> Result<()>;
}

/// Raw text accumulated from a sequence of images.
#[derive(Debug, Default)]
pub struct Capture {
    pub raw_text: String,
    /// Images submitted
    pub item_count: usize,
    /// Images that produced text
    pub recognized: usize,
    pub failures: Vec<CompareError>,
}

/// Recognize each image in turn and join the texts with [`PAGE_BOUNDARY`].
///
/// Images are processed one after another; the combined text is meant to be
/// cleaned once so duplicate lines are caught across pages.
pub fn accumulate<I, R>(recognizer: &R, images: &[I]) -> Capture
where
    R: TextRecognizer<I> + ?Sized,
{
    let mut capture = Capture {
        item_count: images.len(),
        ..Default::default()
    };
    for (index, image) in images.iter().enumerate() {
        match recognizer.recognize(image) {
            Ok(text) => {
                if capture.recognized > 0 {
                    capture.raw_text.push_str(PAGE_BOUNDARY);
                }
                capture.raw_text.push_str(&text);
                capture.recognized += 1;
            }
            Err(err) => {
                let err = match err {
                    CompareError::Recognition { message, .. } => {
                        CompareError::Recognition { index, message }
                    }
                    other => other,
                };
                warn!(index, error = %err, "recognition failed, skipping image");
                capture.failures.push(err);
            }
        }
    }
    capture
}

/// Outcome of a full verification run.
#[derive(Debug)]
pub struct Report {
    pub result: ComparisonResult,
    pub cleaned_text: String,
    /// `None` when the reference was unavailable.
    pub diff: Option<DiffPreview>,
    /// Recoverable collaborator failures, in the order they happened
    pub issues: Vec<CompareError>,
}

/// Recognize, clean once, compare and hand a preview to the diff view.
pub fn verify<I, R, S>(
    comparator: &Comparator,
    recognizer: &R,
    images: &[I],
    reference: &S,
    renderer: Option<&dyn DiffRenderer>,
) -> Report
where
    R: TextRecognizer<I> + ?Sized,
    S: ReferenceSource + ?Sized,
{
    let capture = accumulate(recognizer, images);
    let mut issues = capture.failures;

    let (cleaned_text, stats) = clean_with_stats(&capture.raw_text);

    let (result, diff) = match reference.load() {
        Ok(reference) => {
            let result = comparator.compare(&cleaned_text, &reference, capture.item_count);
            let preview = DiffPreview::new(&cleaned_text, &reference, comparator.diff_preview_chars());
            if let Some(renderer) = renderer
                && let Err(err) = renderer.render(&preview)
            {
                warn!(error = %err, "diff view failed");
                issues.push(err);
            }
            (result, Some(preview))
        }
        Err(err) => {
            warn!(error = %err, "reference unavailable, skipping similarity");
            issues.push(err);
            let result = comparator.compare_without_reference(&cleaned_text, capture.item_count);
            (result, None)
        }
    };

    info!(
        images = capture.item_count,
        recognized = capture.recognized,
        collapsed_runs = stats.collapsed_runs,
        duplicate_lines = stats.duplicate_lines,
        issues = issues.len(),
        variant = result.variant.as_str(),
        "verification finished"
    );

    Report {
        result,
        cleaned_text,
        diff,
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateVariant;
    use std::cell::RefCell;
    use std::io::Write;

    fn pages(image: &&str) -> Result<String> {
        match *image {
            "page1.jpg" => Ok("1. 임차주택의 표시\n2. 계약내용\n제1조 (보증금과 차임)".to_string()),
            "page2.jpg" => Ok("2. 계약 내용\n제2조 (임대차기간)\n제3조 (입주 전 수리)\n특약사항".to_string()),
            "blank.jpg" => Ok(String::new()),
            other => Err(CompareError::Recognition {
                index: 0,
                message: format!("unreadable {other}"),
            }),
        }
    }

    struct FailingRenderer;

    impl DiffRenderer for FailingRenderer {
        fn render(&self, _preview: &DiffPreview) -> Result<()> {
            Err(CompareError::DiffUnavailable("diff library not loaded".into()))
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        seen: RefCell<Vec<DiffPreview>>,
    }

    impl DiffRenderer for RecordingRenderer {
        fn render(&self, preview: &DiffPreview) -> Result<()> {
            self.seen.borrow_mut().push(preview.clone());
            Ok(())
        }
    }

    #[test]
    fn test_accumulate_joins_in_order() {
        let capture = accumulate(&pages, &["page1.jpg", "page2.jpg"]);
        assert_eq!(capture.item_count, 2);
        assert_eq!(capture.recognized, 2);
        assert!(capture.failures.is_empty());
        let first = capture.raw_text.find("제1조").unwrap();
        let second = capture.raw_text.find("제2조").unwrap();
        assert!(first < second);
        assert!(capture.raw_text.contains("(보증금과 차임)\n\n2. 계약 내용"));
    }

    #[test]
    fn test_accumulate_skips_failures() {
        let capture = accumulate(&pages, &["page1.jpg", "torn.jpg", "blank.jpg"]);
        assert_eq!(capture.item_count, 3);
        assert_eq!(capture.recognized, 2);
        assert_eq!(capture.failures.len(), 1);
        assert!(matches!(capture.failures[0], CompareError::Recognition { index: 1, .. }));
    }

    #[test]
    fn test_verify_dedups_across_pages() {
        let comparator = Comparator::default();
        let renderer = RecordingRenderer::default();
        let reference = "1. 임차주택의 표시\n2. 계약내용\n제1조\n제2조\n제3조\n특약사항";
        let report = verify(
            &comparator,
            &pages,
            &["page1.jpg", "page2.jpg"],
            reference,
            Some(&renderer),
        );
        assert!(report.issues.is_empty());
        assert_eq!(report.cleaned_text.matches("계약").count(), 1);
        assert_eq!(report.result.variant, TemplateVariant::Standard);
        assert!(report.result.missing_detected_anchors.is_empty());
        assert_eq!(report.result.item_count, 2);
        assert!(report.result.similarity.is_some());
        assert_eq!(renderer.seen.borrow().len(), 1);
        assert_eq!(report.diff.as_ref().unwrap().actual, report.cleaned_text);
    }

    #[test]
    fn test_verify_survives_reference_failure() {
        let comparator = Comparator::default();
        let missing = FileReference::new("/nonexistent/standard.txt");
        let report = verify(&comparator, &pages, &["page1.jpg"], &missing, None);
        assert_eq!(report.issues.len(), 1);
        assert!(matches!(report.issues[0], CompareError::ReferenceLoad { .. }));
        assert!(report.result.similarity.is_none());
        assert!(report.diff.is_none());
        assert_eq!(report.result.missing_reference_anchors, vec!["특약사항", "제2조", "제3조"]);
    }

    #[test]
    fn test_verify_survives_renderer_failure() {
        let comparator = Comparator::default();
        let report = verify(
            &comparator,
            &pages,
            &["page1.jpg"],
            "제1조",
            Some(&FailingRenderer),
        );
        assert_eq!(report.issues.len(), 1);
        assert!(matches!(report.issues[0], CompareError::DiffUnavailable(_)));
        assert!(report.result.similarity.is_some());
        assert!(report.diff.is_some());
    }

    #[test]
    fn test_verify_with_no_images() {
        let comparator = Comparator::default();
        let none: [&str; 0] = [];
        let report = verify(&comparator, &pages, &none, "제1조 제2조", None);
        assert_eq!(report.cleaned_text, "");
        assert_eq!(report.result.item_count, 0);
        assert_eq!(report.result.similarity.unwrap().actual_in_reference, 0.0);
    }

    #[test]
    fn test_file_reference() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all("제1조\r\n제2조".as_bytes()).unwrap();
        let loaded = FileReference::new(file.path()).load().unwrap();
        assert_eq!(loaded, "제1조\r\n제2조");
    }

    #[test]
    fn test_diff_preview_truncates_by_chars() {
        let actual = "가".repeat(10);
        let preview = DiffPreview::new(&actual, "나나", 4);
        assert_eq!(preview.actual, "가가가가");
        assert_eq!(preview.reference, "나나");
        assert!(preview.truncated);

        let short = DiffPreview::new("가", "나", 4);
        assert!(!short.truncated);
    }
}
