//! OCR artifact cleanup.
//!
//! Runs before anything else looks at recognized text. The pass order is
//! fixed: later passes rely on the line structure produced by earlier ones.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

// Pre-compile all cleanup patterns at module load time
lazy_static! {
    // Pilcrows and Unicode line/paragraph separators emitted by some engines
    static ref PARAGRAPH_MARKS: Regex = Regex::new(r"[¶\u{2028}\u{2029}]").unwrap();

    static ref LINE_ENDINGS: Regex = Regex::new(r"\r\n?").unwrap();

    // Any whitespace except the newline itself
    static ref HORIZONTAL_WS: Regex = Regex::new(r"[^\S\n]+").unwrap();

    static ref BLANK_RUNS: Regex = Regex::new(r"\n(?: *\n){2,}").unwrap();

    // 4+ single-character tokens separated by single spaces: "계 약 내 용"
    static ref SPACED_LETTERS: Regex = Regex::new(
        r"(^| )((?:[가-힣A-Za-z0-9] ){3,}[가-힣A-Za-z0-9])( |$)"
    ).unwrap();
}

/// Lines whose whitespace-free key is shorter than this are dropped as noise.
const MIN_LINE_KEY_CHARS: usize = 2;

/// Counters from one cleanup pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanStats {
    /// Letter-by-letter runs joined back into words
    pub collapsed_runs: u64,
    /// Lines dropped for being too short
    pub noise_lines: u64,
    /// Lines dropped as repeats of an earlier line
    pub duplicate_lines: u64,
}

/// Clean recognized text. Empty input gives empty output.
pub fn clean(raw: &str) -> String {
    clean_with_stats(raw).0
}

/// Clean recognized text and report what was changed.
pub fn clean_with_stats(raw: &str) -> (String, CleanStats) {
    let mut stats = CleanStats::default();

    let text = PARAGRAPH_MARKS.replace_all(raw, "\n");
    let text = normalize_line_endings(&text);
    let text = HORIZONTAL_WS.replace_all(&text, " ");
    let text = BLANK_RUNS.replace_all(&text, "\n\n");

    let lines = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (collapsed, runs) = collapse_spaced_letters(line);
            stats.collapsed_runs += runs;
            collapsed
        })
        .collect::<Vec<_>>();

    let mut seen: HashSet<String> = HashSet::with_capacity(lines.len());
    let mut kept = Vec::with_capacity(lines.len());
    for line in lines {
        let key: String = line.chars().filter(|c| !c.is_whitespace()).collect();
        if key.chars().count() < MIN_LINE_KEY_CHARS {
            stats.noise_lines += 1;
            continue;
        }
        if !seen.insert(key) {
            stats.duplicate_lines += 1;
            continue;
        }
        kept.push(line);
    }

    (kept.join("\n"), stats)
}

/// Convert `\r\n` and lone `\r` to `\n`.
pub fn normalize_line_endings(text: &str) -> String {
    LINE_ENDINGS.replace_all(text, "\n").into_owned()
}

/// Join letter-by-letter runs within one line. Returns the line and the
/// number of runs joined.
fn collapse_spaced_letters(line: &str) -> (String, u64) {
    let mut runs: u64 = 0;
    let result = SPACED_LETTERS.replace_all(line, |caps: &Captures| {
        runs += 1;
        let joined: String = caps[2].split(' ').collect();
        format!("{}{}{}", &caps[1], joined, &caps[3])
    });
    (result.into_owned(), runs)
}
