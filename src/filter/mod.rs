//! Line filtering and normalization
//!
//! Runs before anything else: drops everything that isn't part of the machining
//! program, collapses blank runs and strips setup codes the CAM export repeats.

use crate::lexer::is_relevant;
use tracing::info;

/// Setup/mode codes removed when a line *starts* with them.
///
/// G96/G97 only match at the start of a line, so the generated `G99G96S..F..`
/// speed/feed line is left alone.
pub const BANNED_PREFIXES: [&str; 8] = ["G80", "G54", "G50", "G90", "G95", "G18", "G96", "G97"];

/// Lines surviving a pass, plus how many were dropped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filtered {
    pub lines: Vec<String>,
    pub removed: usize,
}

/// Keep machining-relevant lines, trimmed. M30/M99 pass here and are suppressed later.
pub fn keep_relevant_lines<S: AsRef<str>>(lines: &[S]) -> Filtered {
    let mut kept = Vec::with_capacity(lines.len());
    let mut removed = 0;

    for line in lines {
        let s = line.as_ref().trim();
        if s.is_empty() {
            continue;
        }
        if is_relevant(s) {
            kept.push(s.to_string());
        } else {
            removed += 1;
        }
    }

    if removed > 0 {
        info!("Kept {} lines, removed {}", kept.len(), removed);
    }

    Filtered { lines: kept, removed }
}

/// Collapse runs of blank lines into a single blank line
pub fn collapse_blank_lines(lines: Vec<String>) -> Vec<String> {
    let mut tidy = Vec::with_capacity(lines.len());
    let mut prev_blank = false;

    for line in lines {
        let blank = line.is_empty();
        if !(blank && prev_blank) {
            tidy.push(line);
        }
        prev_blank = blank;
    }

    tidy
}

fn is_banned(line: &str) -> bool {
    let s = line.trim();
    BANNED_PREFIXES.iter().any(|code| s.starts_with(code))
}

/// Remove setup/redundant lines by prefix
pub fn remove_unwanted_codes(lines: Vec<String>) -> Filtered {
    let before = lines.len();
    let filtered: Vec<String> = lines.into_iter().filter(|l| !is_banned(l)).collect();
    let removed = before - filtered.len();

    if removed > 0 {
        info!("Removed {} unwanted or redundant lines (start-with filter)", removed);
    }

    Filtered { lines: filtered, removed }
}

/// Blank-collapse followed by the banned-prefix filter
pub fn normalize(lines: Vec<String>) -> Filtered {
    remove_unwanted_codes(collapse_blank_lines(lines))
}
