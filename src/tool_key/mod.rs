//! TOOL_KEY resolution
//!
//! Fusion doesn't put the lookup key on the tool line. It travels in a comment
//! somewhere around it, before or after, so a tool change is matched to the
//! nearest key-bearing comment:
//!
//! 1. the last key seen since the previous tool change
//! 2. the first key within [`LOOKAHEAD_LINES`] after the tool line
//! 3. the nearest key within [`LOOKBACK_LINES`] before it

use crate::lexer::{classify, LineKind};
use once_cell::sync::Lazy;
use regex::Regex;

pub const LOOKAHEAD_LINES: usize = 30;
pub const LOOKBACK_LINES: usize = 15;

/// `TOOL_KEY=X`, `Tool Key: X`, `tool-key = X` ...
static KEY_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)tool[\s_\-]*key\s*[:=]\s*(.+)").unwrap());

fn comment_body(raw: &str) -> &str {
    raw.trim().trim_matches(|c| c == '(' || c == ')').trim()
}

/// Parse a key out of a comment, lower-cased.
///
/// A labelled comment yields its value, anything else yields the whole
/// comment body. May return an empty string, e.g. for `()`.
pub fn parse_tool_key(raw: &str) -> String {
    let content = comment_body(raw);
    let key = match KEY_LABEL.captures(content) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()).trim(),
        None => content,
    };

    key.to_lowercase()
}

/// Key carried by a comment line, if the line is a comment with a non-empty key
pub fn comment_key(line: &str) -> Option<String> {
    if classify(line) != LineKind::Comment {
        return None;
    }
    let key = parse_tool_key(line);
    (!key.is_empty()).then_some(key)
}

/// Key from an explicitly labelled comment (`TOOL_KEY=...`), bare comments don't count
pub fn labelled_key(line: &str) -> Option<String> {
    if classify(line) != LineKind::Comment {
        return None;
    }
    let caps = KEY_LABEL.captures(comment_body(line))?;
    let key = caps.get(1)?.as_str().trim().to_lowercase();
    (!key.is_empty()).then_some(key)
}

/// Which rule produced a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Pending,
    Lookahead,
    Lookback,
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    /// Lower-cased key, empty when unresolved
    pub key: String,
    pub source: KeySource,
}

impl ResolvedKey {
    pub fn is_resolved(&self) -> bool {
        self.source != KeySource::Unresolved
    }
}

/// Resolve the key for the tool change at `lines[index]`.
///
/// `pending` always wins over anything found by scanning, even when a
/// closer comment follows the tool line.
pub fn resolve_tool_key(lines: &[String], index: usize, pending: Option<&str>) -> ResolvedKey {
    if let Some(key) = pending.filter(|k| !k.is_empty()) {
        return ResolvedKey {
            key: key.to_string(),
            source: KeySource::Pending,
        };
    }

    let ahead_end = lines.len().min(index + 1 + LOOKAHEAD_LINES);
    let ahead = lines.get(index + 1..ahead_end).unwrap_or_default();
    if let Some(key) = ahead.iter().find_map(|l| comment_key(l)) {
        return ResolvedKey {
            key,
            source: KeySource::Lookahead,
        };
    }

    let behind_start = index.saturating_sub(LOOKBACK_LINES);
    let behind = lines.get(behind_start..index).unwrap_or_default();
    if let Some(key) = behind.iter().rev().find_map(|l| comment_key(l)) {
        return ResolvedKey {
            key,
            source: KeySource::Lookback,
        };
    }

    ResolvedKey {
        key: String::new(),
        source: KeySource::Unresolved,
    }
}
