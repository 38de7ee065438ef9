//! Preamble stripping
//!
//! Everything the CAM tool writes before the first tool change is setup noise.
//! The only things worth keeping from it are the program number and an
//! explicit TOOL_KEY comment meant for the first tool.

use crate::lexer::{classify, LineKind};
use crate::tool_key::labelled_key;

/// Used when the input never names a program
pub const DEFAULT_PROGRAM_NUMBER: &str = "O0000";

#[derive(Debug, Clone, PartialEq)]
pub struct Preamble {
    pub program_number: String,
    /// Last labelled TOOL_KEY seen before the first tool change
    pub lead_key: Option<String>,
    /// Lines from the first tool change onward
    pub lines: Vec<String>,
}

/// Strip everything before the first tool change and pick out the program number.
///
/// The first `O####` line wins. Blank and `%` lines are never carried over, the
/// envelope writes its own. Bare comments in the preamble are CAM chatter and
/// never become the lead key, only `TOOL_KEY=...` style ones do.
pub fn strip_preamble<S: AsRef<str>>(lines: &[S]) -> Preamble {
    let mut program_number: Option<String> = None;
    let mut lead_key: Option<String> = None;
    let mut found_tool = false;
    let mut kept = Vec::new();

    for line in lines {
        let s = line.as_ref().trim();
        match classify(s) {
            LineKind::Blank | LineKind::Percent => continue,
            LineKind::ProgramNumber => {
                if program_number.is_none() {
                    program_number = Some(s.to_string());
                }
            }
            LineKind::ToolChange => found_tool = true,
            LineKind::Comment if !found_tool => {
                if let Some(key) = labelled_key(s) {
                    lead_key = Some(key);
                }
            }
            _ => {}
        }
        if found_tool {
            kept.push(s.to_string());
        }
    }

    Preamble {
        program_number: program_number.unwrap_or_else(|| DEFAULT_PROGRAM_NUMBER.to_string()),
        lead_key,
        lines: kept,
    }
}
