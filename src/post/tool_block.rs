//! Per-tool header blocks
//!
//! Every tool change is rewritten into:
//!
//! ```text
//! N700 (OD FINISH)
//! G30U0W0
//! T0707
//! G140M08
//! G99G96S200F.25
//! ```
//!
//! The speed/feed line is only written when the key is found in the tool table.

use crate::tool_library::ToolTable;
use tracing::warn;

/// Retract to the second reference point, clear of the part
pub const SAFE_RETRACT: &str = "G30U0W0";

pub const COOLANT_ON: &str = "G140M08";

pub const UNKNOWN_TOOL: &str = "(UNKNOWN TOOL)";

/// A tool change line and the sequence number derived from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolChange {
    pub line: String,
    pub sequence: u32,
}

impl ToolChange {
    pub fn new(line: &str) -> Self {
        Self {
            line: line.to_string(),
            sequence: sequence_number(line),
        }
    }

    /// `N<sequence>` word for the header line
    pub fn n_word(&self) -> String {
        format!("N{}", self.sequence)
    }
}

/// Sequence number from the first two digits of the tool number, times 100.
///
/// `T0700` -> 700, `T1212` -> 1200, `T7` -> 700. No digits -> 100.
pub fn sequence_number(tool_line: &str) -> u32 {
    let digits: String = tool_line
        .trim()
        .strip_prefix('T')
        .map(|rest| rest.chars().take_while(|c| c.is_ascii_digit()).collect())
        .unwrap_or_default();

    let lead = if digits.len() >= 2 { &digits[..2] } else { digits.as_str() };
    lead.parse::<u32>().unwrap_or(1) * 100
}

/// Rendered header for one tool
#[derive(Debug, Clone, PartialEq)]
pub struct ToolBlock {
    pub lines: Vec<String>,
    /// False when the fallback header was used
    pub resolved: bool,
}

/// Build the header for a tool change.
///
/// An empty key or one missing from the table gives the reduced
/// `(UNKNOWN TOOL)` header; the run carries on either way.
pub fn build_tool_block(tool: &ToolChange, key: &str, tools: &ToolTable) -> ToolBlock {
    let entry = (!key.is_empty()).then(|| tools.get(key)).flatten();

    let Some(entry) = entry else {
        if key.is_empty() {
            warn!("No TOOL_KEY found for {}", tool.line);
        } else {
            warn!("TOOL_KEY '{}' for {} not found in tool table", key, tool.line);
        }
        return ToolBlock {
            lines: vec![
                format!("{} {}", tool.n_word(), UNKNOWN_TOOL),
                SAFE_RETRACT.to_string(),
                tool.line.clone(),
                COOLANT_ON.to_string(),
            ],
            resolved: false,
        };
    };

    ToolBlock {
        lines: vec![
            format!("{} {}", tool.n_word(), entry.display),
            SAFE_RETRACT.to_string(),
            tool.line.clone(),
            COOLANT_ON.to_string(),
            format!("G99{}S{}F{}", entry.motion_code, entry.speed, entry.feed),
        ],
        resolved: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool_library::ToolEntry;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sequence_numbers() {
        assert_eq!(sequence_number("T0700"), 700);
        assert_eq!(sequence_number("T0300"), 300);
        assert_eq!(sequence_number("T7"), 700);
        assert_eq!(sequence_number("T1212"), 1200);
        assert_eq!(sequence_number("T0101 M08"), 100);
        assert_eq!(sequence_number("TABC"), 100);
        assert_eq!(sequence_number("T"), 100);
        assert_eq!(sequence_number("G01X1."), 100);
    }

    #[test]
    fn test_n_word() {
        assert_eq!(ToolChange::new("T0700").n_word(), "N700");
        assert_eq!(ToolChange::new("T7").n_word(), "N700");
        assert_eq!(ToolChange::new("TXYZ").n_word(), "N100");
    }

    #[test]
    fn test_resolved_block() {
        let mut tools = ToolTable::new();
        tools.insert(
            "udrill50",
            ToolEntry {
                display: "(U-DRILL 50)".to_string(),
                motion_code: "G97".to_string(),
                speed: "900".to_string(),
                feed: ".08".to_string(),
            },
        );

        let block = build_tool_block(&ToolChange::new("T0505"), "udrill50", &tools);
        assert!(block.resolved);
        assert_eq!(
            block.lines,
            vec!["N500 (U-DRILL 50)", "G30U0W0", "T0505", "G140M08", "G99G97S900F.08"]
        );
    }

    #[test]
    fn test_fallback_block() {
        let tools = ToolTable::new();

        for key in ["", "missing"] {
            let block = build_tool_block(&ToolChange::new("T0300"), key, &tools);
            assert!(!block.resolved);
            assert_eq!(
                block.lines,
                vec!["N300 (UNKNOWN TOOL)", "G30U0W0", "T0300", "G140M08"]
            );
        }
    }
}
