//! Post-processors for machine-specific G-code output
//!
//! Takes raw CAM output and turns it into a program the machine accepts as-is.
//! The lathe post runs these passes in order, each feeding the next:
//! filter -> normalize -> strip preamble -> assemble tool blocks -> envelope.

use crate::filter::{keep_relevant_lines, normalize};
use crate::preamble::strip_preamble;
use crate::tool_library::ToolTable;
use tracing::info;

pub mod assembler;
pub mod envelope;
pub mod tool_block;

use assembler::BlockAssembler;

/// Finished program text, one entry per line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GCodeOutput {
    pub lines: Vec<String>,
}

impl GCodeOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn emit_all<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Lines joined with `\n`, no trailing newline
impl std::fmt::Display for GCodeOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lines.join("\n"))
    }
}

/// What a run did, for the console summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostReport {
    pub program_number: String,
    /// Lines dropped as not part of the machining program
    pub filtered_out: usize,
    /// Setup codes removed by the normalizer
    pub codes_removed: usize,
    pub tool_blocks: usize,
    pub close_blocks: usize,
    /// Tool lines whose key was empty or missing from the table
    pub unknown_tools: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostedProgram {
    pub output: GCodeOutput,
    pub report: PostReport,
}

/// Post-processor trait - implemented for each controller type
pub trait PostProcessor {
    /// Convert raw CAM output to machine-specific output
    fn process(&self, source: &str) -> PostedProgram;

    /// Machine/controller name
    fn name(&self) -> &str;
}

/// Fusion lathe output -> shop-ready program with per-tool headers
pub struct LathePost<'a> {
    tools: &'a ToolTable,
}

impl<'a> LathePost<'a> {
    pub fn new(tools: &'a ToolTable) -> Self {
        Self { tools }
    }

    /// Run every pass over already-split lines
    pub fn process_lines<S: AsRef<str>>(&self, raw: &[S]) -> PostedProgram {
        let relevant = keep_relevant_lines(raw);
        let normalized = normalize(relevant.lines);
        let preamble = strip_preamble(&normalized.lines);

        let assembly = BlockAssembler::new(self.tools)
            .with_pending_key(preamble.lead_key)
            .assemble(&preamble.lines);
        let output = envelope::wrap(&preamble.program_number, assembly.body);

        info!(
            "Posted {} with {} tool blocks ({} unknown)",
            preamble.program_number,
            assembly.tool_blocks,
            assembly.unknown_tools.len()
        );

        PostedProgram {
            output,
            report: PostReport {
                program_number: preamble.program_number,
                filtered_out: relevant.removed,
                codes_removed: normalized.removed,
                tool_blocks: assembly.tool_blocks,
                close_blocks: assembly.close_blocks,
                unknown_tools: assembly.unknown_tools,
            },
        }
    }
}

impl PostProcessor for LathePost<'_> {
    fn process(&self, source: &str) -> PostedProgram {
        let lines: Vec<&str> = source.lines().collect();
        self.process_lines(&lines)
    }

    fn name(&self) -> &str {
        "Fusion Lathe"
    }
}
