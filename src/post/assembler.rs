//! Tool block assembly
//!
//! One pass over the preamble-stripped program. Tool changes get a fresh
//! header, the previous tool path is closed off first, and raw M30/M99 lines
//! are dropped since the envelope supplies the real program end.

use super::tool_block::{build_tool_block, ToolChange, SAFE_RETRACT};
use super::GCodeOutput;
use crate::lexer::{classify, LineKind};
use crate::tool_key::{comment_key, resolve_tool_key};
use crate::tool_library::ToolTable;
use tracing::debug;

/// Optional stop after each tool path
pub const TOOL_END_STOP: &str = "M01";

/// Mutable state threaded through one assembly pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssemblerContext {
    /// A tool path is open and needs closing
    pub active: bool,
    /// Last comment key since the previous tool change
    pub pending_key: Option<String>,
    pub tool_blocks: usize,
    pub close_blocks: usize,
    pub unknown_tools: Vec<String>,
}

/// Result of an assembly pass
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub body: Vec<String>,
    pub tool_blocks: usize,
    pub close_blocks: usize,
    /// Tool lines that got the fallback header
    pub unknown_tools: Vec<String>,
}

pub struct BlockAssembler<'a> {
    tools: &'a ToolTable,
    ctx: AssemblerContext,
    output: GCodeOutput,
}

impl<'a> BlockAssembler<'a> {
    pub fn new(tools: &'a ToolTable) -> Self {
        Self {
            tools,
            ctx: AssemblerContext::default(),
            output: GCodeOutput::new(),
        }
    }

    /// Seed the pending key, e.g. with a key found ahead of the first tool
    pub fn with_pending_key(mut self, key: Option<String>) -> Self {
        self.ctx.pending_key = key.filter(|k| !k.is_empty());
        self
    }

    pub fn assemble(mut self, lines: &[String]) -> Assembly {
        for (index, line) in lines.iter().enumerate() {
            let s = line.trim();
            match classify(s) {
                LineKind::Comment => {
                    if let Some(key) = comment_key(s) {
                        self.ctx.pending_key = Some(key);
                    }
                }
                LineKind::ToolChange => self.emit_tool_change(lines, index, s),
                LineKind::EndMarker => {
                    if self.ctx.active {
                        self.close_tool(true);
                    }
                }
                _ => self.output.emit(s),
            }
        }

        // Program ran out mid-tool
        if self.ctx.active {
            self.close_tool(false);
        }

        Assembly {
            body: self.output.lines,
            tool_blocks: self.ctx.tool_blocks,
            close_blocks: self.ctx.close_blocks,
            unknown_tools: self.ctx.unknown_tools,
        }
    }

    fn emit_tool_change(&mut self, lines: &[String], index: usize, line: &str) {
        if self.ctx.active {
            self.close_tool(true);
        }

        let tool = ToolChange::new(line);
        let pending = self.ctx.pending_key.take();
        let resolved = resolve_tool_key(lines, index, pending.as_deref());
        debug!(
            "{} -> key '{}' ({:?}), {}",
            tool.line,
            resolved.key,
            resolved.source,
            tool.n_word()
        );
        if !resolved.is_resolved() {
            debug!("{}: no key comment within range", tool.line);
        }

        let block = build_tool_block(&tool, &resolved.key, self.tools);
        if !block.resolved {
            self.ctx.unknown_tools.push(tool.line.clone());
        }
        self.output.emit_all(block.lines);

        self.ctx.active = true;
        self.ctx.tool_blocks += 1;
    }

    fn close_tool(&mut self, separator: bool) {
        self.output.emit(SAFE_RETRACT);
        self.output.emit(TOOL_END_STOP);
        if separator {
            self.output.emit("");
        }
        self.ctx.active = false;
        self.ctx.close_blocks += 1;
    }
}
