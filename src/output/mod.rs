//! Output naming and writing

use crate::error::{PostError, Result};
use crate::post::GCodeOutput;
use chrono::NaiveDateTime;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const DEFAULT_OUTPUT_DIR: &str = "Output";

/// `HH-MM-SS_DD-MM-YYYY`
pub const TIMESTAMP_FORMAT: &str = "%H-%M-%S_%d-%m-%Y";

/// `<stem>_cleaned_<timestamp>.nc`
pub fn output_file_name(input: &Path, at: NaiveDateTime) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "program".to_string());
    format!("{}_cleaned_{}.nc", stem, at.format(TIMESTAMP_FORMAT))
}

pub fn default_output_path(dir: &Path, input: &Path, at: NaiveDateTime) -> PathBuf {
    dir.join(output_file_name(input, at))
}

/// Write a program, creating the directory if needed.
///
/// The text goes to a temporary file next to the target and is renamed into
/// place, so a failed write never leaves a half-written program behind.
pub fn write_program(path: &Path, output: &GCodeOutput) -> Result<()> {
    let write_err = |source: std::io::Error| PostError::WriteOutput {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(output.to_string().as_bytes()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    Ok(())
}

/// First `limit` lines, with `...` appended when there's more
pub fn preview(output: &GCodeOutput, limit: usize) -> Vec<String> {
    let mut lines: Vec<String> = output.lines.iter().take(limit).cloned().collect();
    if output.len() > limit {
        lines.push("...".to_string());
    }
    lines
}
