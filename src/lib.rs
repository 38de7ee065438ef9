//! Fusion lathe post-processor
//!
//! Cleans CAM output into a program the lathe runs as-is: CAM setup lines are
//! dropped, every tool change gets a header built from a tool table keyed by
//! TOOL_KEY comments, and the whole thing is wrapped in the shop's fixed
//! startup/shutdown blocks.

pub mod config;
pub mod error;
pub mod filter;
pub mod input;
pub mod lexer;
pub mod output;
pub mod post;
pub mod preamble;
pub mod tool_key;
pub mod tool_library;

use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::info;

pub use config::Settings;
pub use error::{PostError, Result};
pub use post::{GCodeOutput, LathePost, PostProcessor, PostReport, PostedProgram};
pub use tool_library::{ToolEntry, ToolTable};

/// `RUST_LOG` when set, otherwise `info` (`debug` with `verbose`)
fn log_filter(verbose: bool) -> tracing_subscriber::EnvFilter {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
}

/// Install the tracing subscriber. Logs go to stderr so `--stdout` output stays clean.
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let env_filter = log_filter(verbose);

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Read and post one file
pub fn post_file(input: &Path, tools: &ToolTable) -> Result<PostedProgram> {
    let source = input::read_source(input)?;
    let post = LathePost::new(tools);
    info!("Posting {} with {} post", input.display(), post.name());
    Ok(post.process(&source))
}

#[derive(Debug)]
pub struct RunOutcome {
    pub posted: PostedProgram,
    /// Where the program was written, `None` when printing to stdout
    pub written_to: Option<PathBuf>,
}

/// Full run: load tools, post the input, write the result.
///
/// Nothing is written unless every pass succeeded.
pub fn run(settings: &Settings, input: &Path) -> Result<RunOutcome> {
    let tools = ToolTable::load_or_empty(&settings.tools)?;
    let posted = post_file(input, &tools)?;

    if settings.stdout {
        return Ok(RunOutcome {
            posted,
            written_to: None,
        });
    }

    let path = match &settings.output {
        Some(path) => path.clone(),
        None => output::default_output_path(
            &settings.output_dir,
            input,
            Local::now().naive_local(),
        ),
    };
    output::write_program(&path, &posted.output)?;
    info!("Saved cleaned file to {}", path.display());

    Ok(RunOutcome {
        posted,
        written_to: Some(path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRAM: &str = "%\nO1234\n(TOOL_KEY=DRILL1)\nT0101\nG01X1.Y1.\nM30\n%\n";

    #[test]
    fn test_rust_log_overrides_default_level() {
        use tracing_subscriber::filter::LevelFilter;

        // Only test touching RUST_LOG; set and cleared in one place
        std::env::set_var("RUST_LOG", "warn");
        let quiet = log_filter(false);
        let verbose = log_filter(true);
        std::env::remove_var("RUST_LOG");

        assert_eq!(quiet.max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(verbose.max_level_hint(), Some(LevelFilter::WARN));

        assert_eq!(log_filter(false).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(log_filter(true).max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_run_writes_timestamped_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("flange.nc");
        std::fs::write(&input, PROGRAM).unwrap();
        let tools = dir.path().join("tools.json");
        std::fs::write(
            &tools,
            r#"{"DRILL1": {"display": "(DRILL 1)", "speed": 800, "feed": ".1"}}"#,
        )
        .unwrap();

        let settings = Settings {
            tools,
            output_dir: dir.path().join("Output"),
            ..Settings::default()
        };
        let outcome = run(&settings, &input).unwrap();

        let written = outcome.written_to.unwrap();
        let name = written.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("flange_cleaned_"), "{name}");
        assert!(name.ends_with(".nc"));

        let text = std::fs::read_to_string(&written).unwrap();
        assert!(text.starts_with("START\n%\nO1234\n"));
        assert!(text.contains("N100 (DRILL 1)\nG30U0W0\nT0101\nG140M08\nG99G96S800F.1\n"));
        assert!(text.ends_with("M99\n%"));
    }

    #[test]
    fn test_run_without_tool_table() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("part.nc");
        std::fs::write(&input, PROGRAM).unwrap();

        let settings = Settings {
            tools: dir.path().join("tools.json"),
            output: Some(dir.path().join("out.nc")),
            ..Settings::default()
        };
        let outcome = run(&settings, &input).unwrap();

        let text = std::fs::read_to_string(outcome.written_to.unwrap()).unwrap();
        assert!(text.contains("N100 (UNKNOWN TOOL)"));
        assert_eq!(outcome.posted.report.unknown_tools, vec!["T0101"]);
    }

    #[test]
    fn test_unreadable_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("Output");

        let settings = Settings {
            tools: dir.path().join("tools.json"),
            output_dir: out_dir.clone(),
            ..Settings::default()
        };
        let err = run(&settings, &dir.path().join("missing.nc")).unwrap_err();

        assert!(matches!(err, PostError::ReadInput { .. }));
        assert!(!out_dir.exists());
    }

    #[test]
    fn test_stdout_mode_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("part.nc");
        std::fs::write(&input, PROGRAM).unwrap();

        let settings = Settings {
            tools: dir.path().join("tools.json"),
            output_dir: dir.path().join("Output"),
            stdout: true,
            ..Settings::default()
        };
        let outcome = run(&settings, &input).unwrap();

        assert!(outcome.written_to.is_none());
        assert!(!dir.path().join("Output").exists());
        assert_eq!(outcome.posted.report.program_number, "O1234");
    }
}
