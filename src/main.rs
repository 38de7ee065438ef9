use anyhow::Context;
use clap::Parser;
use fusion_lathe_post::input::{GivenPath, InputPathProvider};
use fusion_lathe_post::{init_logging, output, run, Settings};
use std::path::PathBuf;

#[cfg(feature = "dialog")]
fn pick_from_dialog() -> Option<PathBuf> {
    let picker = fusion_lathe_post::input::FileDialogPicker {
        start_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    picker.input_path()
}

#[cfg(not(feature = "dialog"))]
fn pick_from_dialog() -> Option<PathBuf> {
    None
}

/// Command-line path first, then the file dialog when built with it
fn pick_input(settings: &Settings) -> Option<PathBuf> {
    GivenPath(settings.input.clone())
        .input_path()
        .or_else(pick_from_dialog)
}

fn main() -> anyhow::Result<()> {
    let settings = Settings::parse();
    init_logging(settings.verbose)?;

    let Some(input) = pick_input(&settings) else {
        eprintln!("No file selected. Exiting.");
        std::process::exit(1);
    };

    let outcome = run(&settings, &input)
        .with_context(|| format!("failed to post {}", input.display()))?;

    let Some(path) = outcome.written_to else {
        println!("{}", outcome.posted.output);
        return Ok(());
    };

    let report = &outcome.posted.report;
    println!("Saved cleaned file to: {}", path.display());
    println!(
        "{}: {} tool blocks, {} unknown, {} lines filtered, {} setup codes removed",
        report.program_number,
        report.tool_blocks,
        report.unknown_tools.len(),
        report.filtered_out,
        report.codes_removed
    );

    if settings.preview > 0 {
        println!();
        println!("Preview (first {} lines):", settings.preview);
        for line in output::preview(&outcome.posted.output, settings.preview) {
            println!("  {}", line);
        }
    }
    println!("Done.");

    Ok(())
}
