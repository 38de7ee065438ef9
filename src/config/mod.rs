//! Run settings, parsed from the command line

use crate::output::DEFAULT_OUTPUT_DIR;
use crate::tool_library::DEFAULT_TOOL_TABLE;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "fusion-lathe-post")]
#[command(version, about = "Turn Fusion lathe G-code into a shop-ready program")]
pub struct Settings {
    /// Fusion output file (.nc) to post
    pub input: Option<PathBuf>,

    /// Tool table mapping TOOL_KEY -> display/type/speed/feed
    #[arg(long, env = "FUSION_POST_TOOLS", default_value = DEFAULT_TOOL_TABLE)]
    pub tools: PathBuf,

    /// Directory for timestamped output files
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Write to this exact file instead of a timestamped one
    #[arg(short, long, conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Print this many lines of the result after writing (0 to disable)
    #[arg(long, default_value_t = 30)]
    pub preview: usize,

    /// Print the program to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,

    /// Debug logging (per-tool key resolution)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: None,
            tools: PathBuf::from(DEFAULT_TOOL_TABLE),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output: None,
            preview: 30,
            stdout: false,
            verbose: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_bare_invocation() {
        let settings = Settings::try_parse_from(["fusion-lathe-post"]).unwrap();
        // Env var may be set on the machine running the tests
        if std::env::var_os("FUSION_POST_TOOLS").is_none() {
            assert_eq!(settings, Settings::default());
        }
    }

    #[test]
    fn test_full_invocation() {
        let settings = Settings::try_parse_from([
            "fusion-lathe-post",
            "part.nc",
            "--tools",
            "lathe.json",
            "--output-dir",
            "out",
            "--preview",
            "0",
            "-v",
        ])
        .unwrap();

        assert_eq!(settings.input, Some(PathBuf::from("part.nc")));
        assert_eq!(settings.tools, PathBuf::from("lathe.json"));
        assert_eq!(settings.output_dir, PathBuf::from("out"));
        assert_eq!(settings.preview, 0);
        assert!(settings.verbose);
    }

    #[test]
    fn test_output_conflicts_with_stdout() {
        let result =
            Settings::try_parse_from(["fusion-lathe-post", "part.nc", "-o", "x.nc", "--stdout"]);
        assert!(result.is_err());
    }
}
