//! Where the input program comes from
//!
//! The post itself only needs a path. Picking one is left to a provider: a
//! command-line argument, or a native file dialog with the `dialog` feature.

use crate::error::{PostError, Result};
use std::path::{Path, PathBuf};

pub trait InputPathProvider {
    /// Path to post, `None` if the user didn't choose one
    fn input_path(&self) -> Option<PathBuf>;
}

/// Path given up front, e.g. on the command line
#[derive(Debug, Clone)]
pub struct GivenPath(pub Option<PathBuf>);

impl InputPathProvider for GivenPath {
    fn input_path(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}

/// Native "open file" dialog
#[cfg(feature = "dialog")]
#[derive(Debug, Clone)]
pub struct FileDialogPicker {
    pub start_dir: PathBuf,
}

#[cfg(feature = "dialog")]
impl InputPathProvider for FileDialogPicker {
    fn input_path(&self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Select Fusion Output File (.nc)")
            .set_directory(&self.start_dir)
            .add_filter("G-code files", &["nc"])
            .add_filter("All files", &["*"])
            .pick_file()
    }
}

/// Read a G-code file. Bytes that aren't valid UTF-8 are replaced, not rejected.
pub fn read_source(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| PostError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_given_path() {
        let path = PathBuf::from("part.nc");
        assert_eq!(GivenPath(Some(path.clone())).input_path(), Some(path));
        assert_eq!(GivenPath(None).input_path(), None);
    }

    #[test]
    fn test_read_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"O1234\r\nT0101\xff\n").unwrap();

        let source = read_source(file.path()).unwrap();
        let lines: Vec<_> = source.lines().collect();
        assert_eq!(lines[0], "O1234");
        assert!(lines[1].starts_with("T0101"));
    }

    #[test]
    fn test_unreadable_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_source(&dir.path().join("missing.nc")).unwrap_err();
        assert!(matches!(err, PostError::ReadInput { .. }));
    }
}
