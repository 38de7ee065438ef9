use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostError {
    #[error("cannot read input file {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read tool table {path}: {source}")]
    ReadToolTable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid tool table {path}: {source}")]
    ParseToolTable {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot write output file {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PostError>;
