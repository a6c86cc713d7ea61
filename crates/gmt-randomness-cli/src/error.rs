use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] gmt_randomness_tests::Error),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("{path} holds no complete {length}-bit sample")]
    NoSamples { path: PathBuf, length: usize },
}
