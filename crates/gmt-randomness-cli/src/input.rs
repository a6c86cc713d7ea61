//! Loading sample sets and runner configuration from disk.

use std::path::Path;

use gmt_randomness_tests::{RunnerConfig, SampleSet};
use log::info;

use crate::error::CliError;

/// Read `path` and carve it into `length`-bit samples.
///
/// Binary files are unpacked MSB first; with `ascii` the file is parsed as
/// `'0'`/`'1'` text and whitespace is ignored.
pub fn load_samples(path: &Path, length: usize, ascii: bool) -> Result<SampleSet, CliError> {
    let read_err = |source: std::io::Error| CliError::Read {
        path: path.to_path_buf(),
        source,
    };
    let samples = if ascii {
        let text = std::fs::read_to_string(path).map_err(read_err)?;
        SampleSet::from_ascii(&text, length)?
    } else {
        let data = std::fs::read(path).map_err(read_err)?;
        SampleSet::from_bytes(&data, length)?
    };
    if samples.is_empty() {
        return Err(CliError::NoSamples {
            path: path.to_path_buf(),
            length,
        });
    }
    info!(
        "loaded {} samples of {length} bits from {}",
        samples.len(),
        path.display()
    );
    Ok(samples)
}

/// Runner configuration from an optional JSON file; defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<RunnerConfig, CliError> {
    let Some(path) = path else {
        return Ok(RunnerConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })
}
