//! Custom error types
//!
//! Errors raised by the harness itself, as opposed to failures of the
//! interpreter under test (those are verdicts, not errors).

use std::io;
use std::path::PathBuf;

/// Harness-wide error type
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("Cannot read test directory {}: {source}", path.display())]
    TestDirectory { path: PathBuf, source: io::Error },

    #[error("Cannot open test input {}: {source}", path.display())]
    Input { path: PathBuf, source: io::Error },

    #[error("Cannot read expected output {}: {source}", path.display())]
    ReferenceOutput { path: PathBuf, source: io::Error },

    #[error("Failed to launch {program}: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias using HarnessError
pub type HarnessResult<T> = Result<T, HarnessError>;
