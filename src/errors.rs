use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for all operations in the `scrubber` crate.
///
/// Wraps the various failure modes that can occur from I/O, configuration
/// parsing, regex compilation, and directory traversal.
#[derive(Error, Debug)]
pub enum Error {
    /// An error related to file system I/O.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An error that occurred during regex compilation.
    #[error("Pattern compilation failed: {0}")]
    Regex(#[from] regex::Error),

    /// An error that occurred while parsing a JSON configuration file.
    #[error("Config parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A general configuration-related error: unknown keys, bad flag
    /// combinations, unknown `empty_java_file_action` values, etc.
    #[error("Config error: {0}")]
    Config(String),

    /// An error from the `ignore` crate used for directory traversal.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// An error related to persisting a temporary file during an atomic
    /// write-back.
    #[error("Tempfile error: {0}")]
    TempFile(#[from] tempfile::PersistError),

    /// A failure while building the in-process tar archive of `output/`.
    /// Surfaced as a finding at the call site rather than aborting the run.
    #[error("Archive error: {0}")]
    Archive(String),

    /// A failure while computing or writing a unified diff.
    #[error("Diff error: {0}")]
    Diff(String),

    /// A file listed for scrubbing was not found under the codebase.
    #[error("Input path not found: {0}")]
    InputNotFound(PathBuf),
}

/// A convenient alias for `Result<T, scrubber::errors::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Config(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Config(s.to_string())
    }
}
