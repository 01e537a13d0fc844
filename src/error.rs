//! Error types for buildseq
//!
//! Domain-specific error types using thiserror. Every error that can end a
//! run knows which process exit code it maps to.

use std::path::PathBuf;
use thiserror::Error;

/// Exit code used when a program could not be found (shell convention)
pub const EXIT_NOT_FOUND: i32 = 127;

/// Exit code used when a program was found but could not be started
pub const EXIT_CANNOT_EXECUTE: i32 = 126;

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },

    /// Failed to resolve a directory
    #[error("Failed to resolve directory '{path}': {error}")]
    ResolveDir { path: PathBuf, error: String },
}

/// Project configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Explicitly requested config file does not exist
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read config file
    #[error("Failed to read config file '{path}': {error}")]
    ReadError { path: PathBuf, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    ParseError { path: PathBuf, error: String },

    /// Job count is not a positive number
    #[error("'{value}' is not a valid number of CPUs")]
    InvalidJobs { value: i64 },
}

/// Errors raised while executing steps
#[derive(Error, Debug)]
pub enum StepError {
    /// External command ran and exited unsuccessfully
    #[error("`{command}` failed with exit code {code}")]
    CommandFailed { command: String, code: i32 },

    /// External command could not be started
    #[error("Failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Install manifest still absent after running install
    #[error("Install manifest '{path}' was not produced by the install step")]
    ManifestMissing { path: PathBuf },

    /// Filesystem error
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    /// Writing user-facing output failed
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl StepError {
    /// Process exit code this error should terminate the run with
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed { code, .. } => *code,
            Self::Launch { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                EXIT_NOT_FOUND
            }
            Self::Launch { .. } => EXIT_CANNOT_EXECUTE,
            Self::ManifestMissing { .. } | Self::Filesystem(_) | Self::Output(_) => 1,
        }
    }
}
