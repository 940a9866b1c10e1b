// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Every failure that leaves this layer is normalised into a single
//! [`GitexecError`]. Which variant reaches the caller depends on the path a
//! request took through the executors; see [`crate::exec::completion`].

use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitexecError {
    /// The child process could not be created at all.
    #[error("failed to start `{command}`: {source}")]
    ProcessStart {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The child ran but did not finish cleanly.
    #[error(transparent)]
    ProcessExecution(#[from] ExecutionFailure),

    /// User-facing summary of a failed streamed command.
    #[error("Git command failed. Check command log for details (open with {extras_key})")]
    CommandFailed { extras_key: String },

    /// The caller-supplied success continuation failed after a clean exit.
    ///
    /// Displayed transparently: the user only sees the continuation's message.
    #[error(transparent)]
    SuccessContinuation(anyhow::Error),

    #[error("refresh failed: {0}")]
    Refresh(#[source] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Why a started child process counts as failed.
#[derive(Error, Debug)]
pub enum ExecutionFailure {
    #[error("{0}")]
    NonZeroExit(ExitStatus),

    #[error("waiting for process: {0}")]
    Wait(#[source] std::io::Error),

    #[error("reading process output: {0}")]
    Stream(#[source] std::io::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, GitexecError>;
