//! Error types for effigy-exec

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while running a local program
#[derive(Error, Debug, Clone)]
pub enum ExecError {
    /// Program could not be found on `PATH`
    #[error("program not found: {0}")]
    NotFound(String),

    /// Process spawn error
    #[error("failed to spawn {program}: {reason}")]
    SpawnError {
        /// Program that failed to start
        program: String,
        /// Underlying OS error
        reason: String,
    },

    /// I/O error while waiting for the process
    #[error("I/O error: {0}")]
    IoError(String),

    /// Program did not finish in time
    #[error("{program} timed out after {timeout:?}")]
    Timeout {
        /// Program that was killed
        program: String,
        /// Timeout duration that was exceeded
        timeout: Duration,
    },
}
