//! Captured output of a finished program

use std::time::Duration;

/// Result of running a program
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit status code (0 for success, -1 when killed by a signal)
    pub status: i32,
    /// stdout output
    pub stdout: String,
    /// stderr output
    pub stderr: String,
    /// Time taken to execute
    pub duration: Duration,
}

impl CommandOutput {
    /// Check if the program exited with status 0
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// stderr with surrounding whitespace removed, or the exit status when
    /// the program printed nothing
    #[must_use]
    pub fn failure_message(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            format!("exit status {}", self.status)
        } else {
            stderr.to_string()
        }
    }
}
