//! Local program execution using `tokio::process`

use std::io::ErrorKind;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, instrument};

use crate::error::ExecError;
use crate::result::CommandOutput;
use crate::traits::CommandExecutor;

/// Local command executor
///
/// Spawns programs on the local machine using `tokio::process::Command`.
#[derive(Debug, Clone, Default)]
pub struct LocalExecutor;

impl LocalExecutor {
    /// Create a new local executor
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    async fn execute(&self, program: &str, args: &[String]) -> Result<CommandOutput, ExecError> {
        let start = Instant::now();

        debug!(program, ?args, "spawning local program");

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ExecError::NotFound(program.to_string()),
                _ => ExecError::SpawnError {
                    program: program.to_string(),
                    reason: e.to_string(),
                },
            })?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ExecError::IoError(e.to_string()))?;

        let duration = start.elapsed();
        let status = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        debug!(program, status, ?duration, "program completed");

        if !output.status.success() {
            error!(program, status, stderr = %stderr.trim(), "program failed");
        }

        Ok(CommandOutput {
            status,
            stdout,
            stderr,
            duration,
        })
    }
}

#[async_trait]
impl CommandExecutor for LocalExecutor {
    #[instrument(skip(self, args), level = "debug")]
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, ExecError> {
        self.execute(program, args).await
    }

    #[instrument(skip(self, args), level = "debug")]
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[String],
        timeout_duration: Duration,
    ) -> Result<CommandOutput, ExecError> {
        let start = Instant::now();

        match timeout(timeout_duration, self.execute(program, args)).await {
            Ok(result) => result,
            Err(_) => {
                error!(
                    program,
                    timeout = ?timeout_duration,
                    elapsed = ?start.elapsed(),
                    "program timed out"
                );
                Err(ExecError::Timeout {
                    program: program.to_string(),
                    timeout: timeout_duration,
                })
            }
        }
    }

    fn executor_type(&self) -> &'static str {
        "local"
    }
}
