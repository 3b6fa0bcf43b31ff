//! Command executor trait

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ExecError;
use crate::result::CommandOutput;

/// Runs a program with arguments and captures its output.
///
/// Arguments are passed to the program directly, never through a shell.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run `program` to completion
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, ExecError>;

    /// Run `program`, giving up once `timeout` has elapsed
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<CommandOutput, ExecError>;

    /// Short name for logging
    fn executor_type(&self) -> &'static str;
}
