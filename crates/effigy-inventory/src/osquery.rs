//! osquery client for fact collection

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use effigy_exec::{CommandExecutor, ExecError};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::error::InventoryError;
use crate::query::Query;
use crate::source::{InventorySource, Row, single_row};

/// Default osquery shell binary
pub const OSQUERYI: &str = "osqueryi";

/// osquery client for executing queries
///
/// Runs `osqueryi --json` through a [`CommandExecutor`]. Each query starts
/// a fresh shell, so this works without a running osquery daemon.
pub struct OsqueryClient {
    /// Executor for running osqueryi
    executor: Arc<dyn CommandExecutor>,
    /// osqueryi binary name or path
    binary: String,
    /// Query timeout, `None` waits indefinitely
    timeout: Option<Duration>,
}

impl OsqueryClient {
    /// Create a new osquery client
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            executor,
            binary: OSQUERYI.to_string(),
            timeout: None,
        }
    }

    /// Set query timeout. A zero duration disables the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// Query timeout, `None` when queries wait indefinitely
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Use a different osqueryi binary
    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// osqueryi binary name or path
    #[must_use]
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Execute a raw SQL query and return every row
    ///
    /// # Errors
    /// Returns an error if osquery is not available, the query fails, or JSON parsing fails.
    #[instrument(skip(self, sql), fields(query = %sql))]
    pub async fn query_raw(&self, sql: &str) -> Result<Vec<Row>, InventoryError> {
        debug!(executor = self.executor.executor_type(), "executing osquery");

        let args = vec!["--json".to_string(), sql.to_string()];
        let result = match self.timeout {
            Some(timeout) => {
                self.executor
                    .run_with_timeout(&self.binary, &args, timeout)
                    .await
            }
            None => self.executor.run(&self.binary, &args).await,
        }
        .map_err(|e| match e {
            ExecError::NotFound(program) => InventoryError::OsqueryNotFound(program),
            ExecError::Timeout { timeout, .. } => InventoryError::Timeout(timeout),
            other => InventoryError::ExecutionError(other.to_string()),
        })?;

        if !result.success() {
            return Err(classify_failure(sql, result.failure_message()));
        }

        let rows = parse_rows(&result.stdout)?;

        debug!(rows = rows.len(), "query completed");

        Ok(rows)
    }
}

#[async_trait]
impl InventorySource for OsqueryClient {
    async fn query_row(&self, query: &Query) -> Result<Row, InventoryError> {
        single_row(self.query_raw(&query.build()).await?)
    }
}

/// Turn an osquery error message into the matching inventory error
pub(crate) fn classify_failure(sql: &str, message: String) -> InventoryError {
    if message.contains("no such table") {
        let table = extract_table_name(sql).unwrap_or_else(|| "unknown".to_string());
        return InventoryError::TableNotAvailable(table);
    }
    if message.contains("syntax error") {
        return InventoryError::SqlSyntax(message);
    }
    InventoryError::QueryFailed(message)
}

/// Parse `osqueryi --json` output into string rows
///
/// Newer osquery versions emit integer columns as JSON numbers; those are
/// flattened back to their string form.
fn parse_rows(stdout: &str) -> Result<Vec<Row>, InventoryError> {
    let json: Vec<Map<String, Value>> =
        serde_json::from_str(stdout).map_err(|e| InventoryError::ParseError(e.to_string()))?;

    Ok(json
        .into_iter()
        .map(|object| {
            object
                .into_iter()
                .map(|(column, value)| {
                    let value = match value {
                        Value::String(s) => s,
                        Value::Null => String::new(),
                        other => other.to_string(),
                    };
                    (column, value)
                })
                .collect()
        })
        .collect())
}

/// Extract table name from SQL query (simple heuristic)
fn extract_table_name(sql: &str) -> Option<String> {
    let sql_lower = sql.to_lowercase();
    let pos = sql_lower.find("from ")?;
    let after_from = &sql[pos + 5..];
    let end = after_from
        .find(|c: char| c.is_whitespace() || c == ';')
        .unwrap_or(after_from.len());
    Some(after_from[..end].trim().to_string())
}
