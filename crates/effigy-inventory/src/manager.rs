//! Inventory read through a running osquery's extension manager
//!
//! The extension socket osquery hands to an extension also accepts
//! `query` calls, so facts come from the same daemon that hosts the table.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use osquery_rust_ng::prelude::*;
use tracing::{debug, instrument};

use crate::error::InventoryError;
use crate::osquery::classify_failure;
use crate::query::Query;
use crate::source::{InventorySource, Row, single_row};

/// [`InventorySource`] backed by the extension manager's Thrift `query` call
///
/// Queries are serialized over one connection.
pub struct ExtensionManagerSource {
    client: Arc<Mutex<Client>>,
    socket: PathBuf,
    timeout: Option<Duration>,
}

impl ExtensionManagerSource {
    /// Connect to the extension manager listening on `socket`
    ///
    /// # Errors
    /// Returns [`InventoryError::Connect`] if the socket cannot be opened.
    pub fn connect(socket: impl Into<PathBuf>) -> Result<Self, InventoryError> {
        let socket = socket.into();
        let client = Client::new(&socket.to_string_lossy(), Duration::default()).map_err(|e| {
            InventoryError::Connect {
                socket: socket.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        debug!(socket = %socket.display(), "connected to extension manager");

        Ok(Self {
            client: Arc::new(Mutex::new(client)),
            socket,
            timeout: None,
        })
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

    /// Extension manager socket path
    #[must_use]
    pub fn socket(&self) -> &Path {
        &self.socket
    }

    /// Execute a raw SQL query and return every row
    ///
    /// # Errors
    /// Returns an error if the call fails, osquery reports a failure or the
    /// timeout elapses.
    #[instrument(skip(self, sql), fields(query = %sql))]
    pub async fn query_raw(&self, sql: &str) -> Result<Vec<Row>, InventoryError> {
        let client = Arc::clone(&self.client);
        let statement = sql.to_string();

        let call = tokio::task::spawn_blocking(move || {
            let mut client = client
                .lock()
                .map_err(|_| InventoryError::ExecutionError("extension manager client poisoned".into()))?;
            client
                .query(statement)
                .map_err(|e| InventoryError::ExecutionError(e.to_string()))
        });

        let joined = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, call)
                .await
                .map_err(|_| InventoryError::Timeout(timeout))?,
            None => call.await,
        };
        let response = joined.map_err(|e| InventoryError::ExecutionError(e.to_string()))??;

        let rows = rows_from_response(sql, response)?;
        debug!(rows = rows.len(), "query completed");
        Ok(rows)
    }
}

#[async_trait]
impl InventorySource for ExtensionManagerSource {
    async fn query_row(&self, query: &Query) -> Result<Row, InventoryError> {
        single_row(self.query_raw(&query.build()).await?)
    }
}

/// Rows of a successful extension response; a non-zero status is an error
fn rows_from_response(sql: &str, response: ExtensionResponse) -> Result<Vec<Row>, InventoryError> {
    let status = response.status.unwrap_or_default();
    if status.code.unwrap_or_default() != 0 {
        let message = status
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("status {}", status.code.unwrap_or_default()));
        return Err(classify_failure(sql, message));
    }

    Ok(response
        .response
        .unwrap_or_default()
        .into_iter()
        .map(|row| row.into_iter().collect())
        .collect())
}
