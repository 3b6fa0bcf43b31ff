//! osquery extension host
//!
//! Registers table plugins with the extension manager at the osquery socket
//! and serves them until osquery shuts the extension down.

use std::path::Path;
use std::sync::Arc;

use effigy_core::{ColumnType, CoreError, QueryContext, TablePlugin, TableRow};
use eyre::{Result, eyre};
use osquery_rust_ng::plugin::{ColumnDef, ColumnOptions, ColumnType as OsqueryColumnType, Plugin, ReadOnlyTable};
use osquery_rust_ng::prelude::*;
use tokio::runtime::Handle;
use tracing::{error, info, warn};

/// Request key osquery uses for the query's constraint document
const CONTEXT_KEY: &str = "context";

/// Exposes a [`TablePlugin`] through the osquery SDK's table interface
///
/// The SDK calls tables from its own threads; generation runs on the tokio
/// runtime behind `runtime`.
pub struct ExtensionTable {
    table: Arc<dyn TablePlugin>,
    runtime: Handle,
}

impl ExtensionTable {
    pub fn new(table: Arc<dyn TablePlugin>, runtime: Handle) -> Self {
        Self { table, runtime }
    }
}

impl ReadOnlyTable for ExtensionTable {
    fn name(&self) -> String {
        self.table.name().to_string()
    }

    fn columns(&self) -> Vec<ColumnDef> {
        self.table
            .columns()
            .iter()
            .map(|column| {
                let column_type = match column.column_type {
                    ColumnType::Text => OsqueryColumnType::Text,
                };
                ColumnDef::new(&column.name, column_type, ColumnOptions::DEFAULT)
            })
            .collect()
    }

    fn generate(&self, request: ExtensionPluginRequest) -> ExtensionResponse {
        let context = QueryContext {
            constraints: request.get(CONTEXT_KEY).cloned().unwrap_or_default(),
        };
        let result = self.runtime.block_on(self.table.generate(&context));
        if let Err(e) = &result {
            error!(table = self.table.name(), error = %e, "table generation failed");
        }
        response(result)
    }

    fn shutdown(&self) {
        info!(table = self.table.name(), "osquery requested shutdown");
    }
}

/// Status and rows osquery expects back from a generate call
///
/// A failed generation reports status 1 with the error text and no rows.
fn response(result: Result<Vec<TableRow>, CoreError>) -> ExtensionResponse {
    let (code, message, rows) = match result {
        Ok(rows) => (0, "OK".to_string(), rows),
        Err(e) => (1, e.to_string(), Vec::new()),
    };

    ExtensionResponse {
        status: Some(ExtensionStatus {
            code: Some(code),
            message: Some(message),
            uuid: None,
        }),
        response: Some(rows),
    }
}

/// Register `table` under `extension` with the manager at `socket` and serve
/// it until osquery stops the extension
///
/// Blocks the calling thread; run it off the async runtime.
///
/// # Errors
/// Returns error if registration fails or the server stops abnormally.
pub fn serve(extension: &str, socket: &Path, table: ExtensionTable) -> Result<()> {
    let socket = socket.to_string_lossy();
    let table_name = table.name();

    let mut server = Server::new(Some(extension), &socket)
        .map_err(|e| eyre!("register {extension} with {socket}: {e}"))?;
    server.register_plugin(Plugin::readonly_table(table));

    info!(extension, table = %table_name, socket = %socket, "serving table");
    server.run().map_err(|e| {
        warn!(error = %e, "extension server stopped");
        eyre!("extension server stopped: {e}")
    })
}
