//! Error types for effigy-inventory

use std::time::Duration;

use thiserror::Error;

use crate::types::FactQuery;

/// Errors that can occur during inventory operations
#[derive(Error, Debug, Clone)]
pub enum InventoryError {
    /// osquery is not installed on this system
    #[error("osquery not found: {0}")]
    OsqueryNotFound(String),

    /// SQL query execution failed
    #[error("query execution failed: {0}")]
    QueryFailed(String),

    /// SQL syntax error
    #[error("SQL syntax error: {0}")]
    SqlSyntax(String),

    /// Failed to parse query results
    #[error("JSON parse error: {0}")]
    ParseError(String),

    /// Local execution error
    #[error("execution error: {0}")]
    ExecutionError(String),

    /// Table not available on this system
    #[error("table not available: {0}")]
    TableNotAvailable(String),

    /// Query timeout
    #[error("query timeout after {0:?}")]
    Timeout(Duration),

    /// Could not reach the osquery extension manager
    #[error("connect to extension manager at {socket}: {reason}")]
    Connect {
        /// Extension manager socket path
        socket: String,
        /// Underlying connection error
        reason: String,
    },

    /// A point query returned something other than one row
    #[error("expected 1 row, got {0}")]
    UnexpectedRowCount(usize),

    /// One of the fact queries failed
    #[error("query {query} table: {source}")]
    Fact {
        /// Which fact query failed
        query: FactQuery,
        /// Why it failed
        #[source]
        source: Box<InventoryError>,
    },
}

impl InventoryError {
    /// Attach the failing fact query to an error
    #[must_use]
    pub fn for_fact(self, query: FactQuery) -> Self {
        InventoryError::Fact {
            query,
            source: Box::new(self),
        }
    }

    /// The fact query this error came from, if any
    #[must_use]
    pub fn fact_query(&self) -> Option<FactQuery> {
        match self {
            InventoryError::Fact { query, .. } => Some(*query),
            _ => None,
        }
    }
}
