//! Inventory source abstraction

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::InventoryError;
use crate::query::Query;

/// One result row: column name to string value
pub type Row = HashMap<String, String>;

/// Anything that can answer a point query against the osquery tables.
///
/// Implementations must return exactly one row or fail; the collector
/// treats anything else as a broken fact.
#[async_trait]
pub trait InventorySource: Send + Sync {
    /// Run `query` and return its single row
    async fn query_row(&self, query: &Query) -> Result<Row, InventoryError>;
}

/// The only row of a point query result
pub(crate) fn single_row(mut rows: Vec<Row>) -> Result<Row, InventoryError> {
    if rows.len() != 1 {
        return Err(InventoryError::UnexpectedRowCount(rows.len()));
    }
    Ok(rows.remove(0))
}
