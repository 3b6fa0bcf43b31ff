//! Table plugin contract with the osquery host

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A generated row as the host sees it: column name to value
pub type TableRow = BTreeMap<String, String>;

/// osquery column types the effigy table uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    Text,
}

/// A column in a table plugin's schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnDefinition {
    /// A `TEXT` column
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: ColumnType::Text,
        }
    }
}

/// What the host knows about the query being executed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryContext {
    /// Constraint document osquery sends with the request, as JSON.
    /// Empty when the table runs outside osquery.
    pub constraints: String,
}

/// A table the host can register and query
#[async_trait]
pub trait TablePlugin: Send + Sync {
    /// Table name used in SQL
    fn name(&self) -> &str;

    /// Table schema
    fn columns(&self) -> Vec<ColumnDefinition>;

    /// Produce the rows for one query execution
    async fn generate(&self, context: &QueryContext) -> Result<Vec<TableRow>, CoreError>;
}
