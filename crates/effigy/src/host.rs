//! One-shot table host
//!
//! Runs a registered table once outside osquery and writes the result the
//! way `osqueryi --json` prints it.

use std::io::Write;

use effigy_core::{ColumnDefinition, QueryContext, TablePlugin, TableRow};
use eyre::{Result, eyre};
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use tracing::{error, info, instrument};

/// Registry of table plugins for one extension
pub struct OneShotHost {
    extension: String,
    tables: Vec<Box<dyn TablePlugin>>,
}

impl OneShotHost {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            tables: Vec::new(),
        }
    }

    /// Register a table plugin
    pub fn register(&mut self, table: Box<dyn TablePlugin>) {
        info!(extension = %self.extension, table = table.name(), "registered table");
        self.tables.push(table);
    }

    fn table(&self, name: &str) -> Result<&dyn TablePlugin> {
        self.tables
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
            .ok_or_else(|| eyre!("no table named {name} in {}", self.extension))
    }

    /// Write a table's column definitions as JSON
    ///
    /// # Errors
    /// Returns error if the table is unknown or writing fails
    pub fn write_schema(&self, name: &str, out: &mut impl Write) -> Result<()> {
        let columns = self.table(name)?.columns();
        serde_json::to_writer_pretty(&mut *out, &columns)?;
        writeln!(out)?;
        Ok(())
    }

    /// Generate a table and write its rows as a JSON array
    ///
    /// Nothing is written when generation fails.
    ///
    /// # Errors
    /// Returns error if the table is unknown, generation fails or writing fails
    #[instrument(skip(self, context, out))]
    pub async fn write_rows(
        &self,
        name: &str,
        context: &QueryContext,
        out: &mut impl Write,
    ) -> Result<()> {
        let table = self.table(name)?;
        let columns = table.columns();

        let rows = table.generate(context).await.map_err(|e| {
            error!(error = %e, "table generation failed");
            e
        })?;

        let ordered: Vec<OrderedRow<'_>> = rows
            .iter()
            .map(|row| OrderedRow {
                columns: &columns,
                row,
            })
            .collect();

        serde_json::to_writer_pretty(&mut *out, &ordered)?;
        writeln!(out)?;
        info!(rows = rows.len(), "table generated");
        Ok(())
    }
}

/// Serializes a row with its columns in schema order
struct OrderedRow<'a> {
    columns: &'a [ColumnDefinition],
    row: &'a TableRow,
}

impl Serialize for OrderedRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for column in self.columns {
            let value = self.row.get(&column.name).map_or("", String::as_str);
            map.serialize_entry(&column.name, value)?;
        }
        map.end()
    }
}
