//! The effigy table plugin

use std::sync::Arc;

use async_trait::async_trait;
use effigy_client::AdvisoryClient;
use effigy_inventory::{FactCollector, HostFacts, InventorySource};
use tracing::{debug, info, instrument};

use crate::error::CoreError;
use crate::placeholders::{StaticPlaceholders, UnsourcedFieldProvider, UnsourcedFields};
use crate::request::build_request;
use crate::row::{COLUMNS, ResultRow};
use crate::table::{ColumnDefinition, QueryContext, TablePlugin, TableRow};

/// Table name registered with osquery
pub const TABLE_NAME: &str = "effigy";

/// Extension name registered with osquery
pub const EXTENSION_NAME: &str = "com.github.groob.effigy";

/// Ask the advisory service about `facts` and build the result row
///
/// Independent of how facts were gathered or how the host calls the table.
///
/// # Errors
/// Returns [`CoreError::Advisory`] if the advisory call fails.
pub async fn advise(
    facts: &HostFacts,
    unsourced: UnsourcedFields,
    client: &AdvisoryClient,
) -> Result<ResultRow, CoreError> {
    let request = build_request(facts, unsourced);
    let response = client.call(&request).await?;
    Ok(ResultRow::assemble(&request, &response))
}

/// The `effigy` table
///
/// Every query collects fresh facts and makes one advisory call; nothing is
/// kept between queries.
pub struct Effigy {
    collector: FactCollector,
    advisory: AdvisoryClient,
    unsourced: Arc<dyn UnsourcedFieldProvider>,
}

impl Effigy {
    /// Create the table over an inventory source and advisory client
    pub fn new(source: Arc<dyn InventorySource>, advisory: AdvisoryClient) -> Self {
        Self {
            collector: FactCollector::new(source),
            advisory,
            unsourced: Arc::new(StaticPlaceholders),
        }
    }

    /// Replace the provider of unsourced request fields
    #[must_use]
    pub fn with_unsourced_fields(mut self, provider: Arc<dyn UnsourcedFieldProvider>) -> Self {
        self.unsourced = provider;
        self
    }

    /// Values sent for the request fields not read from osquery
    pub fn unsourced_fields(&self) -> UnsourcedFields {
        self.unsourced.unsourced_fields()
    }

    /// The advisory client used for every query
    pub fn advisory(&self) -> &AdvisoryClient {
        &self.advisory
    }

    /// Collect facts, call the advisory service and build the row
    ///
    /// # Errors
    /// Returns [`CoreError::Inventory`] if any fact query fails, in which case
    /// the advisory service is not called, or [`CoreError::Advisory`].
    #[instrument(skip(self))]
    pub async fn generate_row(&self) -> Result<ResultRow, CoreError> {
        let facts = self.collector.collect().await?;
        debug!(?facts, "facts collected");

        let row = advise(&facts, self.unsourced_fields(), &self.advisory).await?;
        info!(
            latest_os_version = %row.latest_os_version,
            latest_build_number = %row.latest_build_number,
            "advisory received"
        );
        Ok(row)
    }
}

#[async_trait]
impl TablePlugin for Effigy {
    fn name(&self) -> &str {
        TABLE_NAME
    }

    fn columns(&self) -> Vec<ColumnDefinition> {
        COLUMNS.iter().map(|c| ColumnDefinition::text(*c)).collect()
    }

    /// Constraints in `context` are ignored; the table always has one row
    async fn generate(&self, context: &QueryContext) -> Result<Vec<TableRow>, CoreError> {
        if !context.constraints.is_empty() {
            debug!(constraints = %context.constraints, "ignoring query constraints");
        }
        let row = self.generate_row().await?;
        Ok(vec![row.into()])
    }
}
