//! Fact collection

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::error::InventoryError;
use crate::source::{InventorySource, Row};
use crate::types::{FactQuery, HostFacts};

/// Fact collector
///
/// Issues the fixed fact queries one after another. Any failing query
/// aborts the whole collection; there are no partial results.
pub struct FactCollector {
    source: Arc<dyn InventorySource>,
}

impl FactCollector {
    /// Create a new fact collector
    pub fn new(source: Arc<dyn InventorySource>) -> Self {
        Self { source }
    }

    async fn fetch(&self, query: FactQuery) -> Result<Row, InventoryError> {
        debug!(%query, "collecting fact");
        self.source
            .query_row(&query.query())
            .await
            .map_err(|e| e.for_fact(query))
    }

    /// Collect every fact
    ///
    /// # Errors
    /// Returns [`InventoryError::Fact`] naming the first query that failed.
    #[instrument(skip(self))]
    pub async fn collect(&self) -> Result<HostFacts, InventoryError> {
        let system_info = self.fetch(FactQuery::SystemInfo).await?.into();
        let os_version = self.fetch(FactQuery::OsVersion).await?.into();
        let smc = self.fetch(FactQuery::SmcKeys).await?.into();
        let platform_info = self.fetch(FactQuery::PlatformInfo).await?.into();

        info!("fact collection completed");

        Ok(HostFacts {
            system_info,
            os_version,
            smc,
            platform_info,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::query::Query;

    /// Answers by table name and records the order of queries
    #[derive(Default)]
    struct TableSource {
        tables: HashMap<&'static str, Row>,
        seen: Mutex<Vec<String>>,
    }

    impl TableSource {
        fn with(mut self, table: &'static str, pairs: &[(&str, &str)]) -> Self {
            let row = pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect();
            self.tables.insert(table, row);
            self
        }

        fn complete() -> Self {
            Self::default()
                .with("system_info", &[("hardware_model", "MacBookPro15,1")])
                .with("os_version", &[("build", "19H2"), ("version", "10.15.7")])
                .with("smc_keys", &[("value", "1.23")])
                .with("platform_info", &[("version", "426.0.0.0.0")])
        }
    }

    #[async_trait]
    impl InventorySource for TableSource {
        async fn query_row(&self, query: &Query) -> Result<Row, InventoryError> {
            self.seen.lock().unwrap().push(query.build());
            self.tables
                .get(query.table())
                .cloned()
                .ok_or_else(|| InventoryError::TableNotAvailable(query.table().to_string()))
        }
    }

    #[tokio::test]
    async fn test_collect_maps_every_fact() {
        let collector = FactCollector::new(Arc::new(TableSource::complete()));

        let facts = collector.collect().await.unwrap();
        assert_eq!(facts.system_info.hardware_model, "MacBookPro15,1");
        assert_eq!(facts.os_version.build, "19H2");
        assert_eq!(facts.os_version.version, "10.15.7");
        assert_eq!(facts.smc.value, "1.23");
        assert_eq!(facts.platform_info.version, "426.0.0.0.0");
    }

    #[tokio::test]
    async fn test_queries_run_in_order() {
        let source = Arc::new(TableSource::complete());
        FactCollector::new(source.clone()).collect().await.unwrap();

        let seen = source.seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                "SELECT * FROM system_info",
                "SELECT * FROM os_version",
                "SELECT value FROM smc_keys WHERE key = 'RVBF'",
                "SELECT * FROM platform_info",
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_names_query_and_stops() {
        let source = Arc::new(
            TableSource::default()
                .with("system_info", &[("hardware_model", "MacBookPro15,1")])
                .with("os_version", &[("build", "19H2"), ("version", "10.15.7")])
                .with("platform_info", &[("version", "426.0.0.0.0")]),
        );

        let err = FactCollector::new(source.clone()).collect().await.unwrap_err();
        assert_eq!(err.fact_query(), Some(FactQuery::SmcKeys));
        assert!(err.to_string().contains("smc_keys"));

        // platform_info is never reached
        assert_eq!(source.seen.lock().unwrap().len(), 3);
    }
}
