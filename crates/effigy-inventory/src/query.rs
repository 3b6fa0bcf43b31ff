//! SQL query builder for osquery

use std::fmt;

/// SQL query builder
///
/// Only covers what the fact queries need: a column list, one table and
/// equality filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    select: Vec<String>,
    from: String,
    where_clauses: Vec<String>,
}

impl Query {
    /// Create a new `SELECT *` query for a table
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            select: vec!["*".to_string()],
            from: table.into(),
            where_clauses: Vec::new(),
        }
    }

    /// Select specific columns
    #[must_use]
    pub fn select(mut self, columns: &[&str]) -> Self {
        self.select = columns.iter().map(|c| (*c).to_string()).collect();
        self
    }

    /// Add a `column = 'value'` filter
    #[must_use]
    pub fn where_eq(mut self, column: &str, value: &str) -> Self {
        let escaped = value.replace('\'', "''");
        self.where_clauses.push(format!("{column} = '{escaped}'"));
        self
    }

    /// Table this query reads from
    #[must_use]
    pub fn table(&self) -> &str {
        &self.from
    }

    /// Build the SQL string
    #[must_use]
    pub fn build(&self) -> String {
        let mut sql = format!("SELECT {} FROM {}", self.select.join(", "), self.from);

        if !self.where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_clauses.join(" AND "));
        }

        sql
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

/// The fixed point queries effigy issues
pub mod queries {
    use super::Query;

    /// smc key holding the SMC firmware version
    pub const SMC_VERSION_KEY: &str = "RVBF";

    /// General system information (`hardware_model`)
    #[must_use]
    pub fn system_info() -> Query {
        Query::new("system_info")
    }

    /// OS version (`build`, `version`)
    #[must_use]
    pub fn os_version() -> Query {
        Query::new("os_version")
    }

    /// SMC firmware version (`value`)
    #[must_use]
    pub fn smc_version() -> Query {
        Query::new("smc_keys")
            .select(&["value"])
            .where_eq("key", SMC_VERSION_KEY)
    }

    /// Platform firmware information (`version`, the boot ROM version)
    #[must_use]
    pub fn platform_info() -> Query {
        Query::new("platform_info")
    }
}
