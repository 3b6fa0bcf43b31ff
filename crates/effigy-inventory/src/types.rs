//! Fact type definitions

use std::fmt;

use crate::query::{Query, queries};
use crate::source::Row;

/// The four point queries behind a fact collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactQuery {
    /// `system_info` table
    SystemInfo,
    /// `os_version` table
    OsVersion,
    /// `smc_keys` table, filtered to the SMC version key
    SmcKeys,
    /// `platform_info` table
    PlatformInfo,
}

impl FactQuery {
    /// All fact queries, in the order they are issued
    pub const ALL: [FactQuery; 4] = [
        FactQuery::SystemInfo,
        FactQuery::OsVersion,
        FactQuery::SmcKeys,
        FactQuery::PlatformInfo,
    ];

    /// Table name, also used to identify the query in errors
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            FactQuery::SystemInfo => "system_info",
            FactQuery::OsVersion => "os_version",
            FactQuery::SmcKeys => "smc_keys",
            FactQuery::PlatformInfo => "platform_info",
        }
    }

    /// The query to run
    #[must_use]
    pub fn query(self) -> Query {
        match self {
            FactQuery::SystemInfo => queries::system_info(),
            FactQuery::OsVersion => queries::os_version(),
            FactQuery::SmcKeys => queries::smc_version(),
            FactQuery::PlatformInfo => queries::platform_info(),
        }
    }
}

impl fmt::Display for FactQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Facts read from `system_info`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemInfoFacts {
    /// Hardware model identifier, e.g. `MacBookPro15,1`
    pub hardware_model: String,
}

/// Facts read from `os_version`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsVersionFacts {
    /// OS build number, e.g. `19H2`
    pub build: String,
    /// OS version, e.g. `10.15.7`
    pub version: String,
}

/// Facts read from `smc_keys`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmcFacts {
    /// SMC firmware version
    pub value: String,
}

/// Facts read from `platform_info`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformInfoFacts {
    /// Boot ROM (EFI) version
    pub version: String,
}

/// Every fact effigy needs about the local machine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostFacts {
    /// From `system_info`
    pub system_info: SystemInfoFacts,
    /// From `os_version`
    pub os_version: OsVersionFacts,
    /// From `smc_keys`
    pub smc: SmcFacts,
    /// From `platform_info`
    pub platform_info: PlatformInfoFacts,
}

/// Take a column out of a row; absent columns read as empty
fn take(row: &mut Row, column: &str) -> String {
    row.remove(column).unwrap_or_default()
}

impl From<Row> for SystemInfoFacts {
    fn from(mut row: Row) -> Self {
        Self {
            hardware_model: take(&mut row, "hardware_model"),
        }
    }
}

impl From<Row> for OsVersionFacts {
    fn from(mut row: Row) -> Self {
        Self {
            build: take(&mut row, "build"),
            version: take(&mut row, "version"),
        }
    }
}

impl From<Row> for SmcFacts {
    fn from(mut row: Row) -> Self {
        Self {
            value: take(&mut row, "value"),
        }
    }
}

impl From<Row> for PlatformInfoFacts {
    fn from(mut row: Row) -> Self {
        Self {
            version: take(&mut row, "version"),
        }
    }
}
