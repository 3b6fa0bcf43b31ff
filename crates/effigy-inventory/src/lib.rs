//! effigy-inventory: osquery integration
//!
//! Reads the identity facts effigy reports on (hardware model, OS build,
//! firmware versions) from the local osquery tables, either through the
//! extension manager socket or by running `osqueryi`.

pub mod collector;
pub mod error;
pub mod manager;
pub mod osquery;
pub mod query;
pub mod source;
pub mod types;

pub use collector::FactCollector;
pub use error::InventoryError;
pub use manager::ExtensionManagerSource;
pub use osquery::OsqueryClient;
pub use query::Query;
pub use source::{InventorySource, Row};
pub use types::{FactQuery, HostFacts};
