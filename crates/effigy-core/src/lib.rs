//! effigy-core: the effigy table
//!
//! Turns collected host facts into an advisory request, asks the advisory
//! service for the latest versions and reports both as one table row.

pub mod effigy;
pub mod error;
pub mod placeholders;
pub mod request;
pub mod row;
pub mod table;

pub use effigy::{EXTENSION_NAME, Effigy, TABLE_NAME, advise};
pub use error::CoreError;
pub use placeholders::{StaticPlaceholders, UnsourcedFieldProvider, UnsourcedFields};
pub use request::build_request;
pub use row::{COLUMNS, ResultRow, STATUS_SUCCESS};
pub use table::{ColumnDefinition, ColumnType, QueryContext, TablePlugin, TableRow};
