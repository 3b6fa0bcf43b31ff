//! Core error types for effigy-core

use effigy_client::ClientError;
use effigy_inventory::InventoryError;
use thiserror::Error;

/// Errors that can occur while generating the effigy table
#[derive(Error, Debug)]
pub enum CoreError {
    /// Reading facts from osquery failed
    #[error("collect facts: {0}")]
    Inventory(#[from] InventoryError),

    /// The advisory service call failed
    #[error("call advisory API: {0}")]
    Advisory(#[from] ClientError),
}
