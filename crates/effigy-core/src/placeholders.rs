//! Request fields that are not read from osquery yet

use serde::{Deserialize, Serialize};

/// Request fields not yet derived from inventory
///
/// Fields missing when deserializing fall back to [`StaticPlaceholders`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnsourcedFields {
    /// Logic board identifier
    pub board_id: String,
    /// Hardware UUID
    pub system_uuid: String,
    /// Primary interface MAC address
    pub mac_address: String,
    /// Hashed hardware UUID
    pub hashed_uuid: String,
}

/// Supplies the request fields effigy cannot read from osquery.
///
/// Swapping in a provider that reads real values requires no change to
/// the request builder.
pub trait UnsourcedFieldProvider: Send + Sync {
    fn unsourced_fields(&self) -> UnsourcedFields;
}

/// Fixed values sent until board id, UUIDs and MAC address are sourced
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticPlaceholders;

impl StaticPlaceholders {
    pub const BOARD_ID: &'static str = "Mac-66E35819EE2D0D05";
    pub const SYSTEM_UUID: &'static str = "12345678-1234-1234-1234-1234567890AB";
    pub const MAC_ADDRESS: &'static str = "b4:bf:b4:b1:b6:bc";
    pub const HASHED_UUID: &'static str = "foobar";
}

impl UnsourcedFieldProvider for StaticPlaceholders {
    fn unsourced_fields(&self) -> UnsourcedFields {
        UnsourcedFields {
            board_id: Self::BOARD_ID.to_string(),
            system_uuid: Self::SYSTEM_UUID.to_string(),
            mac_address: Self::MAC_ADDRESS.to_string(),
            hashed_uuid: Self::HASHED_UUID.to_string(),
        }
    }
}

impl Default for UnsourcedFields {
    fn default() -> Self {
        StaticPlaceholders.unsourced_fields()
    }
}

/// Explicit values, e.g. from a config file
impl UnsourcedFieldProvider for UnsourcedFields {
    fn unsourced_fields(&self) -> UnsourcedFields {
        self.clone()
    }
}
