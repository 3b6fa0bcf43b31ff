//! Request types for the advisory API

use serde::{Deserialize, Serialize};

/// Body of a `POST /apple/oneshot` call
///
/// Every field is sent as a string, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryRequest {
    /// Logic board identifier (`Mac-...`)
    pub board_id: String,
    /// SMC firmware version
    #[serde(rename = "smc_ver")]
    pub smc_version: String,
    /// OS build number
    #[serde(rename = "build_num")]
    pub build_number: String,
    /// Boot ROM (EFI) version
    #[serde(rename = "rom_ver")]
    pub rom_version: String,
    /// Hardware model
    #[serde(rename = "hw_ver")]
    pub hardware_version: String,
    /// OS version
    #[serde(rename = "os_ver")]
    pub os_version: String,
    /// Hardware UUID of the machine
    #[serde(rename = "sys_uuid")]
    pub system_uuid: String,
    /// Primary network interface MAC address
    #[serde(rename = "mac_addr")]
    pub mac_address: String,
    /// Anonymized machine identifier
    pub hashed_uuid: String,
}
