//! Response types for the advisory API

use serde::{Deserialize, Deserializer, Serialize};

/// A single advisory message, `{"msg": "..."}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryMessage {
    /// Advisory text, usually a version or build number
    #[serde(default, deserialize_with = "null_as_default")]
    pub msg: String,
}

impl AdvisoryMessage {
    /// Create a message with the given text
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// Body of a successful `POST /apple/oneshot` response
///
/// The service always answers with these three advisories. An absent
/// advisory decodes as an empty message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryResponse {
    /// Latest EFI firmware version for this board
    #[serde(default, deserialize_with = "null_as_default")]
    pub latest_efi_version: AdvisoryMessage,
    /// Latest OS version
    #[serde(default, deserialize_with = "null_as_default")]
    pub latest_os_version: AdvisoryMessage,
    /// Latest OS build number
    #[serde(default, deserialize_with = "null_as_default")]
    pub latest_build_number: AdvisoryMessage,
}

/// Read `null` the same as an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
