//! Advisory request construction

use effigy_api::AdvisoryRequest;
use effigy_inventory::HostFacts;

use crate::placeholders::UnsourcedFields;

/// Build the advisory request from collected facts
///
/// Values are copied verbatim, empty strings included.
#[must_use]
pub fn build_request(facts: &HostFacts, unsourced: UnsourcedFields) -> AdvisoryRequest {
    AdvisoryRequest {
        board_id: unsourced.board_id,
        smc_version: facts.smc.value.clone(),
        build_number: facts.os_version.build.clone(),
        rom_version: facts.platform_info.version.clone(),
        hardware_version: facts.system_info.hardware_model.clone(),
        os_version: facts.os_version.version.clone(),
        system_uuid: unsourced.system_uuid,
        mac_address: unsourced.mac_address,
        hashed_uuid: unsourced.hashed_uuid,
    }
}
