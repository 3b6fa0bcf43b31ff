//! The effigy result row

use effigy_api::{AdvisoryRequest, AdvisoryResponse};
use serde::Serialize;

use crate::table::TableRow;

/// Status reported for every version column
///
/// No comparison between current and latest versions is made yet.
pub const STATUS_SUCCESS: &str = "success";

/// Column names, in table order
pub const COLUMNS: [&str; 9] = [
    "latest_efi_version",
    "efi_version",
    "efi_version_status",
    "latest_os_version",
    "os_version",
    "os_version_status",
    "latest_build_number",
    "build_number",
    "build_number_status",
];

/// One row of the effigy table
///
/// Field order matches [`COLUMNS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub latest_efi_version: String,
    pub efi_version: String,
    pub efi_version_status: String,
    pub latest_os_version: String,
    pub os_version: String,
    pub os_version_status: String,
    pub latest_build_number: String,
    pub build_number: String,
    pub build_number_status: String,
}

impl ResultRow {
    /// Pair the current values sent to the service with its advisories
    #[must_use]
    pub fn assemble(request: &AdvisoryRequest, response: &AdvisoryResponse) -> Self {
        Self {
            latest_efi_version: response.latest_efi_version.msg.clone(),
            efi_version: request.rom_version.clone(),
            efi_version_status: STATUS_SUCCESS.to_string(),
            latest_os_version: response.latest_os_version.msg.clone(),
            os_version: request.os_version.clone(),
            os_version_status: STATUS_SUCCESS.to_string(),
            latest_build_number: response.latest_build_number.msg.clone(),
            build_number: request.build_number.clone(),
            build_number_status: STATUS_SUCCESS.to_string(),
        }
    }

    /// `(column, value)` pairs in table order
    #[must_use]
    pub fn values(&self) -> [(&'static str, &str); 9] {
        [
            (COLUMNS[0], self.latest_efi_version.as_str()),
            (COLUMNS[1], self.efi_version.as_str()),
            (COLUMNS[2], self.efi_version_status.as_str()),
            (COLUMNS[3], self.latest_os_version.as_str()),
            (COLUMNS[4], self.os_version.as_str()),
            (COLUMNS[5], self.os_version_status.as_str()),
            (COLUMNS[6], self.latest_build_number.as_str()),
            (COLUMNS[7], self.build_number.as_str()),
            (COLUMNS[8], self.build_number_status.as_str()),
        ]
    }
}

impl From<ResultRow> for TableRow {
    fn from(row: ResultRow) -> Self {
        row.values()
            .into_iter()
            .map(|(column, value)| (column.to_string(), value.to_string()))
            .collect()
    }
}
