//! effigy-api: advisory service wire types
//!
//! Request and response bodies exchanged with the efigy.io "oneshot" endpoint.

pub mod requests;
pub mod responses;

pub use requests::AdvisoryRequest;
pub use responses::{AdvisoryMessage, AdvisoryResponse};
