//! effigy-client: advisory service client
//!
//! Sends the host's identity facts to the efigy.io advisory service and
//! decodes the "latest version" advisories it answers with.
//!
//! # Example
//!
//! ```no_run
//! use effigy_api::AdvisoryRequest;
//! use effigy_client::AdvisoryClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AdvisoryClient::new()?;
//! let request = AdvisoryRequest {
//!     build_number: "19H2".into(),
//!     os_version: "10.15.7".into(),
//!     ..Default::default()
//! };
//!
//! let response = client.call(&request).await?;
//! println!("latest build: {}", response.latest_build_number.msg);
//! # Ok(())
//! # }
//! ```

pub mod advisory;
pub mod diagnostics;
pub mod error;
pub mod transport;

pub use advisory::{AdvisoryClient, DEFAULT_ENDPOINT};
pub use diagnostics::{DiagnosticSink, MemorySink, StderrSink};
pub use error::{ClientError, Result};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
