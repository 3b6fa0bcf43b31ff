//! effigy-exec: local command execution
//!
//! Runs helper programs (such as `osqueryi`) on the local machine behind a
//! trait, so callers can substitute a scripted executor in tests.

pub mod error;
pub mod local;
pub mod result;
pub mod traits;

pub use error::ExecError;
pub use local::LocalExecutor;
pub use result::CommandOutput;
pub use traits::CommandExecutor;
