//! Where error bodies from the advisory service end up

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

/// Receives the raw body of a failed advisory response.
///
/// Writes are best effort; a sink never fails the call it reports on.
pub trait DiagnosticSink: Send + Sync {
    fn write_body(&self, body: &[u8]);
}

/// Copies error bodies to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn write_body(&self, body: &[u8]) {
        let mut stderr = io::stderr().lock();
        if let Err(e) = stderr.write_all(body).and_then(|()| stderr.flush()) {
            debug!(error = %e, "failed to write diagnostic body");
        }
    }
}

/// Collects error bodies in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far
    #[must_use]
    pub fn contents(&self) -> Vec<u8> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DiagnosticSink for MemorySink {
    fn write_body(&self, body: &[u8]) {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(body);
    }
}
