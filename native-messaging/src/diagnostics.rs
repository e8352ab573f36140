//! Best-effort diagnostics sink.
//!
//! Contained handler failures are recorded here so they can be
//! inspected after the fact; the browser only ever sees an empty
//! result. The sink must never block or fail the session loop, so
//! every failure to write is itself swallowed.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// Append-only message recording capability.
pub trait DiagnosticsSink: Send + Sync + 'static {
    /// Record one message. Must not panic or block indefinitely.
    fn record(&self, message: &str);
}

/// File-backed sink: opens, appends one line, and closes on every
/// call, so a crash mid-session never loses the most recent entry.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Create a sink appending to `path`. The file is created on
    /// first write.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl DiagnosticsSink for FileSink {
    fn record(&self, message: &str) {
        let attempt = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| writeln!(file, "{message}"));

        if let Err(e) = attempt {
            // Diagnostics must never take the host down with them.
            tracing::warn!(path = %self.path.display(), error = %e, "failed to append diagnostics entry");
        }
    }
}

/// In-memory sink for tests.
#[derive(Default)]
pub struct MemorySink {
    entries: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl DiagnosticsSink for MemorySink {
    fn record(&self, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(message.to_string());
        }
    }
}
