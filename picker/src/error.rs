//! Error types for subprocess invocation.

use std::io;

/// Result type for subprocess operations.
pub type PickerResult<T> = Result<T, PickerError>;

/// Errors raised while spawning or talking to an external process.
///
/// A non-zero exit status is deliberately NOT an error: callers
/// interpret exit codes themselves (rofi uses code 10 for its custom
/// keybinding, for example). Only OS-level failures end up here.
#[derive(Debug, thiserror::Error)]
pub enum PickerError {
    /// The executable could not be started (not found, not executable,
    /// fork/exec failure).
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Underlying OS error
        source: io::Error,
    },

    /// The process started but the pipe to or from it broke. Covers a
    /// child that exits before consuming its input.
    #[error("pipe to '{program}' failed: {source}")]
    Pipe {
        /// Program on the other end of the pipe
        program: String,
        /// Underlying OS error
        source: io::Error,
    },
}

impl PickerError {
    pub(crate) fn spawn(program: &str, source: io::Error) -> Self {
        Self::Spawn {
            program: program.to_string(),
            source,
        }
    }

    pub(crate) fn pipe(program: &str, source: io::Error) -> Self {
        Self::Pipe {
            program: program.to_string(),
            source,
        }
    }
}
