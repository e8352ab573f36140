//! Subprocess plumbing for the native-messaging bridge.
//!
//! Every external collaborator of the host is an opaque subprocess:
//! the rofi picker, the window-manager command interface, and the
//! copy/open utilities. This crate owns spawning them with piped
//! stdio so the host's own stdin/stdout, which carry protocol
//! frames, are never inherited by a child.

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod error;

pub use error::{PickerError, PickerResult};

use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};

/// Captured result of a finished subprocess.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Everything the process wrote to its stdout, decoded as UTF-8
    /// (lossy). Not trimmed; callers decide what whitespace means.
    pub stdout: String,

    /// Exit code. `-1` when the process was terminated by a signal.
    pub status: i32,
}

impl CommandOutput {
    /// The output with surrounding whitespace removed, which is what
    /// most callers compare against their option list.
    pub fn trimmed(&self) -> &str {
        self.stdout.trim()
    }
}

/// Run a program, feed `input` to its stdin, and wait for it to exit.
///
/// Stdin is closed after the write so line-oriented tools like rofi
/// see end-of-input. Blocks (asynchronously) until the process exits,
/// which for an interactive picker means until the user makes a
/// selection or dismisses it.
pub async fn run_with_input(
    program: &str,
    args: &[String],
    input: &str,
) -> PickerResult<CommandOutput> {
    tracing::debug!(program, ?args, input_len = input.len(), "spawning with piped stdin");

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| PickerError::spawn(program, e))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(input.as_bytes())
            .await
            .map_err(|e| PickerError::pipe(program, e))?;
        // Dropped here: the child sees EOF on its stdin.
    }

    collect(program, child).await
}

/// Run a program with no input and wait for it to exit.
///
/// Used for commands invoked purely by name, such as the window
/// activation call.
pub async fn run(program: &str, args: &[String]) -> PickerResult<CommandOutput> {
    tracing::debug!(program, ?args, "spawning");

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| PickerError::spawn(program, e))?;

    collect(program, child).await
}

/// Invoke a fire-and-forget utility, optionally feeding it input.
///
/// Output and exit status are discarded; the utility's value is its
/// side effect (clipboard copy, file open). Spawn and pipe failures
/// are still reported so the caller can log them.
pub async fn feed_utility(
    program: &str,
    args: &[String],
    input: Option<&str>,
) -> PickerResult<()> {
    tracing::debug!(program, ?args, has_input = input.is_some(), "spawning utility");

    let mut child = Command::new(program)
        .args(args)
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| PickerError::spawn(program, e))?;

    if let Some(data) = input {
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(data.as_bytes())
                .await
                .map_err(|e| PickerError::pipe(program, e))?;
        }
    }

    // Reap the child; its status is not interesting.
    let _ = child.wait().await.map_err(|e| PickerError::pipe(program, e))?;
    Ok(())
}

async fn collect(program: &str, child: Child) -> PickerResult<CommandOutput> {
    let output = child
        .wait_with_output()
        .await
        .map_err(|e| PickerError::pipe(program, e))?;

    let status = output.status.code().unwrap_or(-1);
    tracing::debug!(program, status, stdout_len = output.stdout.len(), "subprocess finished");

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[tokio::test]
    async fn echoes_selected_line_back() {
        // Acts like a picker that always chooses the second line.
        let out = run_with_input("sh", &sh("head -n 2 | tail -n 1"), "alpha\nbeta\ngamma")
            .await
            .unwrap();
        assert_eq!(out.trimmed(), "beta");
        assert_eq!(out.status, 0);
    }

    #[tokio::test]
    async fn nonzero_exit_is_data_not_error() {
        let out = run_with_input("sh", &sh("cat > /dev/null; printf hit; exit 10"), "x\ny")
            .await
            .unwrap();
        assert_eq!(out.trimmed(), "hit");
        assert_eq!(out.status, 10);
    }

    #[tokio::test]
    async fn missing_executable_reports_spawn_error() {
        let err = run_with_input("definitely-not-a-real-binary-7f3a", &[], "")
            .await
            .unwrap_err();
        assert!(matches!(err, PickerError::Spawn { .. }));
    }

    #[tokio::test]
    async fn run_without_input_captures_output() {
        let out = run("sh", &sh("printf activated")).await.unwrap();
        assert_eq!(out.trimmed(), "activated");
        assert_eq!(out.status, 0);
    }

    #[tokio::test]
    async fn feed_utility_delivers_input() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("clip.txt");
        let script = format!("cat > {}", target.display());

        feed_utility("sh", &sh(&script), Some("copied payload"))
            .await
            .unwrap();

        let written = std::fs::read_to_string(&target).unwrap();
        assert_eq!(written, "copied payload");
    }

    #[tokio::test]
    async fn feed_utility_ignores_exit_status() {
        feed_utility("sh", &sh("exit 3"), None).await.unwrap();
    }

    #[tokio::test]
    async fn raw_stdout_preserves_trailing_newline() {
        let out = run("sh", &sh("printf 'line\\n'")).await.unwrap();
        assert_eq!(out.stdout, "line\n");
        assert_eq!(out.trimmed(), "line");
    }
}
