//! Collaborator traits for the native messaging host.
//!
//! The window activation call is injected into the router as an
//! explicit dependency rather than reached through a module-level
//! singleton, so tests can substitute a recording fake.

use crate::config::ActivationConfig;
use async_trait::async_trait;

/// Brings the browser window to the foreground.
///
/// Invoked after every non-empty picker selection, before the result
/// is computed. The call is opaque: no arguments, no return value
/// consumed.
#[async_trait]
pub trait WindowActivator: Send + Sync + 'static {
    /// Perform the activation call.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote command cannot be invoked; the
    /// router contains it like any other handler failure.
    async fn activate(&self) -> anyhow::Result<()>;
}

/// Activator that shells out to the window manager's command
/// interface.
pub struct CommandActivator {
    program: String,
    args: Vec<String>,
}

impl CommandActivator {
    /// Build the activator from its configuration section.
    pub fn from_config(config: &ActivationConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
        }
    }
}

#[async_trait]
impl WindowActivator for CommandActivator {
    async fn activate(&self) -> anyhow::Result<()> {
        let output = rofi_picker::run(&self.program, &self.args).await?;
        tracing::debug!(program = %self.program, status = output.status, "activation call finished");
        Ok(())
    }
}
