//! Configuration management for the native messaging host.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the native messaging host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Maximum frame payload size in bytes (Chrome caps native
    /// messages at 1MB).
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,

    /// Append-only diagnostics log written by the failure-containment
    /// path. Separate from tracing output.
    #[serde(default = "default_diagnostics_log")]
    pub diagnostics_log: PathBuf,

    /// Interactive picker invocation.
    #[serde(default)]
    pub picker: PickerConfig,

    /// Fire-and-forget side-effect utilities.
    #[serde(default)]
    pub utilities: UtilityConfig,

    /// Window activation command.
    #[serde(default)]
    pub activation: ActivationConfig,
}

/// Interactive picker invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickerConfig {
    /// Picker executable name or path.
    pub program: String,

    /// Arguments that put the picker in list-selection mode. Extra
    /// per-request arguments from the extension are appended after
    /// these.
    pub base_args: Vec<String>,
}

/// Copy and open utility argv vectors. Element 0 is the program, the
/// rest are its leading arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UtilityConfig {
    /// Clipboard-copy utility; the payload is fed to its stdin.
    pub copy: Vec<String>,

    /// Opener utility; the target is appended as a final argument.
    pub open: Vec<String>,
}

/// Window activation command: brings the browser window forward after
/// a successful pick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationConfig {
    /// Window manager command interface executable.
    pub program: String,

    /// Arguments naming the remote call to invoke.
    pub args: Vec<String>,
}

fn default_max_message_size() -> usize {
    1_048_576
}

fn default_diagnostics_log() -> PathBuf {
    PathBuf::from("/tmp/rofi_script.log")
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            max_message_size: default_max_message_size(),
            diagnostics_log: default_diagnostics_log(),
            picker: PickerConfig::default(),
            utilities: UtilityConfig::default(),
            activation: ActivationConfig::default(),
        }
    }
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            program: "rofi".to_string(),
            base_args: vec!["-dmenu".to_string()],
        }
    }
}

impl Default for UtilityConfig {
    fn default() -> Self {
        Self {
            copy: vec![
                "xclip".to_string(),
                "-selection".to_string(),
                "clipboard".to_string(),
            ],
            open: vec!["xdg-open".to_string()],
        }
    }
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self {
            program: "qtile".to_string(),
            args: vec![
                "cmd-obj".to_string(),
                "-o".to_string(),
                "group".to_string(),
                "f".to_string(),
                "-f".to_string(),
                "toscreen".to_string(),
            ],
        }
    }
}

impl UtilityConfig {
    /// Split the copy argv into program and arguments.
    pub fn copy_argv(&self) -> Option<(&str, &[String])> {
        split_argv(&self.copy)
    }

    /// Split the open argv into program and arguments.
    pub fn open_argv(&self) -> Option<(&str, &[String])> {
        split_argv(&self.open)
    }
}

fn split_argv(argv: &[String]) -> Option<(&str, &[String])> {
    let (program, args) = argv.split_first()?;
    Some((program.as_str(), args))
}

impl HostConfig {
    /// Load configuration from a file.
    ///
    /// TOML when the extension says so, JSON otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let config = if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        Ok(config)
    }

    /// Save configuration to a file, format chosen by extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();

        let content = if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::to_string_pretty(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_message_size == 0 {
            return Err(anyhow::anyhow!("max_message_size must be greater than 0"));
        }

        if self.max_message_size > 1_048_576 {
            return Err(anyhow::anyhow!(
                "max_message_size cannot exceed the browser's 1MB limit"
            ));
        }

        if self.picker.program.is_empty() {
            return Err(anyhow::anyhow!("picker.program must not be empty"));
        }

        if self.utilities.copy.is_empty() {
            return Err(anyhow::anyhow!("utilities.copy argv must not be empty"));
        }

        if self.utilities.open.is_empty() {
            return Err(anyhow::anyhow!("utilities.open argv must not be empty"));
        }

        if self.activation.program.is_empty() {
            return Err(anyhow::anyhow!("activation.program must not be empty"));
        }

        Ok(())
    }
}
