//! Native messaging host binary.
//!
//! The browser launches this with the extension origin as an
//! argument and owns stdin/stdout for the message channel, so all
//! logging goes to stderr.

use clap::Parser;
use rofi_native_messaging::diagnostics::FileSink;
use rofi_native_messaging::traits::CommandActivator;
use rofi_native_messaging::{run_host, HostConfig};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "rofi-native-messaging-host")]
#[command(about = "Native messaging host bridging a browser extension to rofi")]
struct Args {
    /// Configuration file (.toml or .json); defaults apply when
    /// absent.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level for stderr output (trace, debug, info, warn, error)
    #[arg(short, long, env = "ROFI_NM_LOG", default_value = "info")]
    log_level: String,

    /// Override the diagnostics log path from the configuration.
    #[arg(long)]
    diagnostics_log: Option<PathBuf>,

    /// Override the picker program from the configuration.
    #[arg(long)]
    picker: Option<String>,

    /// Extension origin passed by the browser; accepted and ignored.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    browser_args: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    // stdout carries message frames; logs must stay off it.
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => HostConfig::from_file(path)?,
        None => HostConfig::default(),
    };
    if let Some(path) = args.diagnostics_log {
        config.diagnostics_log = path;
    }
    if let Some(picker) = args.picker {
        config.picker.program = picker;
    }
    config.validate()?;

    tracing::info!(
        picker = %config.picker.program,
        max_message_size = config.max_message_size,
        origin = ?args.browser_args,
        "starting native messaging host"
    );

    let diagnostics = Arc::new(FileSink::new(config.diagnostics_log.clone()));
    let activator = Arc::new(CommandActivator::from_config(&config.activation));

    run_host(config, activator, diagnostics).await?;
    Ok(())
}
