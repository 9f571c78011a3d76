//! Structured logging setup.
//!
//! The codec only emits `tracing` events; binaries embedding it call
//! [`init_logging`] once at startup to install a subscriber. `RUST_LOG`
//! overrides the configured level when set.

use crate::config::LoggingConfig;
use crate::error::{CodecError, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber (plain or JSON) for `config`.
///
/// # Errors
/// `ConfigError` if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string().to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| CodecError::ConfigError(format!("Failed to install logger: {e}")))?;

    info!(app = %config.app_name, level = %config.log_level, "Logging initialized");
    Ok(())
}
