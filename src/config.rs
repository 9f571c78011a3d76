//! # Configuration Management
//!
//! Centralized configuration for the TFTP codec and option negotiation.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment overrides via `from_env()` (`TFTP_WIRE_*` variables)
//!
//! ## Limits
//! - Block sizes follow RFC 2348: 8 to 65464 bytes
//! - Timeouts follow RFC 2349: 1 to 255 seconds

use crate::error::{CodecError, Result};
use crate::protocol::opcode::TransferMode;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use tracing::Level;

/// Smallest block size a peer may negotiate (RFC 2348)
pub const MIN_BLOCK_SIZE: u16 = 8;

/// Largest block size a peer may negotiate (RFC 2348)
pub const MAX_BLOCK_SIZE: u16 = 65464;

/// Shortest negotiable timeout (RFC 2349)
pub const MIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Longest negotiable timeout (RFC 2349)
pub const MAX_TIMEOUT: Duration = Duration::from_secs(255);

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct TftpConfig {
    /// Datagram codec settings
    #[serde(default)]
    pub codec: CodecConfig,

    /// Option negotiation limits
    #[serde(default)]
    pub negotiation: NegotiationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TftpConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| CodecError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| CodecError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| CodecError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(size) = std::env::var("TFTP_WIRE_MAX_BLOCK_SIZE") {
            let val = size.parse::<u16>().map_err(|e| {
                CodecError::ConfigError(format!("Invalid TFTP_WIRE_MAX_BLOCK_SIZE '{size}': {e}"))
            })?;
            config.codec.max_block_size = val;
            config.negotiation.max_block_size = val;
        }

        if let Ok(strict) = std::env::var("TFTP_WIRE_STRICT_LENGTH") {
            config.codec.strict_length = matches!(strict.as_str(), "1" | "true" | "yes");
        }

        if let Ok(timeout) = std::env::var("TFTP_WIRE_MAX_TIMEOUT_SECS") {
            if let Ok(val) = timeout.parse::<u64>() {
                config.negotiation.max_timeout = Duration::from_secs(val);
            }
        }

        if let Ok(mode) = std::env::var("TFTP_WIRE_DEFAULT_MODE") {
            config.negotiation.default_mode = TransferMode::from_wire(&mode);
        }

        if let Ok(level) = std::env::var("TFTP_WIRE_LOG_LEVEL") {
            if let Ok(val) = level.parse::<Level>() {
                config.logging.log_level = val;
            }
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CodecError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| CodecError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        errors.extend(self.codec.validate());
        errors.extend(self.negotiation.validate());
        errors.extend(self.logging.validate());

        if self.negotiation.max_block_size > self.codec.max_block_size {
            errors.push(format!(
                "Negotiable block size {} exceeds codec payload limit {}",
                self.negotiation.max_block_size, self.codec.max_block_size
            ));
        }

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CodecError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Datagram codec configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CodecConfig {
    /// Largest Data payload the codec will encode or accept
    pub max_block_size: u16,

    /// Reject datagrams with bytes after a complete Ack or Error
    pub strict_length: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_block_size: MAX_BLOCK_SIZE,
            strict_length: false,
        }
    }
}

impl CodecConfig {
    /// Validate codec configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_block_size < MIN_BLOCK_SIZE {
            errors.push(format!(
                "Codec max block size too small: {} (minimum: {MIN_BLOCK_SIZE})",
                self.max_block_size
            ));
        } else if self.max_block_size > MAX_BLOCK_SIZE {
            errors.push(format!(
                "Codec max block size too large: {} (maximum: {MAX_BLOCK_SIZE})",
                self.max_block_size
            ));
        }

        errors
    }
}

/// Server-side option negotiation limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NegotiationConfig {
    /// Honour the `blksize` option
    pub blksize_enabled: bool,

    /// Requests below this block size are ignored
    pub min_block_size: u16,

    /// Requests above this block size are clamped down to it
    pub max_block_size: u16,

    /// Honour the `timeout` option
    pub timeout_enabled: bool,

    #[serde(with = "duration_secs_serde")]
    pub min_timeout: Duration,

    #[serde(with = "duration_secs_serde")]
    pub max_timeout: Duration,

    /// Honour the `tsize` option
    pub tsize_enabled: bool,

    /// Mode used by [`Request::with_default_mode`](crate::protocol::request::Request::with_default_mode)
    pub default_mode: TransferMode,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            blksize_enabled: true,
            min_block_size: MIN_BLOCK_SIZE,
            max_block_size: MAX_BLOCK_SIZE,
            timeout_enabled: true,
            min_timeout: MIN_TIMEOUT,
            max_timeout: MAX_TIMEOUT,
            tsize_enabled: true,
            default_mode: TransferMode::Octet,
        }
    }
}

impl NegotiationConfig {
    /// Validate negotiation configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.min_block_size < MIN_BLOCK_SIZE {
            errors.push(format!(
                "Min block size too small: {} (minimum: {MIN_BLOCK_SIZE})",
                self.min_block_size
            ));
        }
        if self.max_block_size > MAX_BLOCK_SIZE {
            errors.push(format!(
                "Max block size too large: {} (maximum: {MAX_BLOCK_SIZE})",
                self.max_block_size
            ));
        }
        if self.min_block_size > self.max_block_size {
            errors.push(format!(
                "Min block size {} is greater than max block size {}",
                self.min_block_size, self.max_block_size
            ));
        }

        if self.min_timeout < MIN_TIMEOUT {
            errors.push("Min timeout too short (minimum: 1s)".to_string());
        }
        if self.max_timeout > MAX_TIMEOUT {
            errors.push("Max timeout too long (maximum: 255s)".to_string());
        }
        if self.min_timeout > self.max_timeout {
            errors.push("Min timeout is greater than max timeout".to_string());
        }

        if !self.default_mode.is_valid() {
            errors.push("Default transfer mode must be netascii, octet or mail".to_string());
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("tftp-wire"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Duration serialized as whole seconds, the unit TFTP timeouts use
mod duration_secs_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
