//! # Configuration Management
//!
//! Centralized configuration for the Data packet library.
//!
//! This module selects the canonical wire format injected into packets and
//! configures logging.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment overrides via `from_env()`
//!
//! ## Composition
//! [`WireConfig::build_wire_format`] is the one place a canonical codec is
//! chosen; pass its result to
//! [`Data::with_wire_format`](crate::core::data::Data::with_wire_format).

use crate::encoding::serialization::SerializationFormat;
use crate::encoding::{SerdeWireFormat, TlvWireFormat, WireFormat};
use crate::error::{PacketError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::Level;

/// Default maximum encoded packet size (NDN link MTU budget)
pub const MAX_PACKET_SIZE: usize = 8800;

/// Hard upper bound accepted for `max_packet_size`
pub const MAX_PACKET_SIZE_LIMIT: usize = 16 * 1024 * 1024;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PacketConfig {
    /// Wire format configuration
    #[serde(default)]
    pub wire: WireConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PacketConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| PacketError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| PacketError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| PacketError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(format) = std::env::var("NDN_DATA_WIRE_FORMAT") {
            config.wire.format = WireFormatKind::parse(&format).ok_or_else(|| {
                PacketError::ConfigError(format!("Unknown wire format: {format}"))
            })?;
        }

        if let Ok(size) = std::env::var("NDN_DATA_MAX_PACKET_SIZE") {
            config.wire.max_packet_size = size.parse::<usize>().map_err(|e| {
                PacketError::ConfigError(format!("Invalid max packet size '{size}': {e}"))
            })?;
        }

        if let Ok(level) = std::env::var("NDN_DATA_LOG_LEVEL") {
            config.logging.log_level = level.parse::<Level>().map_err(|e| {
                PacketError::ConfigError(format!("Invalid log level '{level}': {e}"))
            })?;
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
            .map_err(|e| PacketError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| PacketError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.wire.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(PacketError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Which codec is canonical
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormatKind {
    /// NDN-TLV
    #[default]
    Tlv,
    Bincode,
    Json,
    #[serde(rename = "messagepack")]
    MessagePack,
}

impl WireFormatKind {
    /// Parse a case-insensitive format name
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tlv" | "ndn-tlv" => Some(WireFormatKind::Tlv),
            "bincode" => Some(WireFormatKind::Bincode),
            "json" => Some(WireFormatKind::Json),
            "messagepack" | "msgpack" => Some(WireFormatKind::MessagePack),
            _ => None,
        }
    }
}

/// Wire format configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WireConfig {
    /// Canonical codec
    pub format: WireFormatKind,

    /// Maximum encoded packet size in bytes (NDN-TLV only)
    pub max_packet_size: usize,
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            format: WireFormatKind::Tlv,
            max_packet_size: MAX_PACKET_SIZE,
        }
    }
}

impl WireConfig {
    /// Validate wire configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_packet_size == 0 {
            errors.push("Max packet size cannot be 0".to_string());
        } else if self.max_packet_size < 64 {
            errors.push("Max packet size too small (minimum: 64 bytes)".to_string());
        } else if self.max_packet_size > MAX_PACKET_SIZE_LIMIT {
            errors.push(format!(
                "Max packet size too large: {} bytes (maximum: 16 MB)",
                self.max_packet_size
            ));
        }

        if self.format != WireFormatKind::Tlv && self.max_packet_size != MAX_PACKET_SIZE {
            errors.push(
                "WARNING: max_packet_size only applies to the tlv wire format".to_string(),
            );
        }

        errors
    }

    /// Build the canonical codec. The default NDN-TLV configuration maps to
    /// the shared instance so packets built with it and with `Data::new`
    /// share one cache identity.
    pub fn build_wire_format(&self) -> Arc<dyn WireFormat> {
        match self.format {
            WireFormatKind::Tlv if self.max_packet_size == MAX_PACKET_SIZE => TlvWireFormat::get(),
            WireFormatKind::Tlv => Arc::new(TlvWireFormat::with_max_packet_size(self.max_packet_size)),
            WireFormatKind::Bincode => Arc::new(SerdeWireFormat::new(SerializationFormat::Bincode)),
            WireFormatKind::Json => Arc::new(SerdeWireFormat::new(SerializationFormat::Json)),
            WireFormatKind::MessagePack => {
                Arc::new(SerdeWireFormat::new(SerializationFormat::MessagePack))
            }
        }
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

    /// Whether to log to console
    pub log_to_console: bool,

    /// Whether to log to file
    pub log_to_file: bool,

    /// Path to log file (if log_to_file is true)
    pub log_file_path: Option<String>,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("ndn-data"),
            log_level: Level::INFO,
            log_to_console: true,
            log_to_file: false,
            log_file_path: None,
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

        if self.log_to_file {
            if let Some(ref path) = self.log_file_path {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        errors.push(format!(
                            "Log file directory does not exist: {}",
                            parent.display()
                        ));
                    }
                }
            } else {
                errors.push("log_file_path must be specified when log_to_file is true".to_string());
            }
        }

        if !self.log_to_console && !self.log_to_file {
            errors
                .push("At least one logging output (console or file) must be enabled".to_string());
        }

        errors
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
