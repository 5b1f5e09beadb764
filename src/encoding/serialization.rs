//! # Serialization Formats
//!
//! Serde-backed formats used by [`SerdeWireFormat`](super::SerdeWireFormat).
//! Supports bincode (legacy default), JSON (debugging/interop), and
//! MessagePack (compact encoding).
//!
//! ## Features
//! - **Multiple formats**: Bincode, JSON, MessagePack behind one trait
//! - **Format metadata**: one format byte prefix for automatic detection
//!
//! ## Usage
//! ```ignore
//! use ndn_data::encoding::serialization::{MultiFormat, SerializationFormat};
//!
//! let bytes = fields.serialize_format(SerializationFormat::MessagePack)?;
//! ```

use crate::error::{constants, PacketError, Result};
use serde::{Deserialize, Serialize};

/// Supported serialization formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializationFormat {
    /// Binary compact format (default, fastest)
    #[default]
    Bincode,
    /// Human-readable JSON format (debugging, interop)
    Json,
    /// Compact binary format (MessagePack, efficient)
    MessagePack,
}

impl SerializationFormat {
    /// Get the format identifier byte for the wire
    pub fn format_byte(self) -> u8 {
        match self {
            SerializationFormat::Bincode => 0x01,
            SerializationFormat::Json => 0x02,
            SerializationFormat::MessagePack => 0x03,
        }
    }

    /// Detect format from identifier byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(SerializationFormat::Bincode),
            0x02 => Some(SerializationFormat::Json),
            0x03 => Some(SerializationFormat::MessagePack),
            _ => None,
        }
    }

    /// Get human-readable name
    pub fn name(self) -> &'static str {
        match self {
            SerializationFormat::Bincode => "Bincode",
            SerializationFormat::Json => "JSON",
            SerializationFormat::MessagePack => "MessagePack",
        }
    }
}

/// Trait for types that support multiple serialization formats
pub trait MultiFormat: Serialize + for<'de> Deserialize<'de> + Sized {
    /// Serialize to bytes using the specified format
    fn serialize_format(&self, format: SerializationFormat) -> Result<Vec<u8>> {
        match format {
            SerializationFormat::Bincode => Ok(bincode::serialize(self)?),
            SerializationFormat::Json => {
                serde_json::to_vec(self).map_err(|e| PacketError::EncodeError(e.to_string()))
            }
            SerializationFormat::MessagePack => {
                rmp_serde::to_vec(self).map_err(|e| PacketError::EncodeError(e.to_string()))
            }
        }
    }

    /// Deserialize from bytes using the specified format
    fn deserialize_format(data: &[u8], format: SerializationFormat) -> Result<Self> {
        match format {
            SerializationFormat::Bincode => bincode::deserialize(data)
                .map_err(|e| PacketError::DecodeError(e.to_string())),
            SerializationFormat::Json => serde_json::from_slice(data)
                .map_err(|e| PacketError::DecodeError(e.to_string())),
            SerializationFormat::MessagePack => rmp_serde::from_slice(data)
                .map_err(|e| PacketError::DecodeError(e.to_string())),
        }
    }
}

/// Read the format byte at the front of `data`
pub fn detect_format(data: &[u8]) -> Result<SerializationFormat> {
    let byte = *data
        .first()
        .ok_or(PacketError::Truncated(constants::ERR_EMPTY_INPUT))?;
    SerializationFormat::from_byte(byte).ok_or_else(|| {
        PacketError::DecodeError(format!("{}: {byte}", constants::ERR_UNKNOWN_FORMAT_BYTE))
    })
}
