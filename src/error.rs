//! # Error Types
//!
//! Error handling for Data packet construction, encoding, decoding and signing.
//!
//! ## Error Categories
//! - **I/O Errors**: configuration and log file access
//! - **Encoding Errors**: a packet state the selected wire format cannot express
//! - **Decoding Errors**: malformed, truncated or oversized input buffers
//! - **Security Errors**: missing or unusable keys, unsupported signature schemes
//! - **Configuration Errors**: invalid or unreadable configuration
//!
//! Unsupported key locator *resolution* is never an error: it degrades to an
//! empty [`KeyLocator`](crate::core::key_locator::KeyLocator).
//!
//! ## Example Usage
//! ```rust
//! use ndn_data::core::data::Data;
//! use ndn_data::error::{PacketError, Result};
//!
//! fn parse(input: &[u8]) -> Result<Data> {
//!     let mut data = Data::default();
//!     data.wire_decode(input)?;
//!     Ok(data)
//! }
//!
//! assert!(matches!(parse(&[0x06]), Err(PacketError::Truncated(_))));
//! ```

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Decoding errors
    pub const ERR_EMPTY_INPUT: &str = "Input buffer is empty";
    pub const ERR_TRUNCATED_VAR_NUMBER: &str = "VAR-NUMBER runs past the end of the input";
    pub const ERR_TRUNCATED_VALUE: &str = "TLV value runs past the end of the input";
    pub const ERR_TRAILING_BYTES: &str = "Trailing bytes after the Data element";
    pub const ERR_MISSING_NAME: &str = "Data element has no Name";
    pub const ERR_MISSING_SIGNATURE_INFO: &str = "Data element has no SignatureInfo";
    pub const ERR_MISSING_SIGNATURE_VALUE: &str = "Data element has no SignatureValue";
    pub const ERR_MISSING_SIGNATURE_TYPE: &str = "SignatureInfo has no SignatureType";
    pub const ERR_BAD_NON_NEGATIVE_INTEGER: &str =
        "NonNegativeInteger must be 1, 2, 4 or 8 bytes long";
    pub const ERR_BAD_SIGNED_LENGTH: &str = "Signed portion length exceeds the input";
    pub const ERR_UNKNOWN_FORMAT_BYTE: &str = "Unknown serialization format byte";
    pub const ERR_LOCATOR_NOT_CARRIED: &str =
        "Signature scheme cannot carry a KeyLocator in NDN-TLV";

    /// Security errors
    pub const ERR_MISSING_PUBLIC_KEY: &str = "Cannot verify Data without a public key";
    pub const ERR_EMPTY_SIGNATURE_VALUE: &str = "Signature value is empty";
    pub const ERR_NO_SIGNED_PORTION: &str = "Encoding has no signed portion";
}

/// PacketError is the primary error type for all Data packet operations
#[derive(Error, Debug)]
pub enum PacketError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Encode error: {0}")]
    EncodeError(String),

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Truncated input: {0}")]
    Truncated(&'static str),

    #[error("Unexpected TLV type: expected {expected}, got {actual}")]
    UnexpectedTlvType { expected: u64, actual: u64 },

    #[error("Unrecognized critical TLV type {0}")]
    UnrecognizedCriticalType(u64),

    #[error("Packet too large: {0} bytes")]
    OversizedPacket(usize),

    #[error("Unsupported key locator type: {0}")]
    UnsupportedKeyLocatorType(i64),

    #[error("Unsupported signature type: {0}")]
    UnsupportedSignatureType(String),

    #[error("Cannot verify Data without a public key")]
    MissingPublicKey,

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Security error: {0}")]
    SecurityError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Type alias for Results using PacketError
pub type Result<T> = std::result::Result<T, PacketError>;
