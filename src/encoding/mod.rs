//! # Wire Formats
//!
//! Pluggable codecs that turn a [`Data`] packet into bytes and back.
//!
//! ## Components
//! - **WireFormat**: the codec trait
//! - **TlvWireFormat**: NDN-TLV, the canonical format
//! - **SerdeWireFormat**: bincode, JSON or MessagePack framing; the bincode
//!   instance backs the deprecated `Data::encode`/`Data::decode`
//! - **tlv**: VAR-NUMBER and NonNegativeInteger primitives
//!
//! ## Canonical Codec
//! Every `Data` carries the codec it treats as canonical. Only encodings
//! produced or consumed by that codec populate the packet's default encoding
//! cache. [`default_wire_format`] is the shared instance used when no codec is
//! injected.
//!
//! ## Codec Identity
//! Codecs are compared by instance, not by configuration: two separately
//! constructed `TlvWireFormat`s are different codecs as far as the cache is
//! concerned. See [`same_wire_format`].

pub mod serde_wire_format;
pub mod serialization;
pub mod tlv;
pub mod tlv_wire_format;

use crate::core::blob::Blob;
use crate::core::data::Data;
use crate::error::Result;
use std::fmt;
use std::sync::Arc;

pub use serde_wire_format::SerdeWireFormat;
pub use serialization::SerializationFormat;
pub use tlv_wire_format::TlvWireFormat;

/// Byte offsets of the signed region within an encoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignedPortion {
    pub begin: usize,
    pub end: usize,
}

impl SignedPortion {
    pub fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }
}

/// Output of [`WireFormat::encode_data`]
#[derive(Debug, Clone)]
pub struct EncodedData {
    pub encoding: Blob,
    pub signed_portion: SignedPortion,
}

/// A Data packet codec.
///
/// Encoding must be deterministic for a given packet state. Decoding replaces
/// the packet's name, meta info, signature and content wholesale, and must
/// leave the packet untouched when it fails.
pub trait WireFormat: fmt::Debug + Send + Sync {
    /// Short human-readable codec name
    fn name(&self) -> &'static str;

    /// Encode `data`, reporting the signed region of the output
    fn encode_data(&self, data: &Data) -> Result<EncodedData>;

    /// Decode `input` into `data`, reporting the signed region of `input`
    fn decode_data(&self, data: &mut Data, input: &[u8]) -> Result<SignedPortion>;
}

/// The shared canonical codec (NDN-TLV)
pub fn default_wire_format() -> Arc<dyn WireFormat> {
    TlvWireFormat::get()
}

/// Whether `a` and `b` are the same codec instance
pub fn same_wire_format(a: &Arc<dyn WireFormat>, b: &Arc<dyn WireFormat>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_shared() {
        assert!(same_wire_format(&default_wire_format(), &default_wire_format()));
    }

    #[test]
    fn test_identity_not_configuration() {
        let a: Arc<dyn WireFormat> = Arc::new(TlvWireFormat::new());
        let b: Arc<dyn WireFormat> = Arc::new(TlvWireFormat::new());
        assert!(!same_wire_format(&a, &b));
        assert!(same_wire_format(&a, &a.clone()));
    }
}
