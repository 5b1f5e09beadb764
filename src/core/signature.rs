//! Packet signatures: scheme, key locator and signature bits.

use crate::core::blob::Blob;
use crate::core::change_counter::{ChangeCount, ChangeCounter};
use crate::core::key_locator::KeyLocator;
use std::cell::Cell;
use std::fmt;

/// Signature scheme, with its NDN-TLV SignatureType code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SignatureType {
    DigestSha256,
    Sha256WithRsa,
    Sha256WithEcdsa,
    HmacWithSha256,
    #[default]
    Ed25519,
    /// Any other scheme, carried opaquely
    Generic(u64),
}

impl SignatureType {
    pub fn code(self) -> u64 {
        match self {
            SignatureType::DigestSha256 => 0,
            SignatureType::Sha256WithRsa => 1,
            SignatureType::Sha256WithEcdsa => 3,
            SignatureType::HmacWithSha256 => 4,
            SignatureType::Ed25519 => 5,
            SignatureType::Generic(code) => code,
        }
    }

    pub fn from_code(code: u64) -> Self {
        match code {
            0 => SignatureType::DigestSha256,
            1 => SignatureType::Sha256WithRsa,
            3 => SignatureType::Sha256WithEcdsa,
            4 => SignatureType::HmacWithSha256,
            5 => SignatureType::Ed25519,
            other => SignatureType::Generic(other),
        }
    }
}

impl fmt::Display for SignatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureType::DigestSha256 => f.write_str("DigestSha256"),
            SignatureType::Sha256WithRsa => f.write_str("SignatureSha256WithRsa"),
            SignatureType::Sha256WithEcdsa => f.write_str("SignatureSha256WithEcdsa"),
            SignatureType::HmacWithSha256 => f.write_str("SignatureHmacWithSha256"),
            SignatureType::Ed25519 => f.write_str("SignatureEd25519"),
            SignatureType::Generic(code) => write!(f, "Generic({code})"),
        }
    }
}

/// Signature of a Data packet
#[derive(Debug, Clone, Default)]
pub struct Signature {
    signature_type: SignatureType,
    key_locator: ChangeCounter<KeyLocator>,
    value: Blob,
    change_count: Cell<u64>,
}

impl Signature {
    /// Empty signature of the default scheme
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(signature_type: SignatureType) -> Self {
        Self {
            signature_type,
            ..Self::default()
        }
    }

    pub fn signature_type(&self) -> SignatureType {
        self.signature_type
    }

    pub fn key_locator(&self) -> &KeyLocator {
        self.key_locator.get()
    }

    pub fn key_locator_mut(&mut self) -> &mut KeyLocator {
        self.key_locator.get_mut()
    }

    /// The signature bits
    pub fn value(&self) -> &Blob {
        &self.value
    }

    pub fn set_type(&mut self, signature_type: SignatureType) -> &mut Self {
        self.signature_type = signature_type;
        self.changed();
        self
    }

    pub fn set_key_locator(&mut self, key_locator: KeyLocator) -> &mut Self {
        self.key_locator.set(key_locator);
        self.changed();
        self
    }

    /// Set the signature bits. An empty value is stored as null, which is
    /// how an unsigned packet reads back off the wire.
    pub fn set_value(&mut self, value: impl Into<Blob>) -> &mut Self {
        let value = value.into();
        self.value = if value.size() == 0 { Blob::null() } else { value };
        self.changed();
        self
    }

    fn changed(&self) {
        self.change_count.set(self.change_count.get() + 1);
    }
}

impl ChangeCount for Signature {
    fn change_count(&self) -> u64 {
        if self.key_locator.check_changed() {
            self.changed();
        }
        self.change_count.get()
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.signature_type == other.signature_type
            && self.key_locator == other.key_locator
            && self.value == other.value
    }
}

impl Eq for Signature {}
