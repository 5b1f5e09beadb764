//! Key locators: references to the key that verifies a signature.

use crate::core::blob::Blob;
use crate::core::change_counter::{ChangeCount, ChangeCounter};
use crate::core::name::Name;
use crate::core::signature::{Signature, SignatureType};
use std::cell::Cell;

/// How a [`KeyLocator`] identifies its key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyLocatorType {
    /// The key's name
    KeyName,
    /// SHA-256 digest of the public key bits
    KeyLocatorDigest,
    /// The public key bits themselves (legacy)
    Key,
    /// A certificate (legacy)
    Certificate,
    /// A type code this library does not interpret
    Other(i64),
}

impl KeyLocatorType {
    pub fn code(self) -> i64 {
        match self {
            KeyLocatorType::KeyName => 1,
            KeyLocatorType::KeyLocatorDigest => 2,
            KeyLocatorType::Key => 3,
            KeyLocatorType::Certificate => 4,
            KeyLocatorType::Other(code) => code,
        }
    }

    pub fn from_code(code: i64) -> Self {
        match code {
            1 => KeyLocatorType::KeyName,
            2 => KeyLocatorType::KeyLocatorDigest,
            3 => KeyLocatorType::Key,
            4 => KeyLocatorType::Certificate,
            other => KeyLocatorType::Other(other),
        }
    }
}

/// Reference to a verification key. An empty locator has no type.
#[derive(Debug, Clone, Default)]
pub struct KeyLocator {
    locator_type: Option<KeyLocatorType>,
    key_name: ChangeCounter<Name>,
    key_data: Blob,
    change_count: Cell<u64>,
}

impl KeyLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locator naming the key
    pub fn with_key_name(name: Name) -> Self {
        let mut locator = Self::new();
        locator.set_type(Some(KeyLocatorType::KeyName));
        locator.set_key_name(name);
        locator
    }

    /// Locator carrying the SHA-256 digest of the key
    pub fn with_key_digest(digest: impl Into<Blob>) -> Self {
        let mut locator = Self::new();
        locator.set_type(Some(KeyLocatorType::KeyLocatorDigest));
        locator.set_key_data(digest);
        locator
    }

    pub fn locator_type(&self) -> Option<KeyLocatorType> {
        self.locator_type
    }

    /// Whether the locator has a type whose code is non-negative. Zero is
    /// accepted.
    pub fn has_usable_type(&self) -> bool {
        self.locator_type.is_some_and(|t| t.code() >= 0)
    }

    pub fn key_name(&self) -> &Name {
        self.key_name.get()
    }

    pub fn key_name_mut(&mut self) -> &mut Name {
        self.key_name.get_mut()
    }

    pub fn key_data(&self) -> &Blob {
        &self.key_data
    }

    pub fn set_type(&mut self, locator_type: Option<KeyLocatorType>) -> &mut Self {
        self.locator_type = locator_type;
        self.changed();
        self
    }

    pub fn set_key_name(&mut self, name: Name) -> &mut Self {
        self.key_name.set(name);
        self.changed();
        self
    }

    pub fn set_key_data(&mut self, data: impl Into<Blob>) -> &mut Self {
        self.key_data = data.into();
        self.changed();
        self
    }

    /// Reset to an empty locator
    pub fn clear(&mut self) {
        self.locator_type = None;
        self.key_name.set(Name::new());
        self.key_data = Blob::null();
        self.changed();
    }

    /// Whether the signature's scheme carries a key locator at all
    pub fn can_get_from_signature(signature: &Signature) -> bool {
        matches!(
            signature.signature_type(),
            SignatureType::Sha256WithRsa
                | SignatureType::Sha256WithEcdsa
                | SignatureType::HmacWithSha256
                | SignatureType::Ed25519
        )
    }

    fn changed(&self) {
        self.change_count.set(self.change_count.get() + 1);
    }
}

impl ChangeCount for KeyLocator {
    fn change_count(&self) -> u64 {
        if self.key_name.check_changed() {
            self.changed();
        }
        self.change_count.get()
    }
}

impl PartialEq for KeyLocator {
    fn eq(&self, other: &Self) -> bool {
        self.locator_type == other.locator_type
            && self.key_name == other.key_name
            && self.key_data == other.key_data
    }
}

impl Eq for KeyLocator {}
