//! Hierarchical packet names.
//!
//! Only what the packet needs is provided here: construction, URI parsing and
//! printing, and mutation counting. Component ordering and Interest matching
//! live elsewhere.

use crate::core::blob::Blob;
use crate::core::change_counter::ChangeCount;
use crate::error::{PacketError, Result};
use std::fmt;

/// Length of an implicit SHA-256 digest component
pub const SHA256_DIGEST_SIZE: usize = 32;

const IMPLICIT_DIGEST_PREFIX: &str = "sha256digest=";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ComponentType {
    #[default]
    Generic,
    ImplicitSha256Digest,
}

/// One name component
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Component {
    kind: ComponentType,
    value: Blob,
}

impl Component {
    pub fn new(value: impl Into<Blob>) -> Self {
        Self {
            kind: ComponentType::Generic,
            value: value.into(),
        }
    }

    /// An implicit SHA-256 digest component. The digest must be 32 bytes.
    pub fn implicit_sha256_digest(digest: impl Into<Blob>) -> Result<Self> {
        let value = digest.into();
        if value.size() != SHA256_DIGEST_SIZE {
            return Err(PacketError::DecodeError(format!(
                "Implicit SHA-256 digest must be {SHA256_DIGEST_SIZE} bytes, got {}",
                value.size()
            )));
        }
        Ok(Self {
            kind: ComponentType::ImplicitSha256Digest,
            value,
        })
    }

    pub fn kind(&self) -> ComponentType {
        self.kind
    }

    pub fn is_implicit_sha256_digest(&self) -> bool {
        self.kind == ComponentType::ImplicitSha256Digest
    }

    pub fn value(&self) -> &Blob {
        &self.value
    }

    /// Parse one URI-escaped component (without slashes)
    pub fn from_escaped(escaped: &str) -> Result<Self> {
        if let Some(hex) = escaped.strip_prefix(IMPLICIT_DIGEST_PREFIX) {
            return Self::implicit_sha256_digest(decode_hex(hex)?);
        }

        let value = unescape(escaped)?;
        // A run of periods stands for the component with three fewer periods
        if !value.is_empty() && value.iter().all(|&b| b == b'.') {
            if value.len() < 3 {
                return Err(PacketError::DecodeError(format!(
                    "Illegal name component '{escaped}'"
                )));
            }
            return Ok(Self::new(value[3..].to_vec()));
        }
        Ok(Self::new(value))
    }

    /// URI-escaped form of this component
    pub fn to_escaped(&self) -> String {
        let bytes = self.value.as_slice();
        if self.is_implicit_sha256_digest() {
            return format!("{IMPLICIT_DIGEST_PREFIX}{}", encode_hex(bytes));
        }
        if bytes.iter().all(|&b| b == b'.') {
            return format!("...{}", ".".repeat(bytes.len()));
        }

        let mut out = String::with_capacity(bytes.len());
        for &b in bytes {
            if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
                out.push(b as char);
            } else {
                out.push_str(&format!("%{b:02X}"));
            }
        }
        out
    }
}

impl From<&str> for Component {
    fn from(value: &str) -> Self {
        Component::new(value)
    }
}

impl From<Vec<u8>> for Component {
    fn from(value: Vec<u8>) -> Self {
        Component::new(value)
    }
}

impl From<&[u8]> for Component {
    fn from(value: &[u8]) -> Self {
        Component::new(value)
    }
}

/// A packet name: an ordered list of components
#[derive(Debug, Clone, Default)]
pub struct Name {
    components: Vec<Component>,
    change_count: u64,
}

impl Name {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an NDN URI such as `/example/data/%00%01`. An optional `ndn:`
    /// scheme is accepted.
    pub fn from_uri(uri: &str) -> Result<Self> {
        let path = uri.trim();
        let path = path.strip_prefix("ndn:").unwrap_or(path);
        let path = path.strip_prefix("//").map_or(path, |rest| {
            // Skip an authority section
            rest.find('/').map_or("", |i| &rest[i..])
        });

        let mut name = Name::new();
        for escaped in path.split('/').filter(|c| !c.is_empty()) {
            name.components.push(Component::from_escaped(escaped)?);
        }
        Ok(name)
    }

    pub fn from_components(components: Vec<Component>) -> Self {
        Self {
            components,
            change_count: 0,
        }
    }

    pub fn append(&mut self, component: impl Into<Component>) -> &mut Self {
        self.components.push(component.into());
        self.changed();
        self
    }

    pub fn append_implicit_sha256_digest(&mut self, digest: impl Into<Blob>) -> Result<&mut Self> {
        let component = Component::implicit_sha256_digest(digest)?;
        Ok(self.append(component))
    }

    pub fn clear(&mut self) {
        self.components.clear();
        self.changed();
    }

    /// Component at `index`; negative indexes count from the end
    pub fn get(&self, index: isize) -> Option<&Component> {
        let i = if index < 0 {
            self.components.len().checked_sub(index.unsigned_abs())?
        } else {
            index as usize
        };
        self.components.get(i)
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn to_uri(&self) -> String {
        if self.components.is_empty() {
            return "/".to_string();
        }
        self.components
            .iter()
            .map(|c| format!("/{}", c.to_escaped()))
            .collect()
    }

    fn changed(&mut self) {
        self.change_count += 1;
    }
}

impl ChangeCount for Name {
    fn change_count(&self) -> u64 {
        self.change_count
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Eq for Name {}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uri())
    }
}

fn unescape(escaped: &str) -> Result<Vec<u8>> {
    let bytes = escaped.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = escaped
                .get(i + 1..i + 3)
                .ok_or_else(|| PacketError::DecodeError(format!("Bad escape in '{escaped}'")))?;
            let byte = u8::from_str_radix(hex, 16)
                .map_err(|_| PacketError::DecodeError(format!("Bad escape in '{escaped}'")))?;
            out.push(byte);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

pub(crate) fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn decode_hex(hex: &str) -> Result<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return Err(PacketError::DecodeError(format!("Odd-length hex '{hex}'")));
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| PacketError::DecodeError(format!("Bad hex '{hex}'")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_roundtrip() {
        let name = Name::from_uri("/example/data/%00%FF").expect("valid uri");
        assert_eq!(name.len(), 3);
        assert_eq!(name.get(2).map(|c| c.value().as_slice()), Some(&[0x00u8, 0xFF][..]));
        assert_eq!(name.to_uri(), "/example/data/%00%FF");
    }

    #[test]
    fn test_scheme_and_empty_name() {
        let name = Name::from_uri("ndn:/a/b").expect("valid uri");
        assert_eq!(name.to_uri(), "/a/b");
        assert_eq!(Name::from_uri("/").expect("root").to_uri(), "/");
    }

    #[test]
    fn test_period_components() {
        let name = Name::from_uri("/..../...").expect("valid uri");
        assert_eq!(name.get(0).map(|c| c.value().as_slice()), Some(&b"."[..]));
        assert_eq!(name.get(1).map(|c| c.value().size()), Some(0));
        assert_eq!(name.to_uri(), "/..../...");
        assert!(Name::from_uri("/..").is_err());
    }

    #[test]
    fn test_implicit_digest_uri() {
        let mut name = Name::from_uri("/a").expect("valid uri");
        name.append_implicit_sha256_digest(vec![0xABu8; 32])
            .expect("32-byte digest");
        let uri = name.to_uri();
        assert!(uri.starts_with("/a/sha256digest=abab"));
        assert_eq!(Name::from_uri(&uri).expect("reparse"), name);
        assert!(name.append_implicit_sha256_digest(vec![0u8; 3]).is_err());
    }

    #[test]
    fn test_negative_index() {
        let name = Name::from_uri("/a/b/c").expect("valid uri");
        assert_eq!(name.get(-1).map(|c| c.value().as_slice()), Some(&b"c"[..]));
        assert!(name.get(-4).is_none());
    }

    #[test]
    fn test_mutation_counts() {
        let mut name = Name::new();
        assert_eq!(name.change_count(), 0);
        name.append("a").append("b");
        assert_eq!(name.change_count(), 2);
        name.clear();
        assert_eq!(name.change_count(), 3);
        // Equality ignores the counter
        assert_eq!(name, Name::new());
    }
}
