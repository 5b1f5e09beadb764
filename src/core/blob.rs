//! Immutable byte buffers.
//!
//! A [`Blob`] is never mutated after construction. Cloning shares the
//! underlying storage, so a payload or a cached encoding can be handed to a
//! copied packet without duplicating bytes.

use bytes::Bytes;
use std::fmt;
use std::ops::Range;

/// Immutable, possibly null, byte buffer
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Blob(Option<Bytes>);

impl Blob {
    /// A null blob (no buffer at all, distinct from an empty one)
    pub const fn null() -> Self {
        Blob(None)
    }

    /// Copy `bytes` into a new blob
    pub fn from_slice(bytes: &[u8]) -> Self {
        Blob(Some(Bytes::copy_from_slice(bytes)))
    }

    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// Number of bytes, 0 for a null blob
    pub fn size(&self) -> usize {
        self.0.as_ref().map_or(0, Bytes::len)
    }

    /// The buffer, or `None` for a null blob
    pub fn buf(&self) -> Option<&[u8]> {
        self.0.as_deref()
    }

    /// The buffer, empty for a null blob
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_deref().unwrap_or(&[])
    }

    /// Shared handle to the underlying storage
    pub fn bytes(&self) -> Option<&Bytes> {
        self.0.as_ref()
    }

    /// Whether both blobs point at the same storage
    pub fn shares_storage_with(&self, other: &Blob) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => a.as_ptr() == b.as_ptr() && a.len() == b.len(),
            _ => false,
        }
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            None => f.write_str("Blob(null)"),
            Some(b) => write!(f, "Blob({} bytes)", b.len()),
        }
    }
}

impl From<Bytes> for Blob {
    fn from(value: Bytes) -> Self {
        Blob(Some(value))
    }
}

impl From<Vec<u8>> for Blob {
    fn from(value: Vec<u8>) -> Self {
        Blob(Some(Bytes::from(value)))
    }
}

impl From<&[u8]> for Blob {
    fn from(value: &[u8]) -> Self {
        Blob::from_slice(value)
    }
}

impl<const N: usize> From<&[u8; N]> for Blob {
    fn from(value: &[u8; N]) -> Self {
        Blob::from_slice(value)
    }
}

impl From<&str> for Blob {
    fn from(value: &str) -> Self {
        Blob::from_slice(value.as_bytes())
    }
}

impl From<String> for Blob {
    fn from(value: String) -> Self {
        Blob(Some(Bytes::from(value)))
    }
}

impl From<&Blob> for Blob {
    fn from(value: &Blob) -> Self {
        value.clone()
    }
}

/// A wire encoding together with the byte range covered by its signature.
///
/// Offsets index into [`SignedBlob::blob`]. A null signed blob has an empty
/// range at offset 0.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SignedBlob {
    blob: Blob,
    signed_portion_begin: usize,
    signed_portion_end: usize,
}

impl SignedBlob {
    pub fn new(blob: Blob, signed_portion_begin: usize, signed_portion_end: usize) -> Self {
        Self {
            blob,
            signed_portion_begin,
            signed_portion_end,
        }
    }

    pub fn null() -> Self {
        Self::default()
    }

    pub fn is_null(&self) -> bool {
        self.blob.is_null()
    }

    pub fn blob(&self) -> &Blob {
        &self.blob
    }

    pub fn buf(&self) -> Option<&[u8]> {
        self.blob.buf()
    }

    pub fn size(&self) -> usize {
        self.blob.size()
    }

    pub fn signed_portion_begin(&self) -> usize {
        self.signed_portion_begin
    }

    pub fn signed_portion_end(&self) -> usize {
        self.signed_portion_end
    }

    pub fn signed_range(&self) -> Range<usize> {
        self.signed_portion_begin..self.signed_portion_end
    }

    /// The bytes covered by the signature, `None` if null or out of range
    pub fn signed_buf(&self) -> Option<&[u8]> {
        self.blob.buf()?.get(self.signed_range())
    }
}

impl fmt::Debug for SignedBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedBlob")
            .field("blob", &self.blob)
            .field("signed", &self.signed_range())
            .finish()
    }
}
