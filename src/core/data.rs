//! # Data Packet
//!
//! The packet aggregate: name, meta info and signature (each change-tracked)
//! plus an immutable content blob, with a cached default wire encoding.
//!
//! ## Cache Protocol
//! - Every setter bumps the aggregate's edit counter; mutations made through
//!   `*_mut()` accessors are noticed by polling in [`Data::get_change_count`].
//! - [`Data::get_default_wire_encoding`] polls first and drops the cache if
//!   the count moved since the cache was stored.
//! - Only the packet's canonical codec stores into the cache. Encoding with
//!   any other codec leaves the cache alone; decoding with one clears it.
//! - Decoding with the canonical codec caches the *input* bytes, so a decode
//!   followed by an encode returns the original buffer.
//!
//! ## Example
//! ```rust
//! use ndn_data::{Data, Name};
//!
//! # fn main() -> ndn_data::error::Result<()> {
//! let mut data = Data::new(Name::from_uri("/a/b")?);
//! let first = data.wire_encode()?;
//! assert!(!data.get_default_wire_encoding().is_null());
//!
//! data.set_content("changed");
//! assert!(data.get_default_wire_encoding().is_null());
//! assert_ne!(data.wire_encode()?, first);
//! # Ok(())
//! # }
//! ```

use crate::core::blob::{Blob, SignedBlob};
use crate::core::change_counter::ChangeCounter;
use crate::core::key_locator::KeyLocator;
use crate::core::meta_info::MetaInfo;
use crate::core::name::Name;
use crate::core::signature::Signature;
use crate::encoding::serde_wire_format::SerdeWireFormat;
use crate::encoding::{default_wire_format, same_wire_format, WireFormat};
use crate::error::Result;
use crate::security::{self, PublicKey};
use bytes::Bytes;
use sha2::{Digest, Sha256};
use std::cell::{Cell, RefCell};
use std::sync::Arc;
use tracing::{instrument, trace, warn};

/// A named, signed unit of content
#[derive(Debug, Clone)]
pub struct Data {
    name: ChangeCounter<Name>,
    meta_info: ChangeCounter<MetaInfo>,
    signature: ChangeCounter<Signature>,
    content: Blob,
    /// Codec whose encodings populate the default cache
    wire_format: Arc<dyn WireFormat>,
    default_wire_encoding: RefCell<SignedBlob>,
    default_wire_encoding_format: RefCell<Option<Arc<dyn WireFormat>>>,
    /// Change count observed when the cache was last stored or reset
    default_wire_encoding_change_count: Cell<u64>,
    change_count: Cell<u64>,
}

/// Former name of [`Data`], kept for source compatibility
pub type ContentObject = Data;

impl Default for Data {
    fn default() -> Self {
        Self::new(Name::new())
    }
}

impl Data {
    /// A packet with an empty meta info, a null content and an empty signature
    /// of the default scheme, using the shared canonical codec
    pub fn new(name: Name) -> Self {
        Self::with_wire_format(name, default_wire_format())
    }

    /// Like [`Data::new`] but with an explicitly injected canonical codec
    pub fn with_wire_format(name: Name, wire_format: Arc<dyn WireFormat>) -> Self {
        Self {
            name: ChangeCounter::new(name),
            meta_info: ChangeCounter::new(MetaInfo::new()),
            signature: ChangeCounter::new(Signature::new()),
            content: Blob::null(),
            wire_format,
            default_wire_encoding: RefCell::new(SignedBlob::null()),
            default_wire_encoding_format: RefCell::new(None),
            default_wire_encoding_change_count: Cell::new(0),
            change_count: Cell::new(0),
        }
    }

    pub fn name(&self) -> &Name {
        self.name.get()
    }

    pub fn meta_info(&self) -> &MetaInfo {
        self.meta_info.get()
    }

    pub fn signature(&self) -> &Signature {
        self.signature.get()
    }

    pub fn content(&self) -> &Blob {
        &self.content
    }

    /// The canonical codec of this packet
    pub fn wire_format(&self) -> &Arc<dyn WireFormat> {
        &self.wire_format
    }

    /// The content as a raw shared buffer
    #[deprecated(note = "use content()")]
    pub fn get_content_as_buffer(&self) -> Option<Bytes> {
        self.content.bytes().cloned()
    }

    pub fn name_mut(&mut self) -> &mut Name {
        self.name.get_mut()
    }

    pub fn meta_info_mut(&mut self) -> &mut MetaInfo {
        self.meta_info.get_mut()
    }

    pub fn signature_mut(&mut self) -> &mut Signature {
        self.signature.get_mut()
    }

    pub fn set_name(&mut self, name: Name) -> &mut Self {
        self.name.set(name);
        self.bump();
        self
    }

    pub fn set_meta_info(&mut self, meta_info: MetaInfo) -> &mut Self {
        self.meta_info.set(meta_info);
        self.bump();
        self
    }

    pub fn set_signature(&mut self, signature: Signature) -> &mut Self {
        self.signature.set(signature);
        self.bump();
        self
    }

    /// Replace the content. Anything convertible into a [`Blob`] is accepted.
    pub fn set_content(&mut self, content: impl Into<Blob>) -> &mut Self {
        self.content = content.into();
        self.bump();
        self
    }

    /// Poll the name, meta info and signature and return the edit counter,
    /// incremented once if any of them changed since the last poll
    pub fn get_change_count(&self) -> u64 {
        // Poll all three; no short-circuit
        let mut changed = self.name.check_changed();
        changed |= self.meta_info.check_changed();
        changed |= self.signature.check_changed();
        if changed {
            self.bump();
        }
        self.change_count.get()
    }

    /// The cached canonical encoding, or a null blob if there is none or the
    /// packet changed since it was stored
    pub fn get_default_wire_encoding(&self) -> SignedBlob {
        self.refresh_default_wire_encoding();
        self.default_wire_encoding.borrow().clone()
    }

    /// Codec that produced [`Data::get_default_wire_encoding`]
    pub fn get_default_wire_encoding_format(&self) -> Option<Arc<dyn WireFormat>> {
        self.refresh_default_wire_encoding();
        self.default_wire_encoding_format.borrow().clone()
    }

    /// Encode with the canonical codec
    pub fn wire_encode(&self) -> Result<SignedBlob> {
        let wire_format = self.wire_format.clone();
        self.wire_encode_with(&wire_format)
    }

    /// Encode with `wire_format`. A valid cached encoding from the same codec
    /// is returned as is; only canonical encodings are cached.
    #[instrument(level = "trace", skip_all, fields(format = wire_format.name()))]
    pub fn wire_encode_with(&self, wire_format: &Arc<dyn WireFormat>) -> Result<SignedBlob> {
        let cached = self.get_default_wire_encoding();
        if !cached.is_null() && self.cached_by(wire_format) {
            trace!("reusing cached wire encoding");
            return Ok(cached);
        }

        let encoded = wire_format.encode_data(self)?;
        let wire_encoding = SignedBlob::new(
            encoded.encoding,
            encoded.signed_portion.begin,
            encoded.signed_portion.end,
        );

        if same_wire_format(wire_format, &self.wire_format) {
            self.set_default_wire_encoding(wire_encoding.clone(), Some(wire_format.clone()));
        }
        Ok(wire_encoding)
    }

    /// Decode `input` with the canonical codec, replacing every field. On
    /// success the input buffer itself becomes the cached encoding.
    pub fn wire_decode(&mut self, input: impl Into<Blob>) -> Result<()> {
        let wire_format = self.wire_format.clone();
        self.wire_decode_with(input, &wire_format)
    }

    /// Decode `input` with `wire_format`. On failure the packet is unchanged.
    #[instrument(level = "trace", skip_all, fields(format = wire_format.name()))]
    pub fn wire_decode_with(
        &mut self,
        input: impl Into<Blob>,
        wire_format: &Arc<dyn WireFormat>,
    ) -> Result<()> {
        let input = input.into();
        let portion = wire_format.decode_data(self, input.as_slice())?;

        if same_wire_format(wire_format, &self.wire_format) {
            let encoding = SignedBlob::new(input, portion.begin, portion.end);
            self.set_default_wire_encoding(encoding, Some(wire_format.clone()));
        } else {
            self.set_default_wire_encoding(SignedBlob::null(), None);
        }
        Ok(())
    }

    /// Encode with the legacy bincode codec
    #[deprecated(note = "use wire_encode()")]
    pub fn encode(&self) -> Result<Blob> {
        let encoding = self.wire_encode_with(&SerdeWireFormat::legacy())?;
        Ok(encoding.blob().clone())
    }

    /// Decode with the legacy bincode codec
    #[deprecated(note = "use wire_decode()")]
    pub fn decode(&mut self, input: impl Into<Blob>) -> Result<()> {
        self.wire_decode_with(input, &SerdeWireFormat::legacy())
    }

    /// Key locator that governs verification of this packet.
    ///
    /// The signature's locator wins. A locator in the meta info is only used
    /// when the signature has none, and logs a deprecation warning.
    pub fn get_signature_or_meta_info_key_locator(&self) -> KeyLocator {
        let signature = self.signature();
        if !KeyLocator::can_get_from_signature(signature) {
            return KeyLocator::new();
        }

        if signature.key_locator().has_usable_type() {
            return signature.key_locator().clone();
        }

        let legacy = self.meta_info().locator();
        if legacy.has_usable_type() {
            warn!(
                name = %self.name(),
                "using the key locator found in the MetaInfo; it is expected in the Signature \
                 and MetaInfo key locators will stop being supported"
            );
            return legacy.clone();
        }

        signature.key_locator().clone()
    }

    /// The name with the implicit SHA-256 digest of the canonical encoding
    /// appended
    pub fn get_full_name(&self) -> Result<Name> {
        let encoding = self.wire_encode()?;
        let digest = Sha256::digest(encoding.blob().as_slice());
        let mut full_name = self.name().clone();
        full_name.append_implicit_sha256_digest(digest.to_vec())?;
        Ok(full_name)
    }

    /// Verify the signature against the canonical encoding
    pub fn verify(&self, public_key: Option<&PublicKey>) -> Result<bool> {
        security::verify_data(self, public_key)
    }

    fn cached_by(&self, wire_format: &Arc<dyn WireFormat>) -> bool {
        self.default_wire_encoding_format
            .borrow()
            .as_ref()
            .is_some_and(|cached| same_wire_format(cached, wire_format))
    }

    fn refresh_default_wire_encoding(&self) {
        let change_count = self.get_change_count();
        if self.default_wire_encoding_change_count.get() != change_count {
            trace!(change_count, "packet changed, dropping cached wire encoding");
            self.default_wire_encoding.replace(SignedBlob::null());
            self.default_wire_encoding_format.replace(None);
            self.default_wire_encoding_change_count.set(change_count);
        }
    }

    fn set_default_wire_encoding(
        &self,
        encoding: SignedBlob,
        wire_format: Option<Arc<dyn WireFormat>>,
    ) {
        self.default_wire_encoding.replace(encoding);
        self.default_wire_encoding_format.replace(wire_format);
        self.default_wire_encoding_change_count
            .set(self.get_change_count());
    }

    fn bump(&self) {
        self.change_count.set(self.change_count.get() + 1);
    }
}

impl PartialEq for Data {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
            && self.meta_info() == other.meta_info()
            && self.signature() == other.signature()
            && self.content == other.content
    }
}
