//! # Signing and Verification
//!
//! Signatures cover the signed region recorded in a packet's canonical
//! [`SignedBlob`](crate::core::blob::SignedBlob), so neither signing nor
//! verification re-parses the encoding.
//!
//! ## Supported Schemes
//! - **DigestSha256**: SHA-256 of the signed region, no key involved
//! - **Ed25519**: `ed25519-dalek` signature over the signed region
//!
//! Other schemes can be carried and encoded but not signed or verified here.
//!
//! ## Security
//! - Ed25519 verification without a public key is an error, never `false`
//! - Seeds passed to [`Ed25519Signer::from_seed`] are zeroized after use

use crate::core::blob::Blob;
use crate::core::data::Data;
use crate::core::key_locator::KeyLocator;
use crate::core::name::Name;
use crate::core::signature::{Signature, SignatureType};
use crate::error::{constants, PacketError, Result};
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use rand_core::OsRng;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};
use zeroize::Zeroizing;

/// Ed25519 public key used for verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    /// Parse the 32 public key bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: &[u8; 32] = bytes
            .try_into()
            .map_err(|_| PacketError::InvalidKey(format!("expected 32 bytes, got {}", bytes.len())))?;
        VerifyingKey::from_bytes(bytes)
            .map(PublicKey)
            .map_err(|e| PacketError::InvalidKey(e.to_string()))
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// SHA-256 of the key bits, as used by a KeyLocatorDigest
    pub fn digest(&self) -> [u8; 32] {
        Sha256::digest(self.0.as_bytes()).into()
    }
}

/// Signs packets with an Ed25519 private key
pub struct Ed25519Signer {
    signing_key: SigningKey,
    key_locator: KeyLocator,
}

impl Ed25519Signer {
    /// A fresh random key, located by `key_name`
    pub fn generate(key_name: Name) -> Self {
        Self::from_signing_key(SigningKey::generate(&mut OsRng), key_name)
    }

    /// A key derived from a 32-byte seed, located by `key_name`
    pub fn from_seed(seed: [u8; 32], key_name: Name) -> Self {
        let seed = Zeroizing::new(seed);
        Self::from_signing_key(SigningKey::from_bytes(&seed), key_name)
    }

    fn from_signing_key(signing_key: SigningKey, key_name: Name) -> Self {
        Self {
            signing_key,
            key_locator: KeyLocator::with_key_name(key_name),
        }
    }

    /// Locate the key by the digest of its public bits instead of by name
    pub fn with_key_digest_locator(mut self) -> Self {
        self.key_locator = KeyLocator::with_key_digest(self.public_key().digest().to_vec());
        self
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key())
    }

    pub fn key_locator(&self) -> &KeyLocator {
        &self.key_locator
    }

    /// Set an Ed25519 signature info on `data`, encode it with its canonical
    /// codec and store the signature over the signed region
    #[instrument(level = "debug", skip_all, fields(name = %data.name()))]
    pub fn sign_data(&self, data: &mut Data) -> Result<()> {
        data.signature_mut()
            .set_type(SignatureType::Ed25519)
            .set_key_locator(self.key_locator.clone())
            .set_value(Blob::null());

        let encoding = data.wire_encode()?;
        let signed = encoding
            .signed_buf()
            .ok_or_else(|| PacketError::SecurityError(constants::ERR_NO_SIGNED_PORTION.into()))?;
        let signature = self.signing_key.sign(signed);

        data.signature_mut().set_value(signature.to_bytes().to_vec());
        debug!(signed_bytes = signed.len(), "signed Data with Ed25519");
        Ok(())
    }
}

impl std::fmt::Debug for Ed25519Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519Signer")
            .field("public_key", &self.public_key())
            .field("key_locator", &self.key_locator)
            .finish_non_exhaustive()
    }
}

/// Replace the signature of `data` with a DigestSha256 over its signed region
#[instrument(level = "debug", skip_all, fields(name = %data.name()))]
pub fn sign_data_with_sha256(data: &mut Data) -> Result<()> {
    data.set_signature(Signature::with_type(SignatureType::DigestSha256));

    let encoding = data.wire_encode()?;
    let signed = encoding
        .signed_buf()
        .ok_or_else(|| PacketError::SecurityError(constants::ERR_NO_SIGNED_PORTION.into()))?;
    let digest = Sha256::digest(signed);

    data.signature_mut().set_value(digest.to_vec());
    Ok(())
}

/// Verify the signature of `data` over the signed region of its canonical
/// encoding.
///
/// Returns `Ok(false)` for a signature that does not match. Ed25519 packets
/// require `public_key`; calling without one is an error.
#[instrument(level = "debug", skip_all, fields(name = %data.name()))]
pub fn verify_data(data: &Data, public_key: Option<&PublicKey>) -> Result<bool> {
    let signature = data.signature();
    let signature_type = signature.signature_type();

    let public_key = match signature_type {
        SignatureType::DigestSha256 => None,
        SignatureType::Ed25519 => Some(public_key.ok_or(PacketError::MissingPublicKey)?),
        other => return Err(PacketError::UnsupportedSignatureType(other.to_string())),
    };

    let value = match signature.value().buf() {
        Some(value) if !value.is_empty() => value,
        _ => {
            debug!(reason = constants::ERR_EMPTY_SIGNATURE_VALUE, "verification failed");
            return Ok(false);
        }
    };

    let encoding = data.wire_encode()?;
    let signed = encoding
        .signed_buf()
        .ok_or_else(|| PacketError::SecurityError(constants::ERR_NO_SIGNED_PORTION.into()))?;

    let verified = match public_key {
        None => Sha256::digest(signed).as_slice() == value,
        Some(key) => match ed25519_dalek::Signature::from_slice(value) {
            Ok(bits) => key.0.verify(signed, &bits).is_ok(),
            Err(_) => false,
        },
    };

    debug!(%signature_type, verified, "verified Data signature");
    Ok(verified)
}
