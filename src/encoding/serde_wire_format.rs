//! Serde-backed Data codecs.
//!
//! ```text
//! [Format(1)] [SignedLength(4, BE)] [SignedFields(N)] [SignatureValue(M)]
//! ```
//! `SignedFields` holds the name, meta info (including the deprecated key
//! locator), content and signature info; the signed region is exactly those
//! `N` bytes. Both parts are serialized with the selected
//! [`SerializationFormat`].
//!
//! The bincode instance returned by [`SerdeWireFormat::legacy`] is the codec
//! behind the deprecated `Data::encode`/`Data::decode` entry points.

use crate::core::blob::Blob;
use crate::core::data::Data;
use crate::core::key_locator::{KeyLocator, KeyLocatorType};
use crate::core::meta_info::{whole_millis, ContentType, MetaInfo};
use crate::core::name::{Component, Name};
use crate::core::signature::{Signature, SignatureType};
use crate::encoding::serialization::{detect_format, MultiFormat, SerializationFormat};
use crate::encoding::{EncodedData, SignedPortion, WireFormat};
use crate::error::{constants, PacketError, Result};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::debug;

const HEADER_LEN: usize = 5;

static LEGACY: OnceLock<Arc<SerdeWireFormat>> = OnceLock::new();

/// Data codec over a serde [`SerializationFormat`]
#[derive(Debug, Clone)]
pub struct SerdeWireFormat {
    format: SerializationFormat,
}

impl SerdeWireFormat {
    pub fn new(format: SerializationFormat) -> Self {
        Self { format }
    }

    /// The shared bincode instance used by deprecated entry points
    pub fn legacy() -> Arc<dyn WireFormat> {
        LEGACY
            .get_or_init(|| Arc::new(SerdeWireFormat::new(SerializationFormat::Bincode)))
            .clone()
    }

    pub fn format(&self) -> SerializationFormat {
        self.format
    }
}

impl WireFormat for SerdeWireFormat {
    fn name(&self) -> &'static str {
        self.format.name()
    }

    fn encode_data(&self, data: &Data) -> Result<EncodedData> {
        let signed = SignedFields::from_data(data).serialize_format(self.format)?;
        let value = SignatureValueRepr {
            value: data.signature().value().buf().map(<[u8]>::to_vec),
        }
        .serialize_format(self.format)?;

        let signed_len = u32::try_from(signed.len())
            .map_err(|_| PacketError::OversizedPacket(signed.len()))?;

        let mut out = Vec::with_capacity(HEADER_LEN + signed.len() + value.len());
        out.push(self.format.format_byte());
        out.extend_from_slice(&signed_len.to_be_bytes());
        out.extend_from_slice(&signed);
        out.extend_from_slice(&value);

        debug!(format = self.format.name(), bytes = out.len(), "encoded Data");
        Ok(EncodedData {
            encoding: Blob::from(out),
            signed_portion: SignedPortion::new(HEADER_LEN, HEADER_LEN + signed.len()),
        })
    }

    fn decode_data(&self, data: &mut Data, input: &[u8]) -> Result<SignedPortion> {
        let format = detect_format(input)?;
        if format != self.format {
            return Err(PacketError::DecodeError(format!(
                "Expected {} encoding, found {}",
                self.format.name(),
                format.name()
            )));
        }
        let len_bytes: [u8; 4] = input
            .get(1..HEADER_LEN)
            .and_then(|b| b.try_into().ok())
            .ok_or(PacketError::Truncated(constants::ERR_BAD_SIGNED_LENGTH))?;
        let signed_end = HEADER_LEN
            .checked_add(u32::from_be_bytes(len_bytes) as usize)
            .filter(|&end| end <= input.len())
            .ok_or(PacketError::Truncated(constants::ERR_BAD_SIGNED_LENGTH))?;

        let fields = SignedFields::deserialize_format(&input[HEADER_LEN..signed_end], format)?;
        let value = SignatureValueRepr::deserialize_format(&input[signed_end..], format)?;

        let (name, meta_info, content, mut signature) = fields.into_parts()?;
        if let Some(bits) = value.value {
            signature.set_value(bits);
        }

        data.set_name(name)
            .set_meta_info(meta_info)
            .set_signature(signature)
            .set_content(content);

        debug!(format = format.name(), bytes = input.len(), "decoded Data");
        Ok(SignedPortion::new(HEADER_LEN, signed_end))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ComponentRepr {
    digest: bool,
    value: Vec<u8>,
}

impl ComponentRepr {
    fn from_component(component: &Component) -> Self {
        Self {
            digest: component.is_implicit_sha256_digest(),
            value: component.value().as_slice().to_vec(),
        }
    }

    fn into_component(self) -> Result<Component> {
        if self.digest {
            Component::implicit_sha256_digest(self.value)
        } else {
            Ok(Component::new(self.value))
        }
    }
}

fn name_repr(name: &Name) -> Vec<ComponentRepr> {
    name.components()
        .iter()
        .map(ComponentRepr::from_component)
        .collect()
}

fn name_from_repr(repr: Vec<ComponentRepr>) -> Result<Name> {
    let components = repr
        .into_iter()
        .map(ComponentRepr::into_component)
        .collect::<Result<Vec<_>>>()?;
    Ok(Name::from_components(components))
}

#[derive(Debug, Serialize, Deserialize)]
struct KeyLocatorRepr {
    locator_type: Option<i64>,
    key_name: Vec<ComponentRepr>,
    key_data: Option<Vec<u8>>,
}

impl KeyLocatorRepr {
    fn from_locator(locator: &KeyLocator) -> Self {
        Self {
            locator_type: locator.locator_type().map(KeyLocatorType::code),
            key_name: name_repr(locator.key_name()),
            key_data: locator.key_data().buf().map(<[u8]>::to_vec),
        }
    }

    fn into_locator(self) -> Result<KeyLocator> {
        let mut locator = KeyLocator::new();
        locator.set_type(self.locator_type.map(KeyLocatorType::from_code));
        locator.set_key_name(name_from_repr(self.key_name)?);
        if let Some(bits) = self.key_data {
            locator.set_key_data(bits);
        }
        Ok(locator)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct MetaInfoRepr {
    content_type: u64,
    freshness_period_ms: Option<u64>,
    final_block_id: Option<ComponentRepr>,
    locator: KeyLocatorRepr,
}

#[derive(Debug, Serialize, Deserialize)]
struct SignedFields {
    name: Vec<ComponentRepr>,
    meta_info: MetaInfoRepr,
    content: Option<Vec<u8>>,
    signature_type: u64,
    key_locator: KeyLocatorRepr,
}

impl MultiFormat for SignedFields {}

impl SignedFields {
    fn from_data(data: &Data) -> Self {
        let meta = data.meta_info();
        Self {
            name: name_repr(data.name()),
            meta_info: MetaInfoRepr {
                content_type: meta.content_type().code(),
                freshness_period_ms: meta
                    .freshness_period()
                    .map(whole_millis),
                final_block_id: meta.final_block_id().map(ComponentRepr::from_component),
                locator: KeyLocatorRepr::from_locator(meta.locator()),
            },
            content: data.content().buf().map(<[u8]>::to_vec),
            signature_type: data.signature().signature_type().code(),
            key_locator: KeyLocatorRepr::from_locator(data.signature().key_locator()),
        }
    }

    fn into_parts(self) -> Result<(Name, MetaInfo, Blob, Signature)> {
        let name = name_from_repr(self.name)?;

        let mut meta_info = MetaInfo::new();
        meta_info
            .set_content_type(ContentType::from_code(self.meta_info.content_type))
            .set_freshness_period(self.meta_info.freshness_period_ms.map(Duration::from_millis))
            .set_final_block_id(
                self.meta_info
                    .final_block_id
                    .map(ComponentRepr::into_component)
                    .transpose()?,
            )
            .set_locator(self.meta_info.locator.into_locator()?);

        let content = self.content.map_or_else(Blob::null, Blob::from);

        let mut signature = Signature::with_type(SignatureType::from_code(self.signature_type));
        signature.set_key_locator(self.key_locator.into_locator()?);

        Ok((name, meta_info, content, signature))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SignatureValueRepr {
    value: Option<Vec<u8>>,
}

impl MultiFormat for SignatureValueRepr {}
