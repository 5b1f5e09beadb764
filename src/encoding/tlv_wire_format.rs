//! # NDN-TLV Wire Format
//!
//! The canonical Data packet encoding.
//!
//! ## Layout
//! ```text
//! Data = DATA-TYPE TLV-LENGTH
//!          Name
//!          MetaInfo
//!          [Content]
//!          SignatureInfo
//!          SignatureValue
//! ```
//! The signed region runs from the first byte of `Name` to the last byte of
//! `SignatureInfo`.
//!
//! A null content is omitted on the wire and decodes back to null; an empty
//! content is written as an empty `Content` element. An empty
//! `SignatureValue` decodes to a null signature value. The deprecated MetaInfo
//! key locator has no NDN-TLV representation and is not encoded.
//!
//! ## Security
//! - Input larger than the configured maximum packet size is rejected before
//!   parsing
//! - Every length is bounds-checked before slicing
//! - The packet is only modified after the whole input parsed successfully

use crate::config::MAX_PACKET_SIZE;
use crate::core::blob::Blob;
use crate::core::data::Data;
use crate::core::key_locator::{KeyLocator, KeyLocatorType};
use crate::core::meta_info::{whole_millis, ContentType, MetaInfo};
use crate::core::name::{Component, ComponentType, Name};
use crate::core::signature::{Signature, SignatureType};
use crate::encoding::tlv::{self, types, TlvDecoder, TlvElement};
use crate::encoding::{EncodedData, SignedPortion, WireFormat};
use crate::error::{constants, PacketError, Result};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{debug, instrument};

static SHARED: OnceLock<Arc<TlvWireFormat>> = OnceLock::new();

/// NDN-TLV codec
#[derive(Debug, Clone)]
pub struct TlvWireFormat {
    max_packet_size: usize,
}

impl Default for TlvWireFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl TlvWireFormat {
    /// A new codec instance with the default size limit. Each instance is a
    /// distinct codec for caching purposes; use [`TlvWireFormat::get`] for
    /// the shared one.
    pub fn new() -> Self {
        Self::with_max_packet_size(MAX_PACKET_SIZE)
    }

    pub fn with_max_packet_size(max_packet_size: usize) -> Self {
        Self { max_packet_size }
    }

    /// The shared instance
    pub fn get() -> Arc<dyn WireFormat> {
        SHARED.get_or_init(|| Arc::new(TlvWireFormat::new())).clone()
    }

    pub fn max_packet_size(&self) -> usize {
        self.max_packet_size
    }
}

impl WireFormat for TlvWireFormat {
    fn name(&self) -> &'static str {
        "NDN-TLV"
    }

    #[instrument(level = "trace", skip_all, fields(name = %data.name()))]
    fn encode_data(&self, data: &Data) -> Result<EncodedData> {
        let mut body = Vec::with_capacity(data.content().size() + 128);

        encode_name(&mut body, data.name());
        encode_meta_info(&mut body, data.meta_info());
        if let Some(content) = data.content().buf() {
            tlv::write_tlv(&mut body, types::CONTENT, content);
        }
        encode_signature_info(&mut body, data.signature())?;
        let signed_end = body.len();
        tlv::write_tlv(
            &mut body,
            types::SIGNATURE_VALUE,
            data.signature().value().as_slice(),
        );

        let mut out = Vec::with_capacity(body.len() + 10);
        tlv::write_var_number(&mut out, types::DATA);
        tlv::write_var_number(&mut out, body.len() as u64);
        let header_len = out.len();
        out.extend_from_slice(&body);

        if out.len() > self.max_packet_size {
            return Err(PacketError::OversizedPacket(out.len()));
        }

        debug!(bytes = out.len(), "encoded Data as NDN-TLV");
        Ok(EncodedData {
            encoding: Blob::from(out),
            signed_portion: SignedPortion::new(header_len, header_len + signed_end),
        })
    }

    #[instrument(level = "trace", skip_all, fields(len = input.len()))]
    fn decode_data(&self, data: &mut Data, input: &[u8]) -> Result<SignedPortion> {
        if input.is_empty() {
            return Err(PacketError::Truncated(constants::ERR_EMPTY_INPUT));
        }
        if input.len() > self.max_packet_size {
            return Err(PacketError::OversizedPacket(input.len()));
        }

        let mut outer = TlvDecoder::new(input);
        let element = outer.read_expected(types::DATA)?;
        if !outer.is_empty() {
            return Err(PacketError::DecodeError(constants::ERR_TRAILING_BYTES.into()));
        }

        let mut decoder = TlvDecoder::nested(&element);
        if decoder.peek_type()? != Some(types::NAME) {
            return Err(PacketError::DecodeError(constants::ERR_MISSING_NAME.into()));
        }
        let name_element = decoder.read_element()?;
        let name = decode_name(&name_element)?;

        decoder.skip_until(&[
            types::META_INFO,
            types::CONTENT,
            types::SIGNATURE_INFO,
            types::SIGNATURE_VALUE,
        ])?;
        let meta_info = match decoder.read_optional(types::META_INFO)? {
            Some(element) => decode_meta_info(&element)?,
            None => MetaInfo::new(),
        };

        decoder.skip_until(&[types::CONTENT, types::SIGNATURE_INFO, types::SIGNATURE_VALUE])?;
        let content = decoder
            .read_optional(types::CONTENT)?
            .map_or_else(Blob::null, |element| Blob::from_slice(element.value));

        decoder.skip_until(&[types::SIGNATURE_INFO, types::SIGNATURE_VALUE])?;
        let signature_info = decoder.read_optional(types::SIGNATURE_INFO)?.ok_or_else(|| {
            PacketError::DecodeError(constants::ERR_MISSING_SIGNATURE_INFO.into())
        })?;
        let mut signature = decode_signature_info(&signature_info)?;

        decoder.skip_until(&[types::SIGNATURE_VALUE])?;
        let signature_value = decoder.read_optional(types::SIGNATURE_VALUE)?.ok_or_else(|| {
            PacketError::DecodeError(constants::ERR_MISSING_SIGNATURE_VALUE.into())
        })?;
        // An unsigned packet carries an empty SignatureValue
        if !signature_value.value.is_empty() {
            signature.set_value(Blob::from_slice(signature_value.value));
        }
        decoder.skip_until(&[])?;

        data.set_name(name)
            .set_meta_info(meta_info)
            .set_signature(signature)
            .set_content(content);

        debug!(bytes = input.len(), "decoded NDN-TLV Data");
        Ok(SignedPortion::new(name_element.begin, signature_info.end))
    }
}

fn encode_component(out: &mut Vec<u8>, component: &Component) {
    let tlv_type = match component.kind() {
        ComponentType::Generic => types::GENERIC_NAME_COMPONENT,
        ComponentType::ImplicitSha256Digest => types::IMPLICIT_SHA256_DIGEST_COMPONENT,
    };
    tlv::write_tlv(out, tlv_type, component.value().as_slice());
}

fn encode_name(out: &mut Vec<u8>, name: &Name) {
    let mut value = Vec::new();
    for component in name.components() {
        encode_component(&mut value, component);
    }
    tlv::write_tlv(out, types::NAME, &value);
}

fn encode_meta_info(out: &mut Vec<u8>, meta_info: &MetaInfo) {
    let mut value = Vec::new();
    if meta_info.content_type() != ContentType::Blob {
        tlv::write_non_negative_integer_tlv(
            &mut value,
            types::CONTENT_TYPE,
            meta_info.content_type().code(),
        );
    }
    if let Some(period) = meta_info.freshness_period() {
        tlv::write_non_negative_integer_tlv(&mut value, types::FRESHNESS_PERIOD, whole_millis(period));
    }
    if let Some(component) = meta_info.final_block_id() {
        let mut inner = Vec::new();
        encode_component(&mut inner, component);
        tlv::write_tlv(&mut value, types::FINAL_BLOCK_ID, &inner);
    }
    tlv::write_tlv(out, types::META_INFO, &value);
}

fn encode_signature_info(out: &mut Vec<u8>, signature: &Signature) -> Result<()> {
    let mut value = Vec::new();
    tlv::write_non_negative_integer_tlv(
        &mut value,
        types::SIGNATURE_TYPE,
        signature.signature_type().code(),
    );

    let locator = signature.key_locator();
    if KeyLocator::can_get_from_signature(signature) {
        if let Some(locator_type) = locator.locator_type() {
            let mut inner = Vec::new();
            match locator_type {
                KeyLocatorType::KeyName => encode_name(&mut inner, locator.key_name()),
                KeyLocatorType::KeyLocatorDigest => {
                    tlv::write_tlv(&mut inner, types::KEY_DIGEST, locator.key_data().as_slice())
                }
                other => return Err(PacketError::UnsupportedKeyLocatorType(other.code())),
            }
            tlv::write_tlv(&mut value, types::KEY_LOCATOR, &inner);
        }
    } else if locator.locator_type().is_some() {
        return Err(PacketError::EncodeError(format!(
            "{}: {}",
            constants::ERR_LOCATOR_NOT_CARRIED,
            signature.signature_type()
        )));
    }

    tlv::write_tlv(out, types::SIGNATURE_INFO, &value);
    Ok(())
}

fn decode_component(element: &TlvElement<'_>) -> Result<Component> {
    match element.tlv_type {
        types::GENERIC_NAME_COMPONENT => Ok(Component::new(element.value)),
        types::IMPLICIT_SHA256_DIGEST_COMPONENT => Component::implicit_sha256_digest(element.value),
        actual => Err(PacketError::UnexpectedTlvType {
            expected: types::GENERIC_NAME_COMPONENT,
            actual,
        }),
    }
}

fn decode_name(element: &TlvElement<'_>) -> Result<Name> {
    let mut decoder = TlvDecoder::nested(element);
    let mut components = Vec::new();
    while !decoder.is_empty() {
        components.push(decode_component(&decoder.read_element()?)?);
    }
    Ok(Name::from_components(components))
}

fn decode_meta_info(element: &TlvElement<'_>) -> Result<MetaInfo> {
    let mut decoder = TlvDecoder::nested(element);
    let mut meta_info = MetaInfo::new();

    decoder.skip_until(&[
        types::CONTENT_TYPE,
        types::FRESHNESS_PERIOD,
        types::FINAL_BLOCK_ID,
    ])?;
    if let Some(e) = decoder.read_optional(types::CONTENT_TYPE)? {
        meta_info.set_content_type(ContentType::from_code(tlv::read_non_negative_integer(
            e.value,
        )?));
    }

    decoder.skip_until(&[types::FRESHNESS_PERIOD, types::FINAL_BLOCK_ID])?;
    if let Some(e) = decoder.read_optional(types::FRESHNESS_PERIOD)? {
        let millis = tlv::read_non_negative_integer(e.value)?;
        meta_info.set_freshness_period(Some(Duration::from_millis(millis)));
    }

    decoder.skip_until(&[types::FINAL_BLOCK_ID])?;
    if let Some(e) = decoder.read_optional(types::FINAL_BLOCK_ID)? {
        let mut inner = TlvDecoder::nested(&e);
        let component = decode_component(&inner.read_element()?)?;
        meta_info.set_final_block_id(Some(component));
    }

    decoder.skip_until(&[])?;
    Ok(meta_info)
}

fn decode_key_locator(element: &TlvElement<'_>) -> Result<KeyLocator> {
    let mut decoder = TlvDecoder::nested(element);
    if decoder.is_empty() {
        return Ok(KeyLocator::new());
    }
    let inner = decoder.read_element()?;
    let locator = match inner.tlv_type {
        types::NAME => KeyLocator::with_key_name(decode_name(&inner)?),
        types::KEY_DIGEST => KeyLocator::with_key_digest(Blob::from_slice(inner.value)),
        actual => {
            return Err(PacketError::UnexpectedTlvType {
                expected: types::NAME,
                actual,
            })
        }
    };
    decoder.skip_until(&[])?;
    Ok(locator)
}

fn decode_signature_info(element: &TlvElement<'_>) -> Result<Signature> {
    let mut decoder = TlvDecoder::nested(element);
    let type_element = decoder.read_optional(types::SIGNATURE_TYPE)?.ok_or_else(|| {
        PacketError::DecodeError(constants::ERR_MISSING_SIGNATURE_TYPE.into())
    })?;
    let signature_type =
        SignatureType::from_code(tlv::read_non_negative_integer(type_element.value)?);
    let mut signature = Signature::with_type(signature_type);

    decoder.skip_until(&[types::KEY_LOCATOR])?;
    if let Some(e) = decoder.read_optional(types::KEY_LOCATOR)? {
        signature.set_key_locator(decode_key_locator(&e)?);
    }
    decoder.skip_until(&[])?;
    Ok(signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Data {
        let mut data = Data::new(Name::from_uri("/tlv/sample").expect("valid uri"));
        data.set_content("hello");
        data
    }

    #[test]
    fn test_signed_portion_bounds() {
        let codec = TlvWireFormat::new();
        let encoded = codec.encode_data(&sample()).expect("encode");
        let bytes = encoded.encoding.as_slice();

        assert_eq!(bytes[0] as u64, types::DATA);
        assert_eq!(bytes[encoded.signed_portion.begin] as u64, types::NAME);
        assert_eq!(
            bytes[encoded.signed_portion.end] as u64,
            types::SIGNATURE_VALUE
        );
    }

    #[test]
    fn test_decode_reports_same_signed_portion() {
        let codec = TlvWireFormat::new();
        let encoded = codec.encode_data(&sample()).expect("encode");
        let mut decoded = Data::default();
        let portion = codec
            .decode_data(&mut decoded, encoded.encoding.as_slice())
            .expect("decode");
        assert_eq!(portion, encoded.signed_portion);
        assert_eq!(decoded, sample());
    }

    #[test]
    fn test_null_and_empty_content() {
        let codec = TlvWireFormat::new();
        let mut data = Data::new(Name::new());
        data.set_content(Blob::null());

        let encoded = codec.encode_data(&data).expect("encode");
        let mut decoded = Data::default();
        codec
            .decode_data(&mut decoded, encoded.encoding.as_slice())
            .expect("decode");
        assert!(decoded.content().is_null());

        data.set_content(Vec::new());
        let encoded = codec.encode_data(&data).expect("encode");
        codec
            .decode_data(&mut decoded, encoded.encoding.as_slice())
            .expect("decode");
        assert!(!decoded.content().is_null());
        assert_eq!(decoded.content().size(), 0);
    }

    #[test]
    fn test_unsupported_locator_type_fails_to_encode() {
        let mut data = sample();
        let mut locator = KeyLocator::new();
        locator.set_type(Some(KeyLocatorType::Certificate));
        data.signature_mut().set_key_locator(locator);

        let result = TlvWireFormat::new().encode_data(&data);
        assert!(matches!(result, Err(PacketError::UnsupportedKeyLocatorType(4))));
    }

    #[test]
    fn test_locator_on_digest_scheme_fails_to_encode() {
        let mut data = sample();
        data.signature_mut()
            .set_type(SignatureType::DigestSha256)
            .set_key_locator(KeyLocator::with_key_name(
                Name::from_uri("/key").expect("valid uri"),
            ));

        let result = TlvWireFormat::new().encode_data(&data);
        assert!(matches!(result, Err(PacketError::EncodeError(_))));

        data.signature_mut().set_key_locator(KeyLocator::new());
        assert!(TlvWireFormat::new().encode_data(&data).is_ok());
    }

    #[test]
    fn test_size_limit() {
        let codec = TlvWireFormat::with_max_packet_size(64);
        let mut data = sample();
        data.set_content(vec![0u8; 128]);
        assert!(matches!(
            codec.encode_data(&data),
            Err(PacketError::OversizedPacket(_))
        ));

        let big = TlvWireFormat::new().encode_data(&data).expect("encode");
        let mut decoded = Data::default();
        assert!(matches!(
            codec.decode_data(&mut decoded, big.encoding.as_slice()),
            Err(PacketError::OversizedPacket(_))
        ));
    }
}
