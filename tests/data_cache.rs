//! Integration tests for the default wire encoding cache.
//!
//! Change tracking is pull-based: every read of the cache first polls the
//! name, meta info and signature, so mutations made through `*_mut()`
//! accessors invalidate the cache just like setters do.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use ndn_data::encoding::serialization::SerializationFormat;
use ndn_data::encoding::{same_wire_format, SerdeWireFormat, TlvWireFormat, WireFormat};
use ndn_data::{Blob, ContentType, Data, MetaInfo, Name, Signature};
use std::sync::Arc;
use std::time::Duration;

fn sample() -> Data {
    let mut data = Data::new(Name::from_uri("/cache/sample").expect("valid uri"));
    data.set_content("payload");
    data.meta_info_mut()
        .set_freshness_period(Some(Duration::from_millis(1500)));
    data
}

fn assert_invalidated_by(mutate: impl FnOnce(&mut Data)) {
    let mut data = sample();
    data.wire_encode().expect("encode");
    assert!(!data.get_default_wire_encoding().is_null());
    let before = data.get_change_count();

    mutate(&mut data);

    assert!(data.get_default_wire_encoding().is_null());
    assert!(data.get_default_wire_encoding_format().is_none());
    assert!(data.get_change_count() > before);
}

#[test]
fn test_every_setter_invalidates() {
    assert_invalidated_by(|d| {
        d.set_name(Name::from_uri("/other").expect("valid uri"));
    });
    assert_invalidated_by(|d| {
        d.set_meta_info(MetaInfo::new());
    });
    assert_invalidated_by(|d| {
        d.set_signature(Signature::new());
    });
    assert_invalidated_by(|d| {
        d.set_content("new payload");
    });
}

#[test]
fn test_equal_replacement_still_invalidates() {
    assert_invalidated_by(|d| {
        let same = d.name().clone();
        d.set_name(same);
    });
    assert_invalidated_by(|d| {
        let same = d.content().clone();
        d.set_content(same);
    });
}

#[test]
fn test_internal_mutation_invalidates() {
    assert_invalidated_by(|d| {
        d.name_mut().append("v1");
    });
    assert_invalidated_by(|d| {
        d.meta_info_mut().set_content_type(ContentType::Key);
    });
    assert_invalidated_by(|d| {
        d.signature_mut().set_value(vec![1u8, 2, 3]);
    });
    assert_invalidated_by(|d| {
        d.signature_mut()
            .key_locator_mut()
            .key_name_mut()
            .append("deep");
    });
}

#[test]
fn test_reencode_after_mutation_produces_new_cache() {
    let mut data = sample();
    let first = data.wire_encode().expect("encode");
    data.set_content("changed");

    let second = data.wire_encode().expect("encode");
    assert_ne!(first, second);
    assert_eq!(data.get_default_wire_encoding(), second);
}

#[test]
fn test_change_count_stable_without_mutation() {
    let data = sample();
    let a = data.get_change_count();
    let b = data.get_change_count();
    data.wire_encode().expect("encode");
    assert_eq!(a, b);
    assert_eq!(data.get_change_count(), b);
}

#[test]
fn test_decode_reuses_input_bytes() {
    let encoded = sample().wire_encode().expect("encode");
    let input = encoded.blob().clone();

    let mut decoded = Data::default();
    decoded.wire_decode(input.clone()).expect("decode");

    let reencoded = decoded.wire_encode().expect("encode");
    assert!(reencoded.blob().shares_storage_with(&input));
    assert_eq!(reencoded.signed_range(), encoded.signed_range());
}

#[test]
fn test_decode_then_encode_returns_original_bytes_verbatim() {
    // Non-minimal NonNegativeInteger (2-byte SignatureType) is kept as is
    let input: Vec<u8> = vec![
        0x06, 0x12, // Data
        0x07, 0x03, 0x08, 0x01, b'a', // Name
        0x14, 0x00, // MetaInfo
        0x15, 0x01, b'b', // Content
        0x16, 0x04, 0x1B, 0x02, 0x00, 0x05, // SignatureInfo
        0x17, 0x00, // SignatureValue
    ];

    let mut data = Data::default();
    data.wire_decode(input.clone()).expect("decode");
    let encoding = data.wire_encode().expect("encode");
    assert_eq!(encoding.buf(), Some(&input[..]));
    assert_eq!(encoding.signed_range(), 2..18);

    // A mutation forces a canonical re-encode
    data.set_content("b");
    let canonical = data.wire_encode().expect("encode");
    assert_eq!(canonical.size(), input.len() - 1);
}

#[test]
fn test_non_canonical_encode_does_not_pollute_cache() {
    let data = sample();
    let canonical = data.wire_encode().expect("encode");

    let json: Arc<dyn WireFormat> = Arc::new(SerdeWireFormat::new(SerializationFormat::Json));
    let other = data.wire_encode_with(&json).expect("encode");
    assert_ne!(other.blob(), canonical.blob());

    let cached = data.get_default_wire_encoding();
    assert!(cached.blob().shares_storage_with(canonical.blob()));
    let format = data.get_default_wire_encoding_format().expect("format");
    assert!(same_wire_format(&format, data.wire_format()));
}

#[test]
fn test_non_canonical_encode_on_empty_cache_leaves_it_empty() {
    let data = sample();
    let json: Arc<dyn WireFormat> = Arc::new(SerdeWireFormat::new(SerializationFormat::Json));
    data.wire_encode_with(&json).expect("encode");
    assert!(data.get_default_wire_encoding().is_null());
}

#[test]
fn test_separate_tlv_instance_is_not_canonical() {
    let data = sample();
    let private_tlv: Arc<dyn WireFormat> = Arc::new(TlvWireFormat::new());
    let bytes = data.wire_encode_with(&private_tlv).expect("encode");
    assert!(data.get_default_wire_encoding().is_null());

    // Same bytes as the canonical codec would produce
    assert_eq!(bytes, data.wire_encode().expect("encode"));
}

#[test]
fn test_non_canonical_decode_resets_cache() {
    let mut data = sample();
    data.wire_encode().expect("encode");

    let bincode: Arc<dyn WireFormat> =
        Arc::new(SerdeWireFormat::new(SerializationFormat::Bincode));
    let foreign = sample().wire_encode_with(&bincode).expect("encode");

    data.wire_decode_with(foreign.blob().clone(), &bincode)
        .expect("decode");
    assert!(data.get_default_wire_encoding().is_null());
    assert!(data.get_default_wire_encoding_format().is_none());
    assert_eq!(data, sample());
}

#[test]
fn test_deep_copy_independence() {
    let original = sample();
    original.wire_encode().expect("encode");
    let original_count = original.get_change_count();

    let mut copy = original.clone();
    assert_eq!(copy, original);
    // The cached encoding is shared, not duplicated
    assert!(copy
        .get_default_wire_encoding()
        .blob()
        .shares_storage_with(original.get_default_wire_encoding().blob()));

    copy.name_mut().append("copy-only");
    copy.meta_info_mut().set_content_type(ContentType::Nack);

    assert_eq!(original.get_change_count(), original_count);
    assert_eq!(original.name().to_uri(), "/cache/sample");
    assert_eq!(original.meta_info().content_type(), ContentType::Blob);
    assert!(!original.get_default_wire_encoding().is_null());
    assert!(copy.get_default_wire_encoding().is_null());

    let mut original = original;
    original.set_content("original-only");
    assert_eq!(copy.content().as_slice(), b"payload");
}

#[test]
fn test_copy_shares_content_storage() {
    let mut original = Data::default();
    original.set_content(vec![0xAAu8; 256]);
    let copy = original.clone();
    assert!(copy.content().shares_storage_with(original.content()));

    // Replacing the content does not touch the old blob held by the copy
    original.set_content(Blob::null());
    assert_eq!(copy.content().size(), 256);
}

#[test]
fn test_content_coercion() {
    let mut data = Data::default();
    data.set_content(&b"raw"[..]);
    assert_eq!(data.content().as_slice(), b"raw");
    data.set_content(String::from("owned"));
    assert_eq!(data.content().as_slice(), b"owned");
    data.set_content(bytes::Bytes::from_static(b"static"));
    assert_eq!(data.content().as_slice(), b"static");
}

#[test]
fn test_legacy_alias_is_same_type() {
    use ndn_data::ContentObject;

    let mut object: ContentObject = ContentObject::new(Name::from_uri("/legacy").expect("valid uri"));
    object.set_content("x");
    let data: &Data = &object;
    assert_eq!(data.name().to_uri(), "/legacy");

    assert_eq!(data.content().as_slice(), b"x");
}
