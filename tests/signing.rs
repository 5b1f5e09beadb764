//! Integration tests for signing and verification

#![allow(clippy::expect_used, clippy::unwrap_used)]

use ndn_data::security::{sign_data_with_sha256, verify_data, Ed25519Signer, PublicKey};
use ndn_data::{Data, KeyLocatorType, Name, PacketError, SignatureType};

fn sample() -> Data {
    let mut data = Data::new(Name::from_uri("/signing/sample").unwrap());
    data.set_content("to be signed");
    data
}

fn signer() -> Ed25519Signer {
    Ed25519Signer::from_seed([42u8; 32], Name::from_uri("/keys/producer").unwrap())
}

#[test]
fn test_signed_packet_survives_transfer() {
    let signer = signer();
    let mut data = sample();
    signer.sign_data(&mut data).expect("sign");

    let wire = data.wire_encode().expect("encode");
    let mut received = Data::default();
    received.wire_decode(wire.blob().clone()).expect("decode");

    assert_eq!(received.signature().signature_type(), SignatureType::Ed25519);
    let locator = received.get_signature_or_meta_info_key_locator();
    assert_eq!(locator.locator_type(), Some(KeyLocatorType::KeyName));
    assert_eq!(locator.key_name().to_uri(), "/keys/producer");
    assert!(received.verify(Some(&signer.public_key())).expect("verify"));
}

#[test]
fn test_tampered_content_fails_verification() {
    let signer = signer();
    let mut data = sample();
    signer.sign_data(&mut data).expect("sign");

    data.set_content("tampered");
    assert!(!verify_data(&data, Some(&signer.public_key())).expect("verify"));
}

#[test]
fn test_wrong_key_fails_verification() {
    let mut data = sample();
    signer().sign_data(&mut data).expect("sign");

    let other = Ed25519Signer::generate(Name::from_uri("/keys/other").unwrap());
    assert!(!verify_data(&data, Some(&other.public_key())).expect("verify"));
}

#[test]
fn test_verification_without_key_fails_fast() {
    let mut data = sample();
    signer().sign_data(&mut data).expect("sign");

    assert!(matches!(
        verify_data(&data, None),
        Err(PacketError::MissingPublicKey)
    ));
}

#[test]
fn test_unsigned_packet_does_not_verify() {
    let data = sample();
    assert!(!verify_data(&data, Some(&signer().public_key())).expect("verify"));
}

#[test]
fn test_digest_signature() {
    let mut data = sample();
    sign_data_with_sha256(&mut data).expect("sign");
    assert_eq!(data.signature().signature_type(), SignatureType::DigestSha256);
    assert_eq!(data.signature().value().size(), 32);
    assert!(verify_data(&data, None).expect("verify"));

    data.name_mut().append("changed");
    assert!(!verify_data(&data, None).expect("verify"));
}

#[test]
fn test_unsupported_scheme() {
    let mut data = sample();
    data.signature_mut()
        .set_type(SignatureType::Sha256WithRsa)
        .set_value(vec![1u8; 256]);
    assert!(matches!(
        verify_data(&data, None),
        Err(PacketError::UnsupportedSignatureType(_))
    ));
}

#[test]
fn test_key_digest_locator_matches_public_key() {
    let signer = signer().with_key_digest_locator();
    let mut data = sample();
    signer.sign_data(&mut data).expect("sign");

    let locator = data.get_signature_or_meta_info_key_locator();
    assert_eq!(locator.locator_type(), Some(KeyLocatorType::KeyLocatorDigest));
    assert_eq!(locator.key_data().as_slice(), signer.public_key().digest());
    assert!(data.verify(Some(&signer.public_key())).expect("verify"));
}

#[test]
fn test_public_key_bytes_round_trip() {
    let key = signer().public_key();
    let parsed = PublicKey::from_bytes(&key.to_bytes()).expect("parse");
    assert_eq!(parsed, key);
    assert!(matches!(
        PublicKey::from_bytes(&[0u8; 16]),
        Err(PacketError::InvalidKey(_))
    ));
}

#[test]
fn test_signing_is_deterministic_for_seed() {
    let mut a = sample();
    let mut b = sample();
    signer().sign_data(&mut a).expect("sign");
    signer().sign_data(&mut b).expect("sign");
    assert_eq!(a.signature().value(), b.signature().value());
}

#[test]
fn test_full_name_changes_with_signature() {
    let mut data = sample();
    let unsigned = data.get_full_name().expect("full name");
    signer().sign_data(&mut data).expect("sign");
    let signed = data.get_full_name().expect("full name");

    assert_eq!(unsigned.len(), signed.len());
    assert_ne!(unsigned, signed);
    assert_eq!(signed.get(-1).unwrap().value().size(), 32);
}
