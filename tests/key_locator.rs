//! Integration tests for key locator resolution

#![allow(clippy::expect_used, clippy::unwrap_used, deprecated)]

use ndn_data::{Data, KeyLocator, KeyLocatorType, Name, Signature, SignatureType};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Writer that appends log output to a shared buffer
#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Capture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

/// Run `f` with a subscriber that records WARN and above
fn with_captured_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, capture.contents())
}

fn key_name(uri: &str) -> KeyLocator {
    KeyLocator::with_key_name(Name::from_uri(uri).unwrap())
}

fn data_with(signature_type: SignatureType) -> Data {
    let mut data = Data::new(Name::from_uri("/locator/test").unwrap());
    data.set_signature(Signature::with_type(signature_type));
    data
}

#[test]
fn test_signature_locator_wins() {
    let mut data = data_with(SignatureType::Sha256WithRsa);
    data.signature_mut().set_key_locator(key_name("/sig/key"));
    data.meta_info_mut().set_legacy_key_locator(key_name("/meta/key"));

    let (locator, logs) = with_captured_warnings(|| data.get_signature_or_meta_info_key_locator());
    assert_eq!(locator, key_name("/sig/key"));
    assert!(logs.is_empty(), "unexpected warning: {logs}");
}

#[test]
fn test_meta_info_fallback_warns() {
    let mut data = data_with(SignatureType::Sha256WithEcdsa);
    data.meta_info_mut().set_legacy_key_locator(key_name("/meta/key"));

    let (locator, logs) = with_captured_warnings(|| data.get_signature_or_meta_info_key_locator());
    assert_eq!(locator, key_name("/meta/key"));
    assert!(logs.contains("WARN"));
    assert!(logs.contains("MetaInfo"));
}

#[test]
fn test_both_empty_returns_signature_locator() {
    let data = data_with(SignatureType::Ed25519);

    let (locator, logs) = with_captured_warnings(|| data.get_signature_or_meta_info_key_locator());
    assert_eq!(locator.locator_type(), None);
    assert_eq!(&locator, data.signature().key_locator());
    assert!(logs.is_empty());
}

#[test]
fn test_digest_signature_has_no_locator() {
    let mut data = data_with(SignatureType::DigestSha256);
    data.signature_mut().set_key_locator(key_name("/ignored"));
    data.meta_info_mut().set_legacy_key_locator(key_name("/also/ignored"));

    let (locator, logs) = with_captured_warnings(|| data.get_signature_or_meta_info_key_locator());
    assert_eq!(locator, KeyLocator::new());
    assert!(logs.is_empty());
}

#[test]
fn test_generic_signature_has_no_locator() {
    let mut data = data_with(SignatureType::Generic(200));
    data.signature_mut().set_key_locator(key_name("/ignored"));

    assert_eq!(data.get_signature_or_meta_info_key_locator(), KeyLocator::new());
}

#[test]
fn test_type_code_zero_is_usable() {
    let mut zero = KeyLocator::new();
    zero.set_type(Some(KeyLocatorType::Other(0)));
    assert!(zero.has_usable_type());

    let mut data = data_with(SignatureType::HmacWithSha256);
    data.signature_mut().set_key_locator(zero.clone());
    data.meta_info_mut().set_legacy_key_locator(key_name("/meta/key"));

    let (locator, logs) = with_captured_warnings(|| data.get_signature_or_meta_info_key_locator());
    assert_eq!(locator, zero);
    assert!(logs.is_empty());
}

#[test]
fn test_negative_type_code_is_not_usable() {
    let mut negative = KeyLocator::new();
    negative.set_type(Some(KeyLocatorType::Other(-1)));
    assert!(!negative.has_usable_type());

    let mut data = data_with(SignatureType::Sha256WithRsa);
    data.signature_mut().set_key_locator(negative);
    data.meta_info_mut().set_legacy_key_locator(key_name("/meta/key"));

    let (locator, _) = with_captured_warnings(|| data.get_signature_or_meta_info_key_locator());
    assert_eq!(locator, key_name("/meta/key"));
}

#[test]
fn test_resolution_returns_independent_copy() {
    let mut data = data_with(SignatureType::Ed25519);
    data.signature_mut().set_key_locator(key_name("/sig/key"));

    let mut locator = data.get_signature_or_meta_info_key_locator();
    locator.key_name_mut().append("changed");
    assert_eq!(data.signature().key_locator(), &key_name("/sig/key"));
}

#[test]
fn test_legacy_locator_changes_invalidate_cache() {
    let mut data = data_with(SignatureType::Ed25519);
    data.wire_encode().expect("encode");

    data.meta_info_mut().set_legacy_key_locator(key_name("/meta/key"));
    assert!(data.get_default_wire_encoding().is_null());
}
