#![no_main]

use libfuzzer_sys::fuzz_target;
use ndn_data::Data;

fuzz_target!(|input: &[u8]| {
    // Decoding must never panic; a failed decode must not touch the packet
    let mut data = Data::default();
    let before = data.clone();
    if data.wire_decode(input.to_vec()).is_err() {
        assert_eq!(data, before);
    } else {
        let _ = data.wire_encode();
    }
});
