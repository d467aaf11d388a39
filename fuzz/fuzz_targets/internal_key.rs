#![no_main]

use leveliter::{InternalKey, MAX_SEQUENCE_NUMBER, Slice, ValueType};
use libfuzzer_sys::fuzz_target;

// Fuzz target for InternalKey encoding/decoding.
// Arbitrary input must never panic the decoder, and every valid key must
// survive an encode/decode round trip, including user keys with 0x00 bytes.
fuzz_target!(|data: &[u8]| {
    if data.len() > 65535 {
        return;
    }

    if let Ok(decoded) = InternalKey::decode(data) {
        assert_eq!(decoded.encode().data(), data);
    }

    let key_slice = Slice::from(data);

    let sequences = [0u64, 1, 42, MAX_SEQUENCE_NUMBER / 2, MAX_SEQUENCE_NUMBER];
    let value_types = [
        ValueType::Deletion,
        ValueType::Value,
        ValueType::Merge,
        ValueType::RangeDeletion,
    ];

    for &seq in &sequences {
        for &vtype in &value_types {
            let internal_key = InternalKey::new(key_slice.clone(), seq, vtype);
            let encoded = internal_key.encode();

            match InternalKey::decode(encoded.data()) {
                Ok(decoded) => {
                    assert_eq!(decoded.user_key(), &key_slice,
                        "User key mismatch after encode/decode for key: {:?}", data);
                    assert_eq!(decoded.sequence(), seq,
                        "Sequence mismatch after encode/decode");
                    assert_eq!(decoded.value_type(), vtype,
                        "Value type mismatch after encode/decode");
                }
                Err(_) => {
                    panic!("Failed to decode valid InternalKey for key: {:?}, seq: {}, type: {:?}",
                        data, seq, vtype);
                }
            }
        }
    }
});
