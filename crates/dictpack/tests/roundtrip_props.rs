//! Property tests: every value survives encode/decode, and no byte soup makes
//! the decoder panic.

use dictpack::{initialize, Codec, Value};
use proptest::prelude::*;

const KEYS: [&str; 6] = ["id", "name", "type", "value", "items", "meta"];

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        Just(Value::Undefined),
        Just(Value::NAN),
        Just(Value::INFINITY),
        Just(Value::NEG_INFINITY),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        any::<u64>().prop_map(Value::UInteger),
        any::<f64>().prop_map(Value::Float),
        any::<f32>().prop_map(Value::from),
        "\\PC{0,40}".prop_map(Value::Str),
        prop::collection::vec(any::<u8>(), 0..64).prop_map(Value::Bytes),
    ]
}

fn key() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(KEYS.to_vec()).prop_map(str::to_owned),
        "\\PC{0,12}",
    ]
}

fn value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
            prop::collection::vec((key(), inner), 0..8).prop_map(Value::Object),
        ]
    })
}

fn new_codec(dictionary: bool) -> Codec {
    let mut codec = initialize(1 << 20, None).unwrap();
    if dictionary {
        codec.register(KEYS).unwrap();
    }
    codec
}

proptest! {
    #[test]
    fn roundtrip_without_dictionary(v in value()) {
        let mut codec = new_codec(false);
        let bytes = codec.encode(&v).unwrap();
        let (decoded, used) = codec.decode_with_len(&bytes).unwrap();
        prop_assert!(decoded.same(&v), "{:?} != {:?}", decoded, v);
        prop_assert_eq!(used, bytes.len());
    }

    #[test]
    fn roundtrip_with_dictionary(v in value()) {
        let mut codec = new_codec(true);
        let bytes = codec.encode(&v).unwrap();
        let decoded = codec.decode(&bytes).unwrap();
        prop_assert!(decoded.same(&v), "{:?} != {:?}", decoded, v);

        let plain = new_codec(false).encode(&v).unwrap();
        prop_assert!(bytes.len() <= plain.len());
    }

    #[test]
    fn decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let codec = new_codec(true);
        let _ = codec.decode(&bytes);
    }

    #[test]
    fn truncated_encodings_fail(v in value()) {
        let mut codec = new_codec(false);
        let bytes = codec.encode(&v).unwrap();
        for cut in 0..bytes.len() {
            prop_assert!(codec.decode(&bytes[..cut]).is_err());
        }
    }
}
