use dictpack::{initialize, CodecError, Value};

fn overflow_capacity(err: &CodecError) -> Option<usize> {
    match err {
        CodecError::EncodeOverflow { capacity, .. } => Some(*capacity),
        _ => None,
    }
}

#[test]
fn overflow_exact_fit_matrix() {
    let mut codec = initialize(4, None).unwrap();

    assert_eq!(
        codec.encode(&Value::from("abc")).unwrap(),
        [0xa3, b'a', b'b', b'c']
    );
    assert_eq!(
        codec.encode(&Value::from("abcd")),
        Err(CodecError::EncodeOverflow {
            offset: 1,
            requested: 4,
            capacity: 4
        })
    );
    assert_eq!(
        codec.encode(&Value::Float(0.5)),
        Err(CodecError::EncodeOverflow {
            offset: 0,
            requested: 5,
            capacity: 4
        })
    );
    assert_eq!(
        codec
            .encode(&Value::array([1, 2, 3].map(Value::from)))
            .unwrap(),
        [0x93, 0x01, 0x02, 0x03]
    );
    assert!(codec.encode(&Value::Array(vec![Value::Null; 4])).is_err());
}

#[test]
fn overflow_sentinels_need_three_bytes() {
    let mut codec = initialize(2, None).unwrap();
    for value in [
        Value::Undefined,
        Value::NAN,
        Value::INFINITY,
        Value::NEG_INFINITY,
    ] {
        assert_eq!(
            codec.encode(&value),
            Err(CodecError::EncodeOverflow {
                offset: 0,
                requested: 3,
                capacity: 2
            })
        );
    }
    codec.reallocate(3).unwrap();
    assert_eq!(codec.encode(&Value::Undefined).unwrap(), [0xd4, 0x00, 0x00]);
}

#[test]
fn overflow_does_not_poison_the_instance() {
    let mut codec = initialize(16, None).unwrap();
    let big = Value::from("x".repeat(64));
    for _ in 0..3 {
        let err = codec.encode(&big).unwrap_err();
        assert_eq!(overflow_capacity(&err), Some(16));
        assert_eq!(codec.encode(&Value::from(7)).unwrap(), [0x07]);
    }
    let nested = Value::object([(
        "a",
        Value::array([Value::from("0123456789"), Value::from("0123456789")]),
    )]);
    assert!(codec.encode(&nested).is_err());
    assert_eq!(
        codec.encode(&Value::object([("a", Value::Null)])).unwrap(),
        [0x81, 0xa1, b'a', 0xc0]
    );
}

#[test]
fn overflow_large_blob_then_reallocate() {
    let blob: Vec<u8> = (0..0x10000 * 10).map(|i| (i % 251) as u8).collect();
    let value = Value::Bytes(blob);

    let mut codec = initialize(0x10000, None).unwrap();
    let err = codec.encode(&value).unwrap_err();
    assert_eq!(
        err,
        CodecError::EncodeOverflow {
            offset: 5,
            requested: 0x10000 * 10,
            capacity: 0x10000
        }
    );

    codec.reallocate(0x10000 * 11).unwrap();
    let bytes = codec.encode(&value).unwrap();
    assert_eq!(&bytes[..5], [0xc6, 0x00, 0x0a, 0x00, 0x00]);
    assert_eq!(bytes.len(), 5 + 0x10000 * 10);
    assert_eq!(codec.decode(&bytes).unwrap(), value);
}

#[test]
fn overflow_error_message_names_the_limit() {
    let mut codec = initialize(8, None).unwrap();
    let err = codec.encode(&Value::from("a".repeat(100))).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("capacity is 8"), "{message}");
}

#[test]
fn encoded_output_is_independent_of_the_scratch_buffer() {
    let mut codec = initialize(64, None).unwrap();
    let first = codec.encode(&Value::from("first")).unwrap();
    let second = codec.encode(&Value::from("2nd")).unwrap();
    assert_eq!(first, [0xa5, b'f', b'i', b'r', b's', b't']);
    assert_eq!(second, [0xa3, b'2', b'n', b'd']);
}
