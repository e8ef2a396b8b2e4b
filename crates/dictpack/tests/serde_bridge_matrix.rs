use std::collections::BTreeMap;

use dictpack::{initialize, to_value, CodecError, Value};
use serde::Serialize;
use serde_json::json;

#[derive(Serialize)]
struct User {
    id: u32,
    name: String,
    email: Option<String>,
    roles: Vec<Role>,
    #[serde(with = "bytes")]
    avatar: Vec<u8>,
}

#[derive(Serialize)]
enum Role {
    Admin,
    Member { since: i64 },
}

mod bytes {
    pub fn serialize<S: serde::Serializer>(v: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_bytes(v)
    }
}

fn user() -> User {
    User {
        id: 9,
        name: "ada".into(),
        email: None,
        roles: vec![Role::Admin, Role::Member { since: -1 }],
        avatar: vec![0xde, 0xad],
    }
}

#[test]
fn serde_struct_to_value() {
    assert_eq!(
        to_value(&user()).unwrap(),
        Value::object([
            ("id", Value::from(9)),
            ("name", Value::from("ada")),
            ("email", Value::Null),
            (
                "roles",
                Value::array([
                    Value::from("Admin"),
                    Value::object([("Member", Value::object([("since", Value::from(-1))]))]),
                ])
            ),
            ("avatar", Value::Bytes(vec![0xde, 0xad])),
        ])
    );
}

#[test]
fn serde_encode_serialize_uses_the_dictionary() {
    let mut codec = initialize(1024, None).unwrap();
    codec.register(["id", "name", "email", "roles", "avatar"]).unwrap();

    let bytes = codec.encode_serialize(&user()).unwrap();
    assert_eq!(&bytes[..3], [0x85, 0xe0, 0x09]);
    assert_eq!(codec.decode(&bytes).unwrap(), to_value(&user()).unwrap());

    let plain = initialize(1024, None).unwrap().encode_serialize(&user()).unwrap();
    assert!(bytes.len() < plain.len());
}

#[test]
fn serde_rejects_non_text_map_keys() {
    let mut map = BTreeMap::new();
    map.insert((1, 2), "pair");
    let mut codec = initialize(64, None).unwrap();
    assert!(matches!(
        codec.encode_serialize(&map),
        Err(CodecError::UnsupportedType(_))
    ));
    assert!(matches!(
        codec.encode_serialize(&u128::MAX),
        Err(CodecError::UnsupportedType(_))
    ));
}

#[test]
fn json_bridge_round_trip() {
    let mut codec = initialize(4096, None).unwrap();
    codec.register(["kind", "payload"]).unwrap();

    let json = json!({
        "kind": "event",
        "payload": {
            "values": [1, -40000, 2.5, true, null, "x"],
            "big": 18446744073709551615u64,
            "nested": {"kind": "inner"},
        },
    });
    let bytes = codec.encode(&Value::from(json.clone())).unwrap();
    assert_eq!(&bytes[..2], [0x82, 0xe0]);
    let back = serde_json::Value::from(codec.decode(&bytes).unwrap());
    assert_eq!(back, json);
}

#[test]
fn json_bridge_maps_extensions_to_null_and_data_uri() {
    let mut codec = initialize(256, None).unwrap();
    let value = Value::object([
        ("u", Value::Undefined),
        ("n", Value::NAN),
        ("b", Value::Bytes(b"hi".to_vec())),
    ]);
    let bytes = codec.encode(&value).unwrap();
    let json = serde_json::Value::from(codec.decode(&bytes).unwrap());
    assert_eq!(
        json,
        json!({"u": null, "n": null, "b": "data:application/octet-stream;base64,aGk="})
    );
}
