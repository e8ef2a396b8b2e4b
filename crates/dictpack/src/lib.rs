//! MessagePack-compatible binary codec with dictionary key aliasing.
//!
//! On top of the standard MessagePack layout the codec adds:
//!
//! - a private `fixext 1` extension (type 0) for `undefined`, `NaN`,
//!   `+Infinity` and `-Infinity`, which MessagePack has no slot for;
//! - an opt-in [`Dictionary`] that replaces registered map keys with small
//!   integers, so the first 160 registered keys cost one byte on the wire.
//!
//! ```
//! use dictpack::{initialize, Value};
//!
//! let mut codec = initialize(1024, None).unwrap();
//! codec.register(["status"]).unwrap();
//!
//! let value = Value::object([("status", Value::from("ok"))]);
//! let bytes = codec.encode(&value).unwrap();
//! assert_eq!(bytes, [0x81, 0xe0, 0xa2, b'o', b'k']);
//! assert_eq!(codec.decode(&bytes).unwrap(), value);
//! ```

mod codec;
mod config;
pub mod constants;
mod decoder;
mod dictionary;
mod encoder;
mod error;
mod json;
mod ser;
mod value;

pub use codec::{initialize, Codec};
pub use config::CodecConfig;
pub use decoder::Decoder;
pub use dictionary::Dictionary;
pub use encoder::Encoder;
pub use error::{CodecError, DecodeError};
pub use ser::to_value;
pub use value::{Value, ValueKind};

pub use dictpack_buffers::{Reader, ScratchBuffer};
