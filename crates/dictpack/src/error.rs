use dictpack_buffers::BufferError;
use thiserror::Error;

use crate::value::ValueKind;

/// Everything `encode`, `decode`, `register` and the constructors can fail
/// with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("{kind} of length {length} exceeds the 32-bit length limit")]
    LengthExceeded { kind: ValueKind, length: usize },
    #[error("unsupported type: {0}")]
    UnsupportedType(String),
    #[error("encode overflow at offset {offset}: {requested} more byte(s) needed, capacity is {capacity}")]
    EncodeOverflow {
        offset: usize,
        requested: usize,
        capacity: usize,
    },
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("dictionary key already registered: {0:?}")]
    DuplicateKey(String),
    #[error("{0}")]
    Custom(String),
}

/// Decode failures, each pinned to the input offset where it was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unrecognized tag 0x{tag:02x} at offset {offset}")]
    InvalidTag { offset: usize, tag: u8 },
    #[error("unsupported extension (type {ext_type}, data {data}) at offset {offset}")]
    InvalidExtension { offset: usize, ext_type: i8, data: u8 },
    #[error("truncated input at offset {offset}: {needed} more byte(s) expected")]
    Truncated { offset: usize, needed: usize },
    #[error("map key at offset {offset} is neither text nor an integer")]
    InvalidKey { offset: usize },
    #[error("nesting deeper than {max_depth} at offset {offset}")]
    DepthExceeded { offset: usize, max_depth: usize },
}

impl From<BufferError> for DecodeError {
    fn from(e: BufferError) -> Self {
        match e {
            BufferError::EndOfBuffer { offset, needed } => DecodeError::Truncated { offset, needed },
            // reads never overflow; kept total for the conversion
            BufferError::Overflow {
                offset, requested, ..
            } => DecodeError::Truncated {
                offset,
                needed: requested,
            },
        }
    }
}

impl From<BufferError> for CodecError {
    fn from(e: BufferError) -> Self {
        match e {
            BufferError::Overflow {
                offset,
                requested,
                capacity,
            } => CodecError::EncodeOverflow {
                offset,
                requested,
                capacity,
            },
            BufferError::EndOfBuffer { .. } => CodecError::Decode(e.into()),
        }
    }
}

impl serde::ser::Error for CodecError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        CodecError::Custom(msg.to_string())
    }
}
