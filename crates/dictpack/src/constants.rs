//! Wire tags.

/// One-byte MessagePack markers with a fixed meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Marker {
    Null = 0xc0,
    False = 0xc2,
    True = 0xc3,
    Bin8 = 0xc4,
    Bin16 = 0xc5,
    Bin32 = 0xc6,
    Float32 = 0xca,
    Float64 = 0xcb,
    Uint8 = 0xcc,
    Uint16 = 0xcd,
    Uint32 = 0xce,
    Uint64 = 0xcf,
    Int8 = 0xd0,
    Int16 = 0xd1,
    Int32 = 0xd2,
    Int64 = 0xd3,
    FixExt1 = 0xd4,
    Str8 = 0xd9,
    Str16 = 0xda,
    Str32 = 0xdb,
    Array16 = 0xdc,
    Array32 = 0xdd,
    Map16 = 0xde,
    Map32 = 0xdf,
}

pub const FIXMAP: u8 = 0x80;
pub const FIXARRAY: u8 = 0x90;
pub const FIXSTR: u8 = 0xa0;
pub const NEGATIVE_FIXINT: u8 = 0xe0;

/// Extension type carrying the sentinel values.
pub const SENTINEL_EXT_TYPE: i8 = 0;

/// Payload byte of the sentinel extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Sentinel {
    Undefined = 0,
    NaN = 1,
    PosInfinity = 2,
    NegInfinity = 3,
}

impl Sentinel {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(Sentinel::Undefined),
            1 => Some(Sentinel::NaN),
            2 => Some(Sentinel::PosInfinity),
            3 => Some(Sentinel::NegInfinity),
            _ => None,
        }
    }
}

/// Lower bounds of the signed width classes used for negative integers.
pub const INT8_MIN: i64 = -128;
pub const INT16_MIN: i64 = -12_800;
pub const INT32_MIN: i64 = -128_000_000;
