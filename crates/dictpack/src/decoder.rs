//! `Decoder`: recursive-descent parser over the tag grammar.

use dictpack_buffers::Reader;

use crate::constants::{Sentinel, SENTINEL_EXT_TYPE};
use crate::{CodecError, DecodeError, Dictionary, Value};

/// Default cap on array/map nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Parses one root value from a byte slice.
///
/// Holds no cursor of its own: each call creates a [`Reader`] scoped to that
/// call, so a `Decoder` can be shared freely between calls.
pub struct Decoder<'a> {
    dictionary: &'a Dictionary,
    max_depth: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(dictionary: &'a Dictionary) -> Self {
        Self {
            dictionary,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Decodes the root value. Trailing bytes are ignored.
    pub fn decode(&self, input: &[u8]) -> Result<Value, CodecError> {
        self.decode_with_len(input).map(|(value, _)| value)
    }

    /// Decodes the root value and reports how many bytes it occupied.
    pub fn decode_with_len(&self, input: &[u8]) -> Result<(Value, usize), CodecError> {
        let mut reader = Reader::new(input);
        let value = self.read_any(&mut reader, 0)?;
        Ok((value, reader.x))
    }

    pub fn read_any(&self, reader: &mut Reader<'_>, depth: usize) -> Result<Value, DecodeError> {
        let offset = reader.x;
        let byte = reader.u8()?;

        // positive fixint: 0x00..=0x7f
        if byte < 0x80 {
            return Ok(Value::Integer(byte as i64));
        }
        // negative fixint: 0xe0..=0xff
        if byte > 0xdf {
            return Ok(Value::Integer(byte as i8 as i64));
        }
        if byte < 0xc0 {
            return match byte {
                0x80..=0x8f => self.read_obj(reader, byte as usize & 0x0f, offset, depth),
                0x90..=0x9f => self.read_arr(reader, byte as usize & 0x0f, offset, depth),
                _ => Ok(Value::Str(reader.utf8(byte as usize & 0x1f)?)),
            };
        }

        match byte {
            0xc0 => Ok(Value::Null),
            0xc2 => Ok(Value::Bool(false)),
            0xc3 => Ok(Value::Bool(true)),
            // bin8, bin16, bin32
            0xc4 => {
                let n = reader.u8()? as usize;
                Ok(Value::Bytes(reader.buf(n)?.to_vec()))
            }
            0xc5 => {
                let n = reader.u16()? as usize;
                Ok(Value::Bytes(reader.buf(n)?.to_vec()))
            }
            0xc6 => {
                let n = reader.u32()? as usize;
                Ok(Value::Bytes(reader.buf(n)?.to_vec()))
            }
            // float32, float64
            0xca => Ok(Value::Float(reader.f32()? as f64)),
            0xcb => Ok(Value::Float(reader.f64()?)),
            // uint8, uint16, uint32, uint64
            0xcc => Ok(Value::Integer(reader.u8()? as i64)),
            0xcd => Ok(Value::Integer(reader.u16()? as i64)),
            0xce => Ok(Value::Integer(reader.u32()? as i64)),
            0xcf => Ok(Value::from(reader.u64()?)),
            // int8, int16, int32, int64
            0xd0 => Ok(Value::Integer(reader.i8()? as i64)),
            0xd1 => Ok(Value::Integer(reader.i16()? as i64)),
            0xd2 => Ok(Value::Integer(reader.i32()? as i64)),
            0xd3 => Ok(Value::Integer(reader.i64()?)),
            // fixext 1
            0xd4 => self.read_sentinel(reader, offset),
            // str8, str16, str32
            0xd9 => {
                let n = reader.u8()? as usize;
                Ok(Value::Str(reader.utf8(n)?))
            }
            0xda => {
                let n = reader.u16()? as usize;
                Ok(Value::Str(reader.utf8(n)?))
            }
            0xdb => {
                let n = reader.u32()? as usize;
                Ok(Value::Str(reader.utf8(n)?))
            }
            // array16, array32
            0xdc => {
                let n = reader.u16()? as usize;
                self.read_arr(reader, n, offset, depth)
            }
            0xdd => {
                let n = reader.u32()? as usize;
                self.read_arr(reader, n, offset, depth)
            }
            // map16, map32
            0xde => {
                let n = reader.u16()? as usize;
                self.read_obj(reader, n, offset, depth)
            }
            0xdf => {
                let n = reader.u32()? as usize;
                self.read_obj(reader, n, offset, depth)
            }
            tag => Err(DecodeError::InvalidTag { offset, tag }),
        }
    }

    fn read_sentinel(&self, reader: &mut Reader<'_>, offset: usize) -> Result<Value, DecodeError> {
        let ext_type = reader.i8()?;
        let data = reader.u8()?;
        let sentinel = (ext_type == SENTINEL_EXT_TYPE)
            .then(|| Sentinel::from_byte(data))
            .flatten()
            .ok_or(DecodeError::InvalidExtension {
                offset,
                ext_type,
                data,
            })?;
        Ok(match sentinel {
            Sentinel::Undefined => Value::Undefined,
            Sentinel::NaN => Value::Float(f64::NAN),
            Sentinel::PosInfinity => Value::Float(f64::INFINITY),
            Sentinel::NegInfinity => Value::Float(f64::NEG_INFINITY),
        })
    }

    #[inline]
    fn enter(&self, offset: usize, depth: usize) -> Result<usize, DecodeError> {
        if depth >= self.max_depth {
            return Err(DecodeError::DepthExceeded {
                offset,
                max_depth: self.max_depth,
            });
        }
        Ok(depth + 1)
    }

    fn read_arr(
        &self,
        reader: &mut Reader<'_>,
        size: usize,
        offset: usize,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        let depth = self.enter(offset, depth)?;
        // every element takes at least one byte
        let mut arr = Vec::with_capacity(size.min(reader.size()));
        for _ in 0..size {
            arr.push(self.read_any(reader, depth)?);
        }
        Ok(Value::Array(arr))
    }

    fn read_obj(
        &self,
        reader: &mut Reader<'_>,
        size: usize,
        offset: usize,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        let depth = self.enter(offset, depth)?;
        let mut obj = Vec::with_capacity(size.min(reader.size() / 2));
        for _ in 0..size {
            let key = self.read_key(reader, depth)?;
            let val = self.read_any(reader, depth)?;
            obj.push((key, val));
        }
        Ok(Value::Object(obj))
    }

    /// Reads a map key.
    ///
    /// Text is taken literally. An integer is resolved through the
    /// dictionary when it is a registered alias and otherwise kept as its
    /// decimal text, so plain MessagePack maps with integer keys still
    /// decode. Any other key type is [`DecodeError::InvalidKey`].
    pub fn read_key(&self, reader: &mut Reader<'_>, depth: usize) -> Result<String, DecodeError> {
        let offset = reader.x;
        match self.read_any(reader, depth)? {
            Value::Str(key) => Ok(key),
            Value::Integer(alias) => Ok(self.resolve_alias(alias)),
            Value::UInteger(key) => Ok(key.to_string()),
            _ => Err(DecodeError::InvalidKey { offset }),
        }
    }

    fn resolve_alias(&self, alias: i64) -> String {
        if self.dictionary.is_enabled() {
            if let Some(key) = self.dictionary.key_for(alias) {
                return key.to_owned();
            }
        }
        alias.to_string()
    }
}
