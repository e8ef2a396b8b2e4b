//! `Encoder`: single-pass, depth-first [`Value`] serializer.

use dictpack_buffers::{utf8, ScratchBuffer};

use crate::constants::{
    Marker, Sentinel, FIXARRAY, FIXMAP, FIXSTR, INT16_MIN, INT32_MIN, INT8_MIN, SENTINEL_EXT_TYPE,
};
use crate::{CodecError, Dictionary, Value, ValueKind};

/// Writes values into a borrowed [`ScratchBuffer`], substituting map keys
/// through a borrowed [`Dictionary`].
///
/// Every write is bounds-checked; the first one that does not fit aborts the
/// whole encode with [`CodecError::EncodeOverflow`].
pub struct Encoder<'a> {
    pub writer: &'a mut ScratchBuffer,
    dictionary: &'a Dictionary,
}

#[inline]
fn length_u32(kind: ValueKind, length: usize) -> Result<u32, CodecError> {
    u32::try_from(length).map_err(|_| CodecError::LengthExceeded { kind, length })
}

impl<'a> Encoder<'a> {
    pub fn new(writer: &'a mut ScratchBuffer, dictionary: &'a Dictionary) -> Self {
        Self { writer, dictionary }
    }

    /// Encodes `value` from offset 0 and returns a copy of the written bytes.
    ///
    /// On failure the cursor is rewound, so the scratch region never leaks a
    /// partial encoding into a later call.
    pub fn encode(&mut self, value: &Value) -> Result<Vec<u8>, CodecError> {
        self.writer.reset();
        match self.write_any(value) {
            Ok(()) => Ok(self.writer.flush()),
            Err(e) => {
                self.writer.reset();
                Err(e)
            }
        }
    }

    pub fn write_any(&mut self, value: &Value) -> Result<(), CodecError> {
        match value {
            Value::Null => self.write_null(),
            Value::Undefined => self.write_sentinel(Sentinel::Undefined),
            Value::Bool(b) => self.write_boolean(*b),
            Value::Integer(i) => self.write_integer(*i),
            Value::UInteger(u) => self.write_u_integer(*u),
            Value::Float(f) => self.write_float(*f),
            Value::Str(s) => self.write_str(s),
            Value::Bytes(b) => self.write_bin(b),
            Value::Array(arr) => self.write_arr(arr),
            Value::Object(obj) => self.write_obj(obj),
        }
    }

    pub fn write_null(&mut self) -> Result<(), CodecError> {
        Ok(self.writer.u8(Marker::Null as u8)?)
    }

    pub fn write_boolean(&mut self, b: bool) -> Result<(), CodecError> {
        let marker = if b { Marker::True } else { Marker::False };
        Ok(self.writer.u8(marker as u8)?)
    }

    /// `fixext 1`, type 0, one data byte.
    pub fn write_sentinel(&mut self, sentinel: Sentinel) -> Result<(), CodecError> {
        self.writer.ensure_capacity(3)?;
        self.writer.u8(Marker::FixExt1 as u8)?;
        self.writer.u8(SENTINEL_EXT_TYPE as u8)?;
        Ok(self.writer.u8(sentinel as u8)?)
    }

    /// Non-finite values become sentinels; finite ones use float32 when the
    /// value survives the narrowing unchanged, float64 otherwise.
    pub fn write_float(&mut self, float: f64) -> Result<(), CodecError> {
        if float.is_nan() {
            return self.write_sentinel(Sentinel::NaN);
        }
        if float.is_infinite() {
            let sentinel = if float > 0.0 {
                Sentinel::PosInfinity
            } else {
                Sentinel::NegInfinity
            };
            return self.write_sentinel(sentinel);
        }
        let narrow = float as f32;
        if narrow as f64 == float {
            Ok(self.writer.u8f32(Marker::Float32 as u8, narrow)?)
        } else {
            Ok(self.writer.u8f64(Marker::Float64 as u8, float)?)
        }
    }

    pub fn write_u_integer(&mut self, uint: u64) -> Result<(), CodecError> {
        let w = &mut *self.writer;
        if uint < 0x80 {
            w.u8(uint as u8)?;
        } else if uint < 0x100 {
            w.u8u8(Marker::Uint8 as u8, uint as u8)?;
        } else if uint < 0x1_0000 {
            w.u8u16(Marker::Uint16 as u8, uint as u16)?;
        } else if uint < 0x1_0000_0000 {
            w.u8u32(Marker::Uint32 as u8, uint as u32)?;
        } else {
            w.u8u64(Marker::Uint64 as u8, uint)?;
        }
        Ok(())
    }

    pub fn write_integer(&mut self, int: i64) -> Result<(), CodecError> {
        if int >= 0 {
            return self.write_u_integer(int as u64);
        }
        let w = &mut *self.writer;
        if int >= -32 {
            // negative fixint: 0xe0..=0xff
            w.u8(int as i8 as u8)?;
        } else if int >= INT8_MIN {
            w.u8u8(Marker::Int8 as u8, int as i8 as u8)?;
        } else if int >= INT16_MIN {
            w.u8u16(Marker::Int16 as u8, int as i16 as u16)?;
        } else if int >= INT32_MIN {
            w.u8u32(Marker::Int32 as u8, int as i32 as u32)?;
        } else {
            w.u8i64(Marker::Int64 as u8, int)?;
        }
        Ok(())
    }

    pub fn write_str_hdr(&mut self, length: usize) -> Result<(), CodecError> {
        let len = length_u32(ValueKind::Str, length)?;
        let w = &mut *self.writer;
        if len < 0x20 {
            w.u8(FIXSTR | len as u8)?;
        } else if len < 0x100 {
            w.u8u8(Marker::Str8 as u8, len as u8)?;
        } else if len < 0x1_0000 {
            w.u8u16(Marker::Str16 as u8, len as u16)?;
        } else {
            w.u8u32(Marker::Str32 as u8, len)?;
        }
        Ok(())
    }

    /// Header sized from the exact UTF-8 length, then the encoded text.
    pub fn write_str(&mut self, s: &str) -> Result<(), CodecError> {
        let size = utf8::utf8_size(s);
        self.write_str_hdr(size)?;
        self.writer.utf8_sized(s, size)?;
        Ok(())
    }

    pub fn write_bin_hdr(&mut self, length: usize) -> Result<(), CodecError> {
        let len = length_u32(ValueKind::Bytes, length)?;
        let w = &mut *self.writer;
        if len < 0x100 {
            w.u8u8(Marker::Bin8 as u8, len as u8)?;
        } else if len < 0x1_0000 {
            w.u8u16(Marker::Bin16 as u8, len as u16)?;
        } else {
            w.u8u32(Marker::Bin32 as u8, len)?;
        }
        Ok(())
    }

    pub fn write_bin(&mut self, buf: &[u8]) -> Result<(), CodecError> {
        self.write_bin_hdr(buf.len())?;
        Ok(self.writer.buf(buf)?)
    }

    pub fn write_arr_hdr(&mut self, length: usize) -> Result<(), CodecError> {
        let len = length_u32(ValueKind::Array, length)?;
        let w = &mut *self.writer;
        if len < 0x10 {
            w.u8(FIXARRAY | len as u8)?;
        } else if len < 0x1_0000 {
            w.u8u16(Marker::Array16 as u8, len as u16)?;
        } else {
            w.u8u32(Marker::Array32 as u8, len)?;
        }
        Ok(())
    }

    pub fn write_arr(&mut self, arr: &[Value]) -> Result<(), CodecError> {
        self.write_arr_hdr(arr.len())?;
        for item in arr {
            self.write_any(item)?;
        }
        Ok(())
    }

    pub fn write_obj_hdr(&mut self, length: usize) -> Result<(), CodecError> {
        let len = length_u32(ValueKind::Object, length)?;
        let w = &mut *self.writer;
        if len < 0x10 {
            w.u8(FIXMAP | len as u8)?;
        } else if len < 0x1_0000 {
            w.u8u16(Marker::Map16 as u8, len as u16)?;
        } else {
            w.u8u32(Marker::Map32 as u8, len)?;
        }
        Ok(())
    }

    /// Map key: its alias when the dictionary knows it, the literal text
    /// otherwise.
    pub fn write_key(&mut self, key: &str) -> Result<(), CodecError> {
        if self.dictionary.is_enabled() {
            if let Some(alias) = self.dictionary.alias_for(key) {
                return self.write_integer(alias);
            }
        }
        self.write_str(key)
    }

    pub fn write_obj(&mut self, pairs: &[(String, Value)]) -> Result<(), CodecError> {
        self.write_obj_hdr(pairs.len())?;
        for (key, val) in pairs {
            self.write_key(key)?;
            self.write_any(val)?;
        }
        Ok(())
    }
}
