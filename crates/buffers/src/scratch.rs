//! Fixed-capacity scratch buffer with bounds-checked writes.

use crate::{utf8, BufferError};

/// A reusable write target of fixed capacity.
///
/// Unlike a growable writer, the region never reallocates on its own: every
/// write checks the remaining space first and fails with
/// [`BufferError::Overflow`] without touching the buffer when it does not
/// fit. The only way to change the capacity is [`ScratchBuffer::reallocate`].
///
/// # Example
///
/// ```
/// use dictpack_buffers::ScratchBuffer;
///
/// let mut scratch = ScratchBuffer::with_capacity(4);
/// scratch.u8(0x01).unwrap();
/// scratch.u16(0x0203).unwrap();
/// assert!(scratch.u16(0x0405).is_err());
/// assert_eq!(scratch.flush(), [0x01, 0x02, 0x03]);
/// ```
pub struct ScratchBuffer {
    /// The underlying byte region.
    uint8: Box<[u8]>,
    /// Number of bytes written since the last reset; never exceeds the
    /// capacity.
    x: usize,
}

impl ScratchBuffer {
    /// Creates a zeroed region of exactly `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            uint8: vec![0u8; capacity].into_boxed_slice(),
            x: 0,
        }
    }

    /// Declared capacity in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.uint8.len()
    }

    /// Bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.x
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x == 0
    }

    /// Bytes still available before the region is full.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.uint8.len() - self.x
    }

    /// Rewinds the cursor to offset 0. Contents are left in place and get
    /// overwritten by the next encode.
    #[inline]
    pub fn reset(&mut self) {
        self.x = 0;
    }

    /// Replaces the region with a new zeroed one of `capacity` bytes.
    pub fn reallocate(&mut self, capacity: usize) {
        self.uint8 = vec![0u8; capacity].into_boxed_slice();
        self.x = 0;
    }

    /// Fails unless `size` more bytes fit after the cursor.
    #[inline]
    pub fn ensure_capacity(&self, size: usize) -> Result<(), BufferError> {
        if size > self.remaining() {
            Err(BufferError::Overflow {
                offset: self.x,
                requested: size,
                capacity: self.uint8.len(),
            })
        } else {
            Ok(())
        }
    }

    /// The bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.uint8[..self.x]
    }

    /// Copies the written bytes out and rewinds the cursor.
    pub fn flush(&mut self) -> Vec<u8> {
        let result = self.uint8[..self.x].to_vec();
        self.x = 0;
        result
    }

    #[inline]
    fn put<const N: usize>(&mut self, bytes: [u8; N]) -> Result<(), BufferError> {
        self.ensure_capacity(N)?;
        self.uint8[self.x..self.x + N].copy_from_slice(&bytes);
        self.x += N;
        Ok(())
    }

    /// Writes an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self, val: u8) -> Result<(), BufferError> {
        self.put([val])
    }

    /// Writes an unsigned 16-bit integer (big-endian).
    #[inline]
    pub fn u16(&mut self, val: u16) -> Result<(), BufferError> {
        self.put(val.to_be_bytes())
    }

    /// Writes an unsigned 32-bit integer (big-endian).
    #[inline]
    pub fn u32(&mut self, val: u32) -> Result<(), BufferError> {
        self.put(val.to_be_bytes())
    }

    /// Writes a u8 followed by a u8.
    #[inline]
    pub fn u8u8(&mut self, tag: u8, val: u8) -> Result<(), BufferError> {
        self.put([tag, val])
    }

    /// Writes a u8 followed by a u16 (big-endian).
    pub fn u8u16(&mut self, tag: u8, val: u16) -> Result<(), BufferError> {
        let b = val.to_be_bytes();
        self.put([tag, b[0], b[1]])
    }

    /// Writes a u8 followed by a u32 (big-endian).
    pub fn u8u32(&mut self, tag: u8, val: u32) -> Result<(), BufferError> {
        let b = val.to_be_bytes();
        self.put([tag, b[0], b[1], b[2], b[3]])
    }

    /// Writes a u8 followed by a u64 (big-endian).
    pub fn u8u64(&mut self, tag: u8, val: u64) -> Result<(), BufferError> {
        let b = val.to_be_bytes();
        self.put([tag, b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
    }

    /// Writes a u8 followed by an i64 (big-endian, two's complement).
    pub fn u8i64(&mut self, tag: u8, val: i64) -> Result<(), BufferError> {
        self.u8u64(tag, val as u64)
    }

    /// Writes a u8 followed by a f32 (big-endian).
    pub fn u8f32(&mut self, tag: u8, val: f32) -> Result<(), BufferError> {
        self.u8u32(tag, val.to_bits())
    }

    /// Writes a u8 followed by a f64 (big-endian).
    pub fn u8f64(&mut self, tag: u8, val: f64) -> Result<(), BufferError> {
        self.u8u64(tag, val.to_bits())
    }

    /// Writes a byte slice verbatim.
    pub fn buf(&mut self, buf: &[u8]) -> Result<(), BufferError> {
        let length = buf.len();
        self.ensure_capacity(length)?;
        self.uint8[self.x..self.x + length].copy_from_slice(buf);
        self.x += length;
        Ok(())
    }

    /// Writes `s` as UTF-8 whose encoded size the caller already knows.
    ///
    /// Returns the number of bytes written.
    pub fn utf8_sized(&mut self, s: &str, size: usize) -> Result<usize, BufferError> {
        self.ensure_capacity(size)?;
        let written = utf8::encode_into(&mut self.uint8[self.x..self.x + size], s);
        self.x += written;
        Ok(written)
    }

    /// Writes `s` as UTF-8. Returns the number of bytes written.
    pub fn utf8(&mut self, s: &str) -> Result<usize, BufferError> {
        self.utf8_sized(s, utf8::utf8_size(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8() {
        let mut scratch = ScratchBuffer::with_capacity(8);
        scratch.u8(0x01).unwrap();
        scratch.u8(0x02).unwrap();
        assert_eq!(scratch.flush(), [0x01, 0x02]);
    }

    #[test]
    fn test_u16() {
        let mut scratch = ScratchBuffer::with_capacity(8);
        scratch.u16(0x0102).unwrap();
        assert_eq!(scratch.flush(), [0x01, 0x02]);
    }

    #[test]
    fn test_u32() {
        let mut scratch = ScratchBuffer::with_capacity(8);
        scratch.u32(0x01020304).unwrap();
        assert_eq!(scratch.flush(), [0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_tagged_writes() {
        let mut scratch = ScratchBuffer::with_capacity(32);
        scratch.u8u16(0xcd, 0x0100).unwrap();
        scratch.u8i64(0xd3, -1).unwrap();
        scratch.u8f32(0xca, 0.5).unwrap();
        assert_eq!(
            scratch.flush(),
            [
                0xcd, 0x01, 0x00, //
                0xd3, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, //
                0xca, 0x3f, 0x00, 0x00, 0x00,
            ]
        );
    }

    #[test]
    fn test_utf8() {
        let mut scratch = ScratchBuffer::with_capacity(16);
        assert_eq!(scratch.utf8("café").unwrap(), 5);
        assert_eq!(scratch.flush(), "café".as_bytes());
    }

    #[test]
    fn test_flush_rewinds() {
        let mut scratch = ScratchBuffer::with_capacity(2);
        scratch.u8(0x01).unwrap();
        assert_eq!(scratch.flush(), [0x01]);
        scratch.u16(0x0203).unwrap();
        assert_eq!(scratch.flush(), [0x02, 0x03]);
        assert!(scratch.is_empty());
    }

    #[test]
    fn test_overflow_is_reported_and_nothing_written() {
        let mut scratch = ScratchBuffer::with_capacity(3);
        scratch.u16(0xaaaa).unwrap();
        let err = scratch.u32(0xdeadbeef).unwrap_err();
        assert_eq!(
            err,
            BufferError::Overflow {
                offset: 2,
                requested: 4,
                capacity: 3
            }
        );
        assert_eq!(scratch.len(), 2);
        assert_eq!(scratch.as_slice(), [0xaa, 0xaa]);
    }

    #[test]
    fn test_buf_overflow() {
        let mut scratch = ScratchBuffer::with_capacity(4);
        assert!(scratch.buf(&[1, 2, 3, 4]).is_ok());
        assert!(scratch.buf(&[5]).is_err());
        assert_eq!(scratch.flush(), [1, 2, 3, 4]);
    }

    #[test]
    fn test_reallocate_discards_contents() {
        let mut scratch = ScratchBuffer::with_capacity(1);
        scratch.u8(0x7f).unwrap();
        scratch.reallocate(16);
        assert_eq!(scratch.capacity(), 16);
        assert!(scratch.is_empty());
        scratch.u8u64(0xcf, u64::MAX).unwrap();
        assert_eq!(scratch.len(), 9);
    }

    #[test]
    fn test_cursor_stays_within_capacity() {
        let mut scratch = ScratchBuffer::with_capacity(3);
        scratch.u8u16(0xcd, 0x0102).unwrap();
        assert_eq!(scratch.remaining(), 0);
        assert!(scratch.u8(0).is_err());
        assert!(scratch.utf8("a").is_err());
        assert!(scratch.ensure_capacity(1).is_err());
        assert_eq!(scratch.len(), scratch.capacity());
        scratch.reset();
        assert_eq!(scratch.remaining(), 3);
    }
}
