//! UTF-8 helpers that work code point by code point.
//!
//! Encoding walks the `char`s of a `&str` and emits the byte sequence for
//! each one; decoding rebuilds text from raw bytes, replacing every malformed
//! or overlong sequence with U+FFFD and resynchronising one byte later.

/// Replacement character emitted for undecodable input.
pub const REPLACEMENT: char = '\u{FFFD}';

/// Number of bytes `c` occupies when UTF-8 encoded.
#[inline]
pub fn char_size(c: char) -> usize {
    let cp = c as u32;
    if cp < 0x80 {
        1
    } else if cp < 0x800 {
        2
    } else if cp < 0x10000 {
        3
    } else {
        4
    }
}

/// Total encoded size of `s` in bytes.
pub fn utf8_size(s: &str) -> usize {
    s.chars().map(char_size).sum()
}

/// Writes the UTF-8 encoding of `s` to the front of `dst`.
///
/// Returns the number of bytes written. `dst` must hold at least
/// [`utf8_size`]`(s)` bytes; shorter destinations panic on the slice index.
pub fn encode_into(dst: &mut [u8], s: &str) -> usize {
    let mut x = 0;
    for c in s.chars() {
        let cp = c as u32;
        if cp < 0x80 {
            dst[x] = cp as u8;
            x += 1;
        } else if cp < 0x800 {
            dst[x] = 0xc0 | (cp >> 6) as u8;
            dst[x + 1] = 0x80 | (cp & 0x3f) as u8;
            x += 2;
        } else if cp < 0x10000 {
            dst[x] = 0xe0 | (cp >> 12) as u8;
            dst[x + 1] = 0x80 | ((cp >> 6) & 0x3f) as u8;
            dst[x + 2] = 0x80 | (cp & 0x3f) as u8;
            x += 3;
        } else {
            dst[x] = 0xf0 | (cp >> 18) as u8;
            dst[x + 1] = 0x80 | ((cp >> 12) & 0x3f) as u8;
            dst[x + 2] = 0x80 | ((cp >> 6) & 0x3f) as u8;
            dst[x + 3] = 0x80 | (cp & 0x3f) as u8;
            x += 4;
        }
    }
    x
}

/// Encodes `s` into a freshly allocated byte vector.
pub fn encode(s: &str) -> Vec<u8> {
    let mut out = vec![0u8; utf8_size(s)];
    encode_into(&mut out, s);
    out
}

#[inline]
fn is_continuation(b: u8) -> bool {
    b & 0xc0 == 0x80
}

/// Decodes one code point starting at `buf[i]`.
///
/// Returns the code point and its byte length, or `None` when the bytes at
/// `i` do not form a valid, shortest-form sequence.
#[inline]
fn decode_at(buf: &[u8], i: usize) -> Option<(u32, usize)> {
    let first = buf[i];
    let width = if first > 0xef {
        4
    } else if first > 0xdf {
        3
    } else if first > 0xbf {
        2
    } else {
        1
    };
    if i + width > buf.len() {
        return None;
    }
    match width {
        1 => (first < 0x80).then_some((first as u32, 1)),
        2 => {
            let b1 = buf[i + 1];
            if !is_continuation(b1) {
                return None;
            }
            let cp = ((first as u32 & 0x1f) << 6) | (b1 as u32 & 0x3f);
            (cp > 0x7f).then_some((cp, 2))
        }
        3 => {
            let (b1, b2) = (buf[i + 1], buf[i + 2]);
            if !is_continuation(b1) || !is_continuation(b2) {
                return None;
            }
            let cp = ((first as u32 & 0x0f) << 12)
                | ((b1 as u32 & 0x3f) << 6)
                | (b2 as u32 & 0x3f);
            (cp > 0x7ff && !(0xd800..=0xdfff).contains(&cp)).then_some((cp, 3))
        }
        _ => {
            let (b1, b2, b3) = (buf[i + 1], buf[i + 2], buf[i + 3]);
            if first > 0xf4 || !is_continuation(b1) || !is_continuation(b2) || !is_continuation(b3)
            {
                return None;
            }
            let cp = ((first as u32 & 0x07) << 18)
                | ((b1 as u32 & 0x3f) << 12)
                | ((b2 as u32 & 0x3f) << 6)
                | (b3 as u32 & 0x3f);
            (cp > 0xffff && cp < 0x110000).then_some((cp, 4))
        }
    }
}

/// Decodes `buf` into text.
///
/// Never fails: each byte that does not start a valid sequence becomes one
/// U+FFFD.
pub fn decode(buf: &[u8]) -> String {
    let mut out = String::with_capacity(buf.len());
    let mut i = 0;
    while i < buf.len() {
        // ASCII run
        let b = buf[i];
        if b < 0x80 {
            out.push(b as char);
            i += 1;
            continue;
        }
        match decode_at(buf, i) {
            Some((cp, width)) => {
                out.push(char::from_u32(cp).unwrap_or(REPLACEMENT));
                i += width;
            }
            None => {
                out.push(REPLACEMENT);
                i += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes_per_width_class() {
        assert_eq!(utf8_size(""), 0);
        assert_eq!(utf8_size("a"), 1);
        assert_eq!(utf8_size("α"), 2);
        assert_eq!(utf8_size("\u{7ff}"), 2);
        assert_eq!(utf8_size("\u{800}"), 3);
        assert_eq!(utf8_size("亜"), 3);
        assert_eq!(utf8_size("\u{1F426}"), 4);
        assert_eq!(utf8_size("WALL·E – Typeset in the Future"), "WALL·E – Typeset in the Future".len());
    }

    #[test]
    fn test_encode_matches_std() {
        for s in ["", "hello", "α", "亜", "\u{1F426}", "\u{500}\u{7ff}\u{ffff}", "mixed ü 漢 🐦"] {
            assert_eq!(encode(s), s.as_bytes(), "encoding {s:?}");
        }
    }

    #[test]
    fn test_decode_roundtrip() {
        for s in ["", "plain ascii", "café", "亜", "\u{1F426}\u{1F426}", "\u{10FFFF}"] {
            assert_eq!(decode(&encode(s)), s);
        }
    }

    #[test]
    fn test_decode_replaces_lone_continuation() {
        assert_eq!(decode(&[b'a', 0x80, b'b']), "a\u{FFFD}b");
    }

    #[test]
    fn test_decode_rejects_overlong() {
        // 0xc0 0xaf is an overlong '/'
        assert_eq!(decode(&[0xc0, 0xaf]), "\u{FFFD}\u{FFFD}");
        // overlong three-byte form of U+0500
        assert_eq!(decode(&[0xe0, 0x94, 0x80]), "\u{FFFD}\u{FFFD}\u{FFFD}");
    }

    #[test]
    fn test_decode_rejects_surrogates_and_out_of_range() {
        assert_eq!(decode(&[0xed, 0xa0, 0x80]), "\u{FFFD}\u{FFFD}\u{FFFD}");
        assert_eq!(decode(&[0xf4, 0x90, 0x80, 0x80]).chars().count(), 4);
    }

    #[test]
    fn test_decode_truncated_sequence() {
        assert_eq!(decode(&[0xe4, 0xba]), "\u{FFFD}\u{FFFD}");
    }

    proptest::proptest! {
        #[test]
        fn prop_roundtrip_any_string(s in "\\PC*") {
            proptest::prop_assert_eq!(decode(&encode(&s)), s.clone());
            proptest::prop_assert_eq!(utf8_size(&s), s.len());
        }
    }
}
