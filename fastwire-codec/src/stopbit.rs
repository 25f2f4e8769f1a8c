//! Stop-bit integer primitives.
//!
//! FAST integers are variable length: 7 payload bits per byte, most
//! significant byte first, with the high bit of the final byte set as a
//! terminator. The signed variant sign-extends from the first byte's top
//! payload bit (0x40).
//!
//! Optional fields reserve the all-zero encoding as a null sentinel. A
//! non-negative payload is therefore shifted up by one before encoding and
//! back down after decoding; [`check_null`] and [`shift_for_null`] are the
//! two halves of that bijection.

use crate::error::FastError;
use bytes::{BufMut, BytesMut};
use fastwire_core::FastInt;

/// The null sentinel: a stop-bit encoded zero in a single byte.
pub const NULL_BYTE: u8 = 0x80;

/// Longest accepted stop-bit integer (64 payload bits over 7-bit groups).
const MAX_VARINT_BYTES: usize = 10;

/// Decodes an unsigned stop-bit integer, advancing `pos`.
///
/// # Errors
/// `UnexpectedEof` on truncated input, `IntegerOverflow` past u64 range.
pub fn decode_uint(data: &[u8], pos: &mut usize) -> Result<u64, FastError> {
    let mut result: u64 = 0;

    loop {
        if *pos >= data.len() {
            return Err(FastError::UnexpectedEof);
        }

        let byte = data[*pos];
        *pos += 1;

        if result > (u64::MAX >> 7) {
            return Err(FastError::IntegerOverflow);
        }

        result = (result << 7) | u64::from(byte & 0x7F);

        if byte & 0x80 != 0 {
            break;
        }
    }

    Ok(result)
}

/// Decodes a signed stop-bit integer, advancing `pos`.
///
/// # Errors
/// `UnexpectedEof` on truncated input, `IntegerOverflow` on overlong input.
pub fn decode_int(data: &[u8], pos: &mut usize) -> Result<i64, FastError> {
    let Some(&first) = data.get(*pos) else {
        return Err(FastError::UnexpectedEof);
    };
    let negative = first & 0x40 != 0;

    let mut result: i64 = if negative { -1 } else { 0 };
    let mut length = 0;

    loop {
        if *pos >= data.len() {
            return Err(FastError::UnexpectedEof);
        }

        let byte = data[*pos];
        *pos += 1;
        length += 1;

        if length > MAX_VARINT_BYTES {
            return Err(FastError::IntegerOverflow);
        }

        result = (result << 7) | i64::from(byte & 0x7F);

        if byte & 0x80 != 0 {
            break;
        }
    }

    Ok(result)
}

/// Encodes an unsigned integer with minimal length.
pub fn encode_uint(buf: &mut BytesMut, value: u64) {
    // 7-bit groups, least significant first
    let mut groups = [0u8; MAX_VARINT_BYTES];
    let mut count = 0;
    let mut v = value;

    loop {
        groups[count] = (v & 0x7F) as u8;
        count += 1;
        v >>= 7;
        if v == 0 {
            break;
        }
    }

    for i in (1..count).rev() {
        buf.put_u8(groups[i]);
    }
    buf.put_u8(groups[0] | 0x80);
}

/// Encodes a signed integer with minimal length.
///
/// The leading byte keeps exactly one copy of the sign in its 0x40 bit so
/// the decoder's sign extension reproduces the value.
pub fn encode_int(buf: &mut BytesMut, value: i64) {
    let mut groups = [0u8; MAX_VARINT_BYTES];
    let mut count = 0;
    let mut v = value;

    loop {
        groups[count] = (v & 0x7F) as u8;
        count += 1;
        v >>= 7;
        let sign_settled = if value < 0 {
            v == -1 && groups[count - 1] & 0x40 != 0
        } else {
            v == 0 && groups[count - 1] & 0x40 == 0
        };
        if sign_settled {
            break;
        }
    }

    for i in (1..count).rev() {
        buf.put_u8(groups[i]);
    }
    buf.put_u8(groups[0] | 0x80);
}

/// Decode half of the optional-field null channel.
///
/// Returns true (and leaves `value` alone) when the wire value was the null
/// sentinel; otherwise shifts positive values down by one so the caller sees
/// the original payload. Negative values pass through unchanged.
pub fn check_null<T: FastInt>(value: &mut T) -> bool {
    let is_null = value.is_zero();
    if *value > T::zero() {
        *value = *value - T::one();
    }
    is_null
}

/// Encode half of the optional-field null channel: non-negative values are
/// shifted up by one to stay clear of the null sentinel.
#[must_use]
pub fn shift_for_null<T: FastInt>(value: T) -> T {
    if value >= T::zero() {
        value.add_delta(1)
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded_uint(value: u64) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_uint(&mut buf, value);
        buf.to_vec()
    }

    fn encoded_int(value: i64) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_int(&mut buf, value);
        buf.to_vec()
    }

    #[test]
    fn test_encode_uint_known_vectors() {
        assert_eq!(encoded_uint(0), vec![0x80]);
        assert_eq!(encoded_uint(1), vec![0x81]);
        assert_eq!(encoded_uint(127), vec![0xFF]);
        assert_eq!(encoded_uint(128), vec![0x01, 0x80]);
        assert_eq!(encoded_uint(942), vec![0x07, 0xAE]);
        // the canonical example from the FAST specification
        assert_eq!(encoded_uint(942_755), vec![0x39, 0x45, 0xA3]);
    }

    #[test]
    fn test_encode_int_known_vectors() {
        assert_eq!(encoded_int(0), vec![0x80]);
        assert_eq!(encoded_int(1), vec![0x81]);
        assert_eq!(encoded_int(63), vec![0xBF]);
        // 64 needs a leading zero byte to keep the sign bit clear
        assert_eq!(encoded_int(64), vec![0x00, 0xC0]);
        assert_eq!(encoded_int(-1), vec![0xFF]);
        assert_eq!(encoded_int(-64), vec![0xC0]);
        assert_eq!(encoded_int(-65), vec![0x7F, 0xBF]);
        assert_eq!(encoded_int(942_755), vec![0x39, 0x45, 0xA3]);
        assert_eq!(encoded_int(-942_755), vec![0x46, 0x3A, 0xDD]);
    }

    #[test]
    fn test_uint_round_trip() {
        for value in [0, 1, 127, 128, 942, 1u64 << 35, u64::MAX] {
            let bytes = encoded_uint(value);
            let mut pos = 0;
            assert_eq!(decode_uint(&bytes, &mut pos).unwrap(), value);
            assert_eq!(pos, bytes.len());
        }
    }

    #[test]
    fn test_int_round_trip() {
        for value in [0, 1, -1, 63, 64, -64, -65, i64::MAX, i64::MIN] {
            let bytes = encoded_int(value);
            let mut pos = 0;
            assert_eq!(decode_int(&bytes, &mut pos).unwrap(), value);
            assert_eq!(pos, bytes.len());
        }
    }

    #[test]
    fn test_decode_truncated() {
        let mut pos = 0;
        assert_eq!(
            decode_uint(&[0x00, 0x01], &mut pos),
            Err(FastError::UnexpectedEof)
        );

        let mut pos = 0;
        assert_eq!(decode_int(&[], &mut pos), Err(FastError::UnexpectedEof));
    }

    #[test]
    fn test_decode_overlong() {
        let overlong = [0x7F; 11];
        let mut pos = 0;
        assert_eq!(
            decode_uint(&overlong, &mut pos),
            Err(FastError::IntegerOverflow)
        );

        let mut pos = 0;
        assert_eq!(
            decode_int(&overlong, &mut pos),
            Err(FastError::IntegerOverflow)
        );
    }

    #[test]
    fn test_null_channel_bijection() {
        for value in [0u32, 1, 100, u32::MAX - 1] {
            let mut shifted = shift_for_null(value);
            assert!(!check_null(&mut shifted));
            assert_eq!(shifted, value);
        }

        // negative payloads pass through both halves untouched
        let mut negative = shift_for_null(-7i32);
        assert_eq!(negative, -7);
        assert!(!check_null(&mut negative));
        assert_eq!(negative, -7);

        let mut zero = 0i64;
        assert!(check_null(&mut zero));
    }
}
