//! # Wire Primitives
//!
//! Fixed-width big-endian integers and NUL-terminated strings, read from and
//! written into caller-owned slices. The slice length is the capacity (for
//! encoders) or the available input (for decoders); nothing here ever reads
//! or writes outside it.
//!
//! Encoders return the number of bytes written, decoders the value plus the
//! number of bytes consumed.

use crate::error::constants::{
    ERR_INTERIOR_NUL, ERR_INVALID_UTF8, FIELD_STRING, FIELD_UINT16, FIELD_UINT32,
};
use crate::error::{CodecError, Result};

/// Width of every u16 field on the wire
pub const U16_LEN: usize = 2;

/// Width of a u32 field (two u16 halves)
pub const U32_LEN: usize = 4;

/// Write `v` big-endian into the first two bytes of `buf`.
#[inline]
pub fn encode_u16(v: u16, buf: &mut [u8]) -> Result<usize> {
    if buf.len() < U16_LEN {
        return Err(CodecError::too_small(U16_LEN, buf.len()));
    }
    buf[..U16_LEN].copy_from_slice(&v.to_be_bytes());
    Ok(U16_LEN)
}

/// Read a big-endian u16 from the front of `buf`.
#[inline]
pub fn decode_u16(buf: &[u8]) -> Result<(u16, usize)> {
    match buf {
        [hi, lo, ..] => Ok((u16::from_be_bytes([*hi, *lo]), U16_LEN)),
        _ => Err(CodecError::Truncated(FIELD_UINT16)),
    }
}

/// Write `v` as two u16 halves, high half first.
pub fn encode_u32(v: u32, buf: &mut [u8]) -> Result<usize> {
    if buf.len() < U32_LEN {
        return Err(CodecError::too_small(U32_LEN, buf.len()));
    }
    let hi = (v >> 16) as u16;
    let lo = (v & 0xFFFF) as u16;

    let mut off = encode_u16(hi, buf)?;
    off += encode_u16(lo, &mut buf[off..])?;
    Ok(off)
}

/// Read a u32 stored as two u16 halves. A short second half is a truncation
/// of the whole field.
pub fn decode_u32(buf: &[u8]) -> Result<(u32, usize)> {
    let (hi, n1) = decode_u16(buf).map_err(|_| CodecError::Truncated(FIELD_UINT32))?;
    let (lo, n2) = decode_u16(&buf[n1..]).map_err(|_| CodecError::Truncated(FIELD_UINT32))?;
    Ok(((u32::from(hi) << 16) | u32::from(lo), n1 + n2))
}

/// Encoded length of `v` including its terminator.
#[inline]
pub fn str_len(v: &str) -> usize {
    v.len() + 1
}

/// Write `v` followed by a single NUL.
///
/// # Errors
/// - `BufferTooSmall` if `buf` cannot hold `v.len() + 1` bytes
/// - `Malformed` if `v` contains a NUL, which the wire format cannot carry
pub fn encode_str(v: &str, buf: &mut [u8]) -> Result<usize> {
    let needed = str_len(v);
    if buf.len() < needed {
        return Err(CodecError::too_small(needed, buf.len()));
    }
    if v.as_bytes().contains(&0) {
        return Err(CodecError::Malformed(ERR_INTERIOR_NUL));
    }
    buf[..v.len()].copy_from_slice(v.as_bytes());
    buf[v.len()] = 0;
    Ok(needed)
}

/// Read text up to the first NUL in `buf`, consuming the NUL.
///
/// # Errors
/// - `Truncated` if there is no terminator
/// - `Malformed` if the text is not valid UTF-8
pub fn decode_str(buf: &[u8]) -> Result<(String, usize)> {
    decode_field_str(buf, FIELD_STRING)
}

/// [`decode_str`] reporting a missing terminator against `field`.
pub(crate) fn decode_field_str(buf: &[u8], field: &'static str) -> Result<(String, usize)> {
    let end = find_nul(buf).ok_or(CodecError::Truncated(field))?;
    Ok((text_from_wire(&buf[..end])?, end + 1))
}

/// Owned text from wire bytes. Invalid UTF-8 is refused so that decoded text
/// always re-encodes to the bytes it came from.
pub(crate) fn text_from_wire(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|_| CodecError::Malformed(ERR_INVALID_UTF8))
}

/// Position of the first NUL byte, if any.
#[inline]
pub(crate) fn find_nul(buf: &[u8]) -> Option<usize> {
    buf.iter().position(|&b| b == 0)
}
