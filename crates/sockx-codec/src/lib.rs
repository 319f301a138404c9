//! # sockx-codec: Length-Prefix Header Codec
//!
//! Framed protocols built on the buffering layer prefix each message body
//! with a 1–4 byte big-endian length. This crate decodes and encodes that
//! prefix; the consumption loop itself lives in `BufferDriver::read_frame`.

use sockx_core::SockXError;

/// Decodes a 1–4 byte big-endian length prefix.
///
/// Any other length is an `InvalidHeader` structural error: a malformed
/// peer, not a retry case.
pub fn decode_header(raw: &[u8]) -> Result<usize, SockXError> {
    if raw.is_empty() || raw.len() > 4 {
        return Err(SockXError::InvalidHeader(raw.len()));
    }
    let mut sz = 0usize;
    for &byte in raw {
        sz = (sz << 8) | byte as usize;
    }
    Ok(sz)
}

/// Encodes `value` as a big-endian prefix of exactly `width` bytes.
///
/// `width` must be 1–4 and `value` must fit in it; both violations report
/// `InvalidHeader` with the offending width.
pub fn encode_header(value: usize, width: usize) -> Result<Vec<u8>, SockXError> {
    if width == 0 || width > 4 {
        return Err(SockXError::InvalidHeader(width));
    }
    if width < 4 && value >> (width * 8) != 0 {
        return Err(SockXError::InvalidHeader(width));
    }
    if width == 4 && value > u32::MAX as usize {
        return Err(SockXError::InvalidHeader(width));
    }
    let mut out = Vec::with_capacity(width);
    for i in (0..width).rev() {
        out.push((value >> (i * 8)) as u8);
    }
    Ok(out)
}
