//! Variable-length integer codecs.
//!
//! Signed values use zig-zag encoding, so small negative numbers stay short.
//!
//! # References
//! - <https://kafka.apache.org/protocol#protocol_types>
//! - <https://developers.google.com/protocol-buffers/docs/encoding#varints>

use bytes::{Buf, BufMut};
use integer_encoding::VarInt;

use crate::error::{Error, Result};

const MAX_VARINT_LEN: usize = 5;
const MAX_VARLONG_LEN: usize = 10;

/// Largest final byte that still fits 32 (resp. 64) bits.
const MAX_VARINT_LAST: u8 = 0x0f;
const MAX_VARLONG_LAST: u8 = 0x01;

/// Pull the raw bytes of one varint, at most `max_len` of them.
///
/// A byte in the last position must not exceed `max_last`, otherwise the
/// value would overflow the target width.
fn read_raw<B: Buf>(
    buf: &mut B,
    max_len: usize,
    max_last: u8,
    out: &mut [u8; MAX_VARLONG_LEN],
) -> Result<usize> {
    for (i, slot) in out.iter_mut().enumerate().take(max_len) {
        if !buf.has_remaining() {
            return Err(Error::Malformed(format!("truncated varint after {i} bytes")));
        }
        let b = buf.get_u8();
        *slot = b;
        if i + 1 == max_len && b > max_last {
            return Err(Error::Malformed(format!(
                "varint overflows {} bits",
                if max_len == MAX_VARINT_LEN { 32 } else { 64 }
            )));
        }
        if b & 0x80 == 0 {
            return Ok(i + 1);
        }
    }
    Err(Error::Malformed(format!("varint is longer than {max_len} bytes")))
}

fn decode<T: VarInt>(raw: &[u8]) -> Result<T> {
    T::decode_var(raw)
        .map(|(v, _)| v)
        .ok_or_else(|| Error::Malformed("cannot decode varint".to_owned()))
}

fn write<T: VarInt, B: BufMut>(value: T, buf: &mut B) {
    let mut scratch = [0u8; MAX_VARLONG_LEN];
    let n = value.encode_var(&mut scratch);
    buf.put_slice(&scratch[..n]);
}

/// Read a zig-zag encoded 32-bit varint.
pub fn read_varint<B: Buf>(buf: &mut B) -> Result<i32> {
    let mut raw = [0u8; MAX_VARLONG_LEN];
    let n = read_raw(buf, MAX_VARINT_LEN, MAX_VARINT_LAST, &mut raw)?;
    decode(&raw[..n])
}

/// Read a zig-zag encoded 64-bit varlong.
pub fn read_varlong<B: Buf>(buf: &mut B) -> Result<i64> {
    let mut raw = [0u8; MAX_VARLONG_LEN];
    let n = read_raw(buf, MAX_VARLONG_LEN, MAX_VARLONG_LAST, &mut raw)?;
    decode(&raw[..n])
}

/// Read an unsigned 32-bit varint.
pub fn read_unsigned_varint<B: Buf>(buf: &mut B) -> Result<u32> {
    let mut raw = [0u8; MAX_VARLONG_LEN];
    let n = read_raw(buf, MAX_VARINT_LEN, MAX_VARINT_LAST, &mut raw)?;
    decode(&raw[..n])
}

pub fn write_varint<B: BufMut>(value: i32, buf: &mut B) {
    write(value, buf)
}

pub fn write_varlong<B: BufMut>(value: i64, buf: &mut B) {
    write(value, buf)
}

pub fn write_unsigned_varint<B: BufMut>(value: u32, buf: &mut B) {
    write(value, buf)
}

/// Encoded length of `value` as a zig-zag varint.
pub fn size_of_varint(value: i32) -> usize {
    value.required_space()
}

pub fn size_of_varlong(value: i64) -> usize {
    value.required_space()
}

pub fn size_of_unsigned_varint(value: u32) -> usize {
    value.required_space()
}
