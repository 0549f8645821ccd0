//! Low-level I/O primitives shared by the reader components.
//!
//! Unlike a bare `read_exact`, [`bytesv`] hands back whatever the stream
//! produced so that callers can report how short a read came up.

use std::io::{ErrorKind, Read};

use crate::Result;
use crate::decode::{Primitive, byte_len, decode};
use crate::endian::ByteOrder;

/// Largest buffer reserved before any bytes have been read.
const MAX_PREALLOC: usize = 64 * 1024;

/// Read one byte, or [`None`] at end of stream.
#[inline]
pub(crate) fn u8<R: Read>(r: &mut R) -> Result<Option<u8>> {
    let mut b = [0u8; 1];
    loop {
        match r.read(&mut b) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(b[0])),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Read up to `len` bytes into a `Vec`.
///
/// The result is shorter than `len` only when the stream ran out. `len` may
/// come from corrupt data, so the up-front allocation is capped and the
/// buffer grows only as bytes actually arrive.
#[inline]
pub(crate) fn bytesv<R: Read>(r: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut b = Vec::with_capacity(len.min(MAX_PREALLOC));
    r.by_ref().take(len as u64).read_to_end(&mut b)?;
    Ok(b)
}

/// Read and decode `count` values of `T`.
///
/// A stream that runs out early yields [`crate::Error::TruncatedBuffer`].
#[inline]
pub(crate) fn read_values<T: Primitive, R: Read>(
    r: &mut R,
    order: ByteOrder,
    count: usize,
) -> Result<Vec<T>> {
    if count == 0 {
        return Err(crate::Error::InvalidCount);
    }
    let buf = bytesv(r, byte_len::<T>(count))?;
    decode(order, count, &buf)
}

/// Read and decode a single value of `T`.
#[inline]
pub(crate) fn read_value<T: Primitive, R: Read>(r: &mut R, order: ByteOrder) -> Result<T> {
    Ok(read_values::<T, R>(r, order, 1)?[0])
}

/// Read a `\n`-terminated line byte-by-byte from a reader.
///
/// The terminator is consumed but not returned, and a trailing `\r` is
/// dropped. When `limit` is given at most that many bytes are consumed.
/// Reaching the end of the stream ends the line.
pub(crate) fn read_line<R: Read>(r: &mut R, limit: Option<usize>) -> Result<String> {
    let mut bytes = Vec::new();
    let mut consumed = 0usize;
    while limit.is_none_or(|max| consumed < max) {
        let Some(b) = u8(r)? else { break };
        consumed += 1;
        if b == b'\n' {
            break;
        }
        bytes.push(b);
    }
    if bytes.last() == Some(&b'\r') {
        bytes.pop();
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
