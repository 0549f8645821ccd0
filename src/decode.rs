//! Fixed-width primitive array decoding.
//!
//! Decoding is pure: it works on a byte slice that already holds exactly
//! `count × size_of element` bytes, with an explicit [`ByteOrder`]. The
//! stream side (how many bytes to pull, what to do when they run out) lives in
//! the crate's internal `utils::read_values` / `utils::bytesv`, which every
//! typed read on [`crate::reader::StreamReader`] goes through.
//!
//! | Kind   | Size |
//! |--------|------|
//! | `bool` | 1    |
//! | `i16` / `u16` | 2 |
//! | `i32` / `u32` | 4 |
//! | `f32`  | 4    |
//! | `f64`  | 8    |

use byteorder::{BigEndian, LittleEndian};

use crate::endian::ByteOrder;
use crate::{Error, Result};

/// A value that can be decoded from a fixed number of bytes.
pub trait Primitive: Copy + Default {
    /// Encoded size in bytes.
    const SIZE: usize;

    /// Decode `dst.len()` values from `src` in byte order `B`.
    ///
    /// `src.len()` must equal `dst.len() * Self::SIZE`.
    fn decode_into<B: byteorder::ByteOrder>(src: &[u8], dst: &mut [Self]);
}

impl Primitive for bool {
    const SIZE: usize = 1;

    fn decode_into<B: byteorder::ByteOrder>(src: &[u8], dst: &mut [Self]) {
        for (d, &b) in dst.iter_mut().zip(src) {
            *d = b != 0;
        }
    }
}

macro_rules! impl_primitive {
    ($($ty:ty => $size:expr, $read_into:ident;)*) => {
        $(
            impl Primitive for $ty {
                const SIZE: usize = $size;

                #[inline]
                fn decode_into<B: byteorder::ByteOrder>(src: &[u8], dst: &mut [Self]) {
                    B::$read_into(src, dst);
                }
            }
        )*
    };
}

impl_primitive! {
    i16 => 2, read_i16_into;
    u16 => 2, read_u16_into;
    i32 => 4, read_i32_into;
    u32 => 4, read_u32_into;
    f32 => 4, read_f32_into;
    f64 => 8, read_f64_into;
}

/// Number of bytes `count` values of `T` occupy.
///
/// Saturates instead of overflowing so that an absurd count can never match
/// a real buffer length.
#[inline]
pub fn byte_len<T: Primitive>(count: usize) -> usize {
    count.saturating_mul(T::SIZE)
}

/// Decode exactly `count` values of `T` from `buf`.
///
/// Returns [`Error::InvalidCount`] if `count` is zero, or
/// [`Error::TruncatedBuffer`] if `buf` is not exactly
/// [`byte_len::<T>(count)`](byte_len) bytes long. Nothing is decoded on
/// failure.
pub fn decode<T: Primitive>(order: ByteOrder, count: usize, buf: &[u8]) -> Result<Vec<T>> {
    if count == 0 {
        return Err(Error::InvalidCount);
    }
    let expected = byte_len::<T>(count);
    if buf.len() != expected {
        return Err(Error::TruncatedBuffer {
            expected,
            actual: buf.len(),
        });
    }

    let mut out = vec![T::default(); count];
    match order {
        ByteOrder::Little => T::decode_into::<LittleEndian>(buf, &mut out),
        ByteOrder::Big => T::decode_into::<BigEndian>(buf, &mut out),
    }
    Ok(out)
}

/// Decode three floats as an `[x, y, z]` vector.
pub fn decode_vector3(order: ByteOrder, buf: &[u8]) -> Result<[f32; 3]> {
    let v = decode::<f32>(order, 3, buf)?;
    Ok([v[0], v[1], v[2]])
}

/// Decode four floats as a quaternion, in stream order.
pub fn decode_quaternion(order: ByteOrder, buf: &[u8]) -> Result<[f32; 4]> {
    let q = decode::<f32>(order, 4, buf)?;
    Ok([q[0], q[1], q[2], q[3]])
}
