//! The stream reader facade.
//!
//! [`StreamReader`] ties the pieces together for one read session:
//!
//! 1. [`determine_endianness`](StreamReader::determine_endianness) peeks the
//!    byte-order mark (or [`set_endianness`](StreamReader::set_endianness)
//!    forces one).
//! 2. [`read_file_header`](StreamReader::read_file_header) checks the header
//!    id and version.
//! 3. The caller walks chunks with [`read_chunk`](StreamReader::read_chunk),
//!    [`push_inner_chunk`](StreamReader::push_inner_chunk) and
//!    [`pop_inner_chunk`](StreamReader::pop_inner_chunk), decoding payload
//!    fields with the typed `read_*` methods.
//!
//! The reader assigns no meaning to chunk ids; that belongs to the asset
//! format built on top of it.
//!
//! ## Example
//! ```
//! use std::io::Cursor;
//!
//! use ogrekit::reader::StreamReader;
//!
//! let mut data = vec![0x00, 0x10];
//! data.extend_from_slice(b"[Serializer_v1.00]\n");
//! data.extend_from_slice(&[0x00, 0x40, 18, 0, 0, 0]);
//! for v in [1.0f32, 2.0, 3.0] {
//!     data.extend_from_slice(&v.to_le_bytes());
//! }
//!
//! let mut reader = StreamReader::new(Cursor::new(data));
//! reader.determine_endianness()?;
//! reader.read_file_header()?;
//! let chunk = reader.read_chunk()?;
//! assert_eq!(chunk.id, 0x4000);
//! assert_eq!(reader.read_vector3()?, [1.0, 2.0, 3.0]);
//! # Ok::<(), ogrekit::Error>(())
//! ```

use std::io::{Read, Seek, SeekFrom};

use crate::chunk::{CHUNK_HEADER_SIZE, ChunkHeader, ChunkMismatch, ChunkStack};
use crate::config::ReaderConfig;
use crate::decode::{Primitive, byte_len, decode_quaternion, decode_vector3};
use crate::endian::ByteOrder;
use crate::header::read_file_header;
use crate::utils::{bytesv, read_line, read_values};
use crate::{Error, Result};

/// Reader for one chunked stream.
///
/// Owns the underlying reader; pass `&mut file` to keep ownership on the
/// caller's side, and use [`into_inner`](Self::into_inner) to get it back.
pub struct StreamReader<R> {
    inner: R,
    config: ReaderConfig,
    byte_order: Option<ByteOrder>,
    chunks: ChunkStack,
    diagnostics: Vec<ChunkMismatch>,
}

impl<R: Read + Seek> StreamReader<R> {
    /// Wrap `inner` with the default configuration.
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, ReaderConfig::default())
    }

    /// Wrap `inner` with an explicit configuration.
    pub fn with_config(inner: R, config: ReaderConfig) -> Self {
        Self {
            inner,
            config,
            byte_order: None,
            chunks: ChunkStack::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Session configuration.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// The byte order fixed for this session, if any.
    ///
    /// Until one is set, reads use [`ByteOrder::native`].
    pub fn byte_order(&self) -> Option<ByteOrder> {
        self.byte_order
    }

    fn order(&self) -> ByteOrder {
        self.byte_order.unwrap_or(ByteOrder::native())
    }

    /// Detect the stream's byte order from its first two bytes.
    ///
    /// Must be the first access to the stream: the cursor has to be at 0, and
    /// it is left there. Fails with [`Error::EndiannessAlreadySet`] if the
    /// byte order was already fixed.
    pub fn determine_endianness(&mut self) -> Result<ByteOrder> {
        if self.byte_order.is_some() {
            return Err(Error::EndiannessAlreadySet);
        }
        let order = ByteOrder::detect(&mut self.inner)?;
        tracing::debug!(stream = %self.config.stream_name, %order, "detected endianness");
        self.byte_order = Some(order);
        Ok(order)
    }

    /// Force the byte order instead of detecting it.
    ///
    /// Useful when the header was already consumed elsewhere. Textual
    /// overrides (`"little"` / `"big"`) parse into a [`ByteOrder`] first.
    pub fn set_endianness(&mut self, order: ByteOrder) -> Result<()> {
        if self.byte_order.is_some() {
            return Err(Error::EndiannessAlreadySet);
        }
        tracing::debug!(stream = %self.config.stream_name, %order, "endianness set explicitly");
        self.byte_order = Some(order);
        Ok(())
    }

    /// Consume the file header and check its version against the
    /// configured one.
    pub fn read_file_header(&mut self) -> Result<()> {
        let order = self.order();
        read_file_header(&mut self.inner, order, &self.config.version)
    }

    /// Read the next chunk header.
    ///
    /// If a chunk is open, a header that does not start where that chunk was
    /// expected to end is reported, and the open chunk's end is then taken
    /// from the new header's length.
    pub fn read_chunk(&mut self) -> Result<ChunkHeader> {
        let order = self.order();
        let (header, mismatch) = self.chunks.read_header(&mut self.inner, order)?;
        if let Some(mismatch) = mismatch {
            self.report(mismatch);
        }
        Ok(header)
    }

    /// Enter the payload of a chunk that holds nested chunks.
    pub fn push_inner_chunk(&mut self) -> Result<()> {
        self.chunks.push(&mut self.inner)
    }

    /// Leave the innermost chunk.
    ///
    /// Returns `false` if the cursor was not at the chunk's expected end. The
    /// mismatch is reported but never raised; callers that want strict
    /// parsing act on the return value.
    pub fn pop_inner_chunk(&mut self) -> Result<bool> {
        match self.chunks.pop(&mut self.inner)? {
            Some(mismatch) => {
                self.report(mismatch);
                Ok(false)
            }
            None => Ok(true),
        }
    }

    /// Undo the chunk header just read by [`read_chunk`](Self::read_chunk),
    /// so it can be read again as something else.
    pub fn backpedal_chunk_header(&mut self) -> Result<()> {
        self.chunks.backpedal(&mut self.inner)
    }

    /// Skip the payload of a chunk whose header was just read.
    pub fn skip_chunk(&mut self, header: &ChunkHeader) -> Result<()> {
        // payload_len() is at most u32::MAX - 6, so the cast cannot wrap.
        self.inner
            .seek(SeekFrom::Current(header.payload_len() as i64))?;
        Ok(())
    }

    /// Size of a chunk header in bytes.
    pub const fn chunk_header_size() -> u64 {
        CHUNK_HEADER_SIZE
    }

    /// Read `count` values of any [`Primitive`] kind.
    pub fn read_array<T: Primitive>(&mut self, count: usize) -> Result<Vec<T>> {
        let order = self.order();
        read_values(&mut self.inner, order, count)
    }

    /// Read `count` booleans, one byte each.
    pub fn read_bools(&mut self, count: usize) -> Result<Vec<bool>> {
        self.read_array(count)
    }

    /// Read `count` 16-bit signed integers.
    pub fn read_i16s(&mut self, count: usize) -> Result<Vec<i16>> {
        self.read_array(count)
    }

    /// Read `count` 16-bit unsigned integers.
    pub fn read_u16s(&mut self, count: usize) -> Result<Vec<u16>> {
        self.read_array(count)
    }

    /// Read `count` 32-bit signed integers.
    pub fn read_i32s(&mut self, count: usize) -> Result<Vec<i32>> {
        self.read_array(count)
    }

    /// Read `count` 32-bit unsigned integers.
    pub fn read_u32s(&mut self, count: usize) -> Result<Vec<u32>> {
        self.read_array(count)
    }

    /// Read `count` 32-bit floats.
    pub fn read_f32s(&mut self, count: usize) -> Result<Vec<f32>> {
        self.read_array(count)
    }

    /// Read `count` 64-bit floats.
    pub fn read_f64s(&mut self, count: usize) -> Result<Vec<f64>> {
        self.read_array(count)
    }

    /// Read three floats as an `[x, y, z]` vector.
    pub fn read_vector3(&mut self) -> Result<[f32; 3]> {
        let order = self.order();
        let buf = bytesv(&mut self.inner, byte_len::<f32>(3))?;
        decode_vector3(order, &buf)
    }

    /// Read four floats as a quaternion, in stream order.
    pub fn read_quaternion(&mut self) -> Result<[f32; 4]> {
        let order = self.order();
        let buf = bytesv(&mut self.inner, byte_len::<f32>(4))?;
        decode_quaternion(order, &buf)
    }

    /// Read a `\n`-terminated string, consuming at most `limit` bytes.
    pub fn read_string(&mut self, limit: Option<usize>) -> Result<String> {
        read_line(&mut self.inner, limit)
    }

    /// Current absolute stream offset.
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// Whether the cursor is at (or past) the end of the stream.
    pub fn is_eof(&mut self) -> Result<bool> {
        let position = self.inner.stream_position()?;
        let end = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(position))?;
        Ok(position >= end)
    }

    /// Nesting depth of the chunk stack.
    pub fn chunk_depth(&self) -> usize {
        self.chunks.depth()
    }

    /// Chunk mismatches reported so far.
    pub fn diagnostics(&self) -> &[ChunkMismatch] {
        &self.diagnostics
    }

    /// Take the reported mismatches, leaving the list empty.
    pub fn take_diagnostics(&mut self) -> Vec<ChunkMismatch> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Borrow the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutably borrow the underlying reader.
    ///
    /// Moving the cursor behind the reader's back will show up as chunk
    /// mismatches.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// End the session, returning the inner reader.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn report(&mut self, mut mismatch: ChunkMismatch) {
        if !self.config.report_chunk_errors {
            return;
        }
        mismatch.stream.clone_from(&self.config.stream_name);
        tracing::warn!(
            stream = %self.config.stream_name,
            chunk_id = ?mismatch.chunk_id,
            expected = mismatch.expected,
            position = mismatch.position,
            depth = mismatch.depth,
            "corrupted chunk detected"
        );
        self.diagnostics.push(mismatch);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn le_chunk(id: u16, length: u32) -> Vec<u8> {
        [&id.to_le_bytes()[..], &length.to_le_bytes()].concat()
    }

    #[test]
    fn test_reader_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<StreamReader<Cursor<Vec<u8>>>>();
    }

    #[test]
    fn test_endianness_set_once() {
        let mut reader = StreamReader::new(Cursor::new(vec![0x10, 0x00]));
        assert_eq!(reader.determine_endianness().unwrap(), ByteOrder::Big);
        assert!(matches!(
            reader.determine_endianness(),
            Err(Error::EndiannessAlreadySet)
        ));
        assert!(matches!(
            reader.set_endianness(ByteOrder::Little),
            Err(Error::EndiannessAlreadySet)
        ));
        assert_eq!(reader.byte_order(), Some(ByteOrder::Big));
    }

    #[test]
    fn test_explicit_endianness_mid_stream() {
        let mut data = vec![0xAA; 3];
        data.extend(7u32.to_be_bytes());
        let mut reader = StreamReader::new(Cursor::new(data));
        reader.get_mut().set_position(3);
        reader.set_endianness("big".parse().unwrap()).unwrap();
        assert_eq!(reader.read_u32s(1).unwrap(), vec![7]);
    }

    #[test]
    fn test_unset_order_reads_native() {
        let data = 0x1234u16.to_ne_bytes().to_vec();
        let mut reader = StreamReader::new(Cursor::new(data));
        assert_eq!(reader.byte_order(), None);
        assert_eq!(reader.read_u16s(1).unwrap(), vec![0x1234]);
    }

    #[test]
    fn test_pop_flag_and_diagnostics() {
        let mut data = le_chunk(0x3000, 10);
        data.extend([1, 2, 3, 4]);
        let config = ReaderConfig::new().with_stream_name("ogrehead.mesh");
        let mut reader = StreamReader::with_config(Cursor::new(data), config);
        reader.set_endianness(ByteOrder::Little).unwrap();

        reader.push_inner_chunk().unwrap();
        reader.read_chunk().unwrap();
        reader.read_u16s(1).unwrap();
        assert!(!reader.pop_inner_chunk().unwrap());
        assert_eq!(reader.diagnostics().len(), 1);
        assert_eq!(reader.diagnostics()[0].expected, 10);
        assert_eq!(reader.diagnostics()[0].position, 8);
        assert_eq!(reader.diagnostics()[0].stream, "ogrehead.mesh");
        assert!(reader.diagnostics()[0].to_string().contains("ogrehead.mesh"));

        assert_eq!(reader.take_diagnostics().len(), 1);
        assert!(reader.diagnostics().is_empty());
    }

    #[test]
    fn test_reporting_disabled_still_flags() {
        let data = le_chunk(0x3000, 6);
        let config = ReaderConfig::new().with_chunk_error_reporting(false);
        let mut reader = StreamReader::with_config(Cursor::new(data), config);
        reader.set_endianness(ByteOrder::Little).unwrap();

        reader.push_inner_chunk().unwrap();
        reader.get_mut().set_position(2);
        reader.read_u16s(1).unwrap();
        assert!(!reader.pop_inner_chunk().unwrap());
        assert!(reader.diagnostics().is_empty());
    }

    #[test]
    fn test_skip_chunk_and_eof() {
        let mut data = le_chunk(0x5000, 10);
        data.extend([0xEE; 4]);
        data.extend(le_chunk(0x5100, 6));
        let mut reader = StreamReader::new(Cursor::new(data));
        reader.set_endianness(ByteOrder::Little).unwrap();

        let first = reader.read_chunk().unwrap();
        reader.skip_chunk(&first).unwrap();
        assert_eq!(reader.position().unwrap(), 10);
        assert!(!reader.is_eof().unwrap());

        let second = reader.read_chunk().unwrap();
        assert_eq!(second.id, 0x5100);
        assert!(reader.is_eof().unwrap());
        assert_eq!(reader.position().unwrap(), 16);
    }

    #[test]
    fn test_read_string_and_doubles() {
        let mut data = b"Material/Ogre\n".to_vec();
        data.extend(2.5f64.to_be_bytes());
        data.extend([1, 0]);
        let mut reader = StreamReader::new(Cursor::new(data));
        reader.set_endianness(ByteOrder::Big).unwrap();

        assert_eq!(reader.read_string(None).unwrap(), "Material/Ogre");
        assert_eq!(reader.read_f64s(1).unwrap(), vec![2.5]);
        assert_eq!(reader.read_bools(2).unwrap(), vec![true, false]);
    }

    #[test]
    fn test_truncated_typed_read_is_fatal() {
        let mut reader = StreamReader::new(Cursor::new(vec![0u8; 6]));
        reader.set_endianness(ByteOrder::Little).unwrap();
        assert!(matches!(
            reader.read_quaternion(),
            Err(Error::TruncatedBuffer { expected: 16, actual: 6 })
        ));
        assert!(matches!(reader.read_i32s(0), Err(Error::InvalidCount)));
    }

    #[test]
    fn test_huge_count_fails_without_allocating() {
        let mut reader = StreamReader::new(Cursor::new(vec![0u8; 8]));
        reader.set_endianness(ByteOrder::Little).unwrap();
        assert!(matches!(
            reader.read_u32s(usize::MAX / 2),
            Err(Error::TruncatedBuffer { actual: 8, .. })
        ));
        assert_eq!(reader.position().unwrap(), 8);
    }

    #[test]
    fn test_chunk_header_size() {
        assert_eq!(StreamReader::<Cursor<Vec<u8>>>::chunk_header_size(), 6);
    }
}
