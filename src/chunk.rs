//! Chunk headers and the nesting stack.
//!
//! ## Chunk layout
//! ```text
//! [0x00] ChunkId  (u16, stream byte order)
//! [0x02] Length   (u32, stream byte order) - includes these 6 header bytes
//! [0x06] Payload  (Length - 6 bytes, may hold nested chunks)
//! ```
//!
//! The stack records where each open chunk is expected to end. It only keeps
//! books: a boundary that does not line up is returned as a
//! [`ChunkMismatch`] and the stack resynchronizes to what the stream says,
//! so one malformed chunk does not derail its siblings. Deciding whether a
//! mismatch aborts the parse is up to the caller.

use std::fmt;
use std::io::{Read, Seek, SeekFrom};

use crate::Result;
use crate::endian::ByteOrder;
use crate::utils::read_value;

/// Size of a chunk header: 2-byte id plus 4-byte length.
pub const CHUNK_HEADER_SIZE: u64 = 2 + 4;

/// A decoded chunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    /// Chunk id; its meaning belongs to the asset format being read.
    pub id: u16,
    /// Declared length in bytes, header included.
    pub length: u32,
}

impl ChunkHeader {
    /// Payload length, i.e. the declared length minus the header.
    pub fn payload_len(&self) -> u64 {
        u64::from(self.length).saturating_sub(CHUNK_HEADER_SIZE)
    }
}

/// One open chunk on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkFrame {
    /// Absolute stream offset where the chunk should end.
    pub expected_end: u64,
}

/// A chunk boundary that did not match the stream cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkMismatch {
    /// Id of the chunk being opened, or [`None`] when a chunk was closed.
    pub chunk_id: Option<u16>,
    /// Where the stack expected the cursor to be.
    pub expected: u64,
    /// Where the cursor actually was.
    pub position: u64,
    /// Stack depth when the mismatch was detected.
    pub depth: usize,
    /// Name of the stream, filled in by [`crate::reader::StreamReader`].
    pub stream: String,
}

impl fmt::Display for ChunkMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "corrupted chunk detected")?;
        if !self.stream.is_empty() {
            write!(f, " in {}", self.stream)?;
        }
        if let Some(id) = self.chunk_id {
            write!(f, " (chunk id {id:#06x})")?;
        }
        write!(
            f,
            ": expected offset {}, cursor at {} (depth {})",
            self.expected, self.position, self.depth
        )
    }
}

/// Stack of expected end offsets for the currently open chunks.
#[derive(Debug, Default, Clone)]
pub struct ChunkStack {
    frames: Vec<ChunkFrame>,
}

impl ChunkStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Whether no chunk is open.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The innermost open chunk.
    pub fn top(&self) -> Option<&ChunkFrame> {
        self.frames.last()
    }

    /// Drop every frame, e.g. at the end of a session.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Read a chunk header at the cursor.
    ///
    /// When a chunk is open, its expected end is checked against the header
    /// position and then overwritten with `position + length`, so the stack
    /// follows the newly read length even if the previous bookkeeping was off.
    /// Running out of stream while reading the header is a hard error.
    pub fn read_header<R: Read + Seek>(
        &mut self,
        r: &mut R,
        order: ByteOrder,
    ) -> Result<(ChunkHeader, Option<ChunkMismatch>)> {
        let position = r.stream_position()?;
        let id = read_value::<u16, _>(r, order)?;
        let length = read_value::<u32, _>(r, order)?;

        let depth = self.depth();
        let mismatch = self.frames.last_mut().and_then(|top| {
            let mismatch = (top.expected_end != position).then(|| ChunkMismatch {
                chunk_id: Some(id),
                expected: top.expected_end,
                position,
                depth,
                stream: String::new(),
            });
            top.expected_end = position + u64::from(length);
            mismatch
        });

        Ok((ChunkHeader { id, length }, mismatch))
    }

    /// Open a frame for a payload that holds nested chunks.
    ///
    /// The frame starts out expecting the current cursor; the next
    /// [`read_header`](Self::read_header) replaces that with the real end.
    pub fn push<R: Seek>(&mut self, r: &mut R) -> Result<()> {
        let expected_end = r.stream_position()?;
        self.frames.push(ChunkFrame { expected_end });
        tracing::trace!(depth = self.depth(), expected_end, "pushed chunk frame");
        Ok(())
    }

    /// Close the innermost frame, checking the cursor against its end.
    ///
    /// Popping an empty stack does nothing.
    pub fn pop<R: Seek>(&mut self, r: &mut R) -> Result<Option<ChunkMismatch>> {
        let Some(&ChunkFrame { expected_end }) = self.frames.last() else {
            return Ok(None);
        };
        let position = r.stream_position()?;
        let depth = self.depth();
        self.frames.pop();
        tracing::trace!(depth, expected_end, position, "popped chunk frame");

        Ok((position != expected_end).then_some(ChunkMismatch {
            chunk_id: None,
            expected: expected_end,
            position,
            depth,
            stream: String::new(),
        }))
    }

    /// Step back over a chunk header that was just read.
    ///
    /// Seeks back [`CHUNK_HEADER_SIZE`] bytes and resets the innermost frame
    /// to expect the restored cursor.
    pub fn backpedal<R: Seek>(&mut self, r: &mut R) -> Result<()> {
        let position = r.seek(SeekFrom::Current(-(CHUNK_HEADER_SIZE as i64)))?;
        if let Some(top) = self.frames.last_mut() {
            top.expected_end = position;
        }
        tracing::trace!(depth = self.depth(), position, "backpedalled chunk header");
        Ok(())
    }
}
