//! Library-wide error and result types.
//!
//! Only fatal conditions live here. Chunk boundary mismatches are soft and
//! are reported through [`crate::chunk::ChunkMismatch`] instead.

use std::io;

use thiserror::Error;

/// Result alias used throughout ogrekit.
pub type Result<T> = std::result::Result<T, Error>;

/// All fatal errors the library can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// The first two bytes of the stream match neither header magic.
    #[error("not a valid chunk stream: unrecognized header {found:#06x}")]
    UnrecognizedHeader { found: u16 },

    /// Endianness detection was attempted somewhere other than offset 0.
    #[error("can only determine endianness at the start of the stream (cursor at {position})")]
    StreamNotAtStart { position: u64 },

    /// A byte-order token was neither `little` nor `big`.
    #[error("invalid endianness argument {0:?}, expected \"little\" or \"big\"")]
    InvalidEndiannessArgument(String),

    /// The byte order of this session was already fixed.
    #[error("endianness already determined for this stream")]
    EndiannessAlreadySet,

    /// The file does not start with the header chunk id.
    #[error("invalid file: no header (found chunk id {found:#06x})")]
    MissingHeader { found: u16 },

    /// The file was written by an incompatible serializer.
    #[error("incompatible file version: file reports {found:?}, reader is version {expected:?}")]
    VersionMismatch { found: String, expected: String },

    /// A buffer did not hold exactly `count × element size` bytes.
    #[error("truncated buffer: expected {expected} bytes, got {actual}")]
    TruncatedBuffer { expected: usize, actual: usize },

    /// A typed read asked for zero elements.
    #[error("element count must be greater than zero")]
    InvalidCount,

    /// An underlying I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
