//! Byte order of a chunk stream and its detection.
//!
//! Every stream starts with the header chunk id `0x1000` written in the
//! producer's byte order, so the first two bytes double as a byte-order mark:
//!
//! ```text
//! 00 10  -> little-endian stream
//! 10 00  -> big-endian stream
//! ```
//!
//! Detection is a peek: the cursor is returned to offset 0 afterwards so the
//! header validator can consume the id normally.

use std::fmt;
use std::io::{Read, Seek, SeekFrom};
use std::str::FromStr;

use crate::utils::bytesv;
use crate::{Error, Result};

/// Chunk id of the file header, and the magic of a little-endian stream.
pub const HEADER_STREAM_ID: u16 = 0x1000;

/// [`HEADER_STREAM_ID`] as seen when the stream's byte order is reversed.
pub const BIG_ENDIAN_HEADER_STREAM_ID: u16 = 0x0010;

/// Byte order of every multi-byte value in a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// The byte order of the host.
    pub const fn native() -> Self {
        if cfg!(target_endian = "little") {
            Self::Little
        } else {
            Self::Big
        }
    }

    /// Classify the first two bytes of a stream.
    ///
    /// The bytes are read as a little-endian `u16` on every host, which
    /// equals a native-order read on little-endian machines.
    pub fn from_magic(bytes: [u8; 2]) -> Result<Self> {
        match u16::from_le_bytes(bytes) {
            HEADER_STREAM_ID => Ok(Self::Little),
            BIG_ENDIAN_HEADER_STREAM_ID => Ok(Self::Big),
            found => Err(Error::UnrecognizedHeader { found }),
        }
    }

    /// Peek the stream's first two bytes and pick the byte order.
    ///
    /// `r` must be positioned at offset 0 and is left there on return,
    /// whether or not detection succeeds.
    pub fn detect<R: Read + Seek>(r: &mut R) -> Result<Self> {
        let position = r.stream_position()?;
        if position != 0 {
            return Err(Error::StreamNotAtStart { position });
        }

        let peeked = bytesv(r, 2)?;
        r.seek(SeekFrom::Start(0))?;

        match *peeked.as_slice() {
            [a, b] => Self::from_magic([a, b]),
            _ => Err(Error::UnrecognizedHeader {
                found: peeked.first().copied().map_or(0, u16::from),
            }),
        }
    }
}

impl FromStr for ByteOrder {
    type Err = Error;

    /// Parse an explicit override: `little` or `big`, case-insensitive.
    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("little") {
            Ok(Self::Little)
        } else if s.eq_ignore_ascii_case("big") {
            Ok(Self::Big)
        } else {
            Err(Error::InvalidEndiannessArgument(s.to_owned()))
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Little => f.write_str("little"),
            Self::Big => f.write_str("big"),
        }
    }
}
