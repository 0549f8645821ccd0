//! File header validation.
//!
//! ## Layout
//! ```text
//! [0x00] HeaderId  (u16, stream byte order) - always 0x1000
//! [0x02] Version   ('\n'-terminated string, e.g. "[Serializer_v1.00]")
//! ```
//!
//! The header id doubles as the byte-order mark, so the stream's
//! [`ByteOrder`] must be known (see [`ByteOrder::detect`]) before the header
//! is read.

use std::io::Read;

use crate::endian::{ByteOrder, HEADER_STREAM_ID};
use crate::utils::{read_line, read_value};
use crate::{Error, Result};

/// Consume the file header and check it against `expected_version`.
///
/// Returns [`Error::MissingHeader`] if the stream does not start with
/// [`HEADER_STREAM_ID`], or [`Error::VersionMismatch`] if the version string
/// differs from `expected_version` in any byte.
pub fn read_file_header<R: Read>(
    r: &mut R,
    order: ByteOrder,
    expected_version: &str,
) -> Result<()> {
    let found = read_value::<u16, _>(r, order)?;
    if found != HEADER_STREAM_ID {
        return Err(Error::MissingHeader { found });
    }

    let version = read_line(r, None)?;
    if version != expected_version {
        return Err(Error::VersionMismatch {
            found: version,
            expected: expected_version.to_owned(),
        });
    }
    tracing::debug!(%version, "file header accepted");
    Ok(())
}
