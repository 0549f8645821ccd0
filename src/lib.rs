//! **ogrekit** - a reader for OGRE's chunked binary serialization format.
//!
//! OGRE `.mesh` and `.skeleton` files share one container layout: a
//! byte-order mark that doubles as the header id, a version string, then a
//! tree of length-prefixed chunks holding typed primitive arrays. This crate
//! reads that container; turning chunk ids into meshes or bones is left to
//! the caller.
//!
//! # Modules
//! | Module | Role |
//! |--------|------|
//! | [`reader`] | [`StreamReader`](reader::StreamReader) facade, the usual entry point |
//! | [`endian`] | Byte-order detection from the header magic |
//! | [`header`] | Header id and version validation |
//! | [`chunk`]  | Chunk headers and the nesting stack |
//! | [`decode`] | Fixed-width primitive array decoding |
//! | [`config`] | Per-session settings |
//!
//! # Errors
//! Structural problems (bad magic, wrong version, truncated data) are fatal
//! and come back as [`Error`]. A chunk whose boundary does not line up is
//! not: it is logged through `tracing`, collected as a
//! [`ChunkMismatch`](chunk::ChunkMismatch), and parsing carries on.

pub mod chunk;
pub mod config;
pub mod decode;
pub mod endian;
pub mod error;
pub mod header;
pub mod reader;
pub(crate) mod utils;

pub use endian::ByteOrder;
pub use error::{Error, Result};
pub use reader::StreamReader;
