//! Object stream header
//!
//! Every serialized object is preceded by exactly one fixed-width header.
//!
//! # Header Layout (8 bytes)
//!
//! ```text
//! +--------------------+--------------------+
//! | MagicId (u32, LE)  | Version (u32, LE)  |
//! +--------------------+--------------------+
//! ```
//!
//! All integers in the stream format are little-endian. A header is written
//! transiently at serialize time and consumed at deserialize time; it is
//! never retained past the read that validates it.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};
use stele_core::{MagicId, Result, StreamError};

/// Size of the object header in bytes
pub const HEADER_SIZE: usize = 8;

/// The `(magic, version)` pair written before every serialized object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    /// Magic id of the object's registered type
    pub magic: MagicId,
    /// Schema version of the payload that follows
    pub version: u32,
}

impl StreamHeader {
    /// Create a new header
    pub const fn new(magic: MagicId, version: u32) -> Self {
        StreamHeader { magic, version }
    }

    /// Serialize header to bytes
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic.raw().to_le_bytes());
        bytes[4..8].copy_from_slice(&self.version.to_le_bytes());
        bytes
    }

    /// Parse header from bytes
    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        StreamHeader {
            magic: MagicId::new(u32::from_le_bytes(
                bytes[0..4].try_into().expect("slice length is 4"),
            )),
            version: u32::from_le_bytes(bytes[4..8].try_into().expect("slice length is 4")),
        }
    }

    /// Write the header to a byte sink.
    pub fn write_to(&self, sink: &mut dyn Write) -> Result<()> {
        sink.write_u32::<LittleEndian>(self.magic.raw())?;
        sink.write_u32::<LittleEndian>(self.version)?;
        Ok(())
    }

    /// Read a header from a byte source.
    ///
    /// Fails with [`StreamError::MalformedHeader`] if the source ends before
    /// a complete header was read; no partial header is ever returned.
    pub fn read_from(source: &mut dyn Read) -> Result<Self> {
        let mut bytes = [0u8; HEADER_SIZE];
        let mut filled = 0;
        while filled < HEADER_SIZE {
            let n = source.read(&mut bytes[filled..])?;
            if n == 0 {
                return Err(StreamError::MalformedHeader {
                    needed: HEADER_SIZE,
                    got: filled,
                });
            }
            filled += n;
        }
        Ok(StreamHeader::from_bytes(&bytes))
    }
}

/// Parse a header from the front of a byte slice.
///
/// Fails with [`StreamError::MalformedHeader`] if the slice is shorter than
/// [`HEADER_SIZE`].
pub fn peek_header(bytes: &[u8]) -> Result<StreamHeader> {
    if bytes.len() < HEADER_SIZE {
        return Err(StreamError::MalformedHeader {
            needed: HEADER_SIZE,
            got: bytes.len(),
        });
    }
    let fixed: &[u8; HEADER_SIZE] = bytes[..HEADER_SIZE]
        .try_into()
        .expect("slice length checked above");
    Ok(StreamHeader::from_bytes(fixed))
}
