//! Fixed-width payload primitives
//!
//! Helpers for writing payload fields in a fixed, documented order. All
//! integers are little-endian; variable-length data (byte strings, UTF-8
//! strings, bincode blobs) is prefixed with a `u32` length.
//!
//! These are the building blocks [`Streamable`](crate::Streamable)
//! implementations compose; nothing here writes or reads headers.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{Read, Write};
use stele_core::{Result, StreamError};

/// Cap on a single length-prefixed field, to fail fast on garbage prefixes
/// instead of attempting a multi-gigabyte allocation.
const MAX_FIELD_LEN: u32 = 256 * 1024 * 1024;

/// Write a `u8`.
pub fn write_u8(sink: &mut dyn Write, value: u8) -> Result<()> {
    sink.write_u8(value)?;
    Ok(())
}

/// Read a `u8`.
pub fn read_u8(source: &mut dyn Read) -> Result<u8> {
    Ok(source.read_u8()?)
}

/// Write a `u32`, little-endian.
pub fn write_u32(sink: &mut dyn Write, value: u32) -> Result<()> {
    sink.write_u32::<LittleEndian>(value)?;
    Ok(())
}

/// Read a little-endian `u32`.
pub fn read_u32(source: &mut dyn Read) -> Result<u32> {
    Ok(source.read_u32::<LittleEndian>()?)
}

/// Write a `u64`, little-endian.
pub fn write_u64(sink: &mut dyn Write, value: u64) -> Result<()> {
    sink.write_u64::<LittleEndian>(value)?;
    Ok(())
}

/// Read a little-endian `u64`.
pub fn read_u64(source: &mut dyn Read) -> Result<u64> {
    Ok(source.read_u64::<LittleEndian>()?)
}

/// Write an `i64`, little-endian.
pub fn write_i64(sink: &mut dyn Write, value: i64) -> Result<()> {
    sink.write_i64::<LittleEndian>(value)?;
    Ok(())
}

/// Read a little-endian `i64`.
pub fn read_i64(source: &mut dyn Read) -> Result<i64> {
    Ok(source.read_i64::<LittleEndian>()?)
}

/// Write an `f64`, little-endian IEEE-754.
pub fn write_f64(sink: &mut dyn Write, value: f64) -> Result<()> {
    sink.write_f64::<LittleEndian>(value)?;
    Ok(())
}

/// Read a little-endian IEEE-754 `f64`.
pub fn read_f64(source: &mut dyn Read) -> Result<f64> {
    Ok(source.read_f64::<LittleEndian>()?)
}

/// Write length-prefixed bytes: `len(u32 LE)` + raw bytes.
pub fn write_bytes(sink: &mut dyn Write, bytes: &[u8]) -> Result<()> {
    let len = u32::try_from(bytes.len())
        .map_err(|_| StreamError::Serialization(format!("field of {} bytes exceeds u32 length prefix", bytes.len())))?;
    sink.write_u32::<LittleEndian>(len)?;
    sink.write_all(bytes)?;
    Ok(())
}

/// Read length-prefixed bytes written by [`write_bytes`].
pub fn read_bytes(source: &mut dyn Read) -> Result<Vec<u8>> {
    let len = source.read_u32::<LittleEndian>()?;
    if len > MAX_FIELD_LEN {
        return Err(StreamError::Serialization(format!(
            "length prefix {len} exceeds maximum field size {MAX_FIELD_LEN}"
        )));
    }
    let mut bytes = vec![0u8; len as usize];
    source.read_exact(&mut bytes)?;
    Ok(bytes)
}

/// Write a length-prefixed UTF-8 string.
pub fn write_str(sink: &mut dyn Write, value: &str) -> Result<()> {
    write_bytes(sink, value.as_bytes())
}

/// Read a length-prefixed UTF-8 string written by [`write_str`].
pub fn read_str(source: &mut dyn Read) -> Result<String> {
    let bytes = read_bytes(source)?;
    String::from_utf8(bytes)
        .map_err(|e| StreamError::Serialization(format!("invalid UTF-8 in string field: {e}")))
}

/// Write a serde value as a length-prefixed bincode blob.
///
/// The bridge for struct payloads: deterministic, compact, and the same
/// scheme the embedding application can use for nested records.
pub fn write_bincode<S: Serialize>(sink: &mut dyn Write, value: &S) -> Result<()> {
    let encoded = bincode::serialize(value)?;
    write_bytes(sink, &encoded)
}

/// Read a length-prefixed bincode blob written by [`write_bincode`].
pub fn read_bincode<D: DeserializeOwned>(source: &mut dyn Read) -> Result<D> {
    let bytes = read_bytes(source)?;
    Ok(bincode::deserialize(&bytes)?)
}
