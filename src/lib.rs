//! Stele: versioned binary object persistence
//!
//! Objects travel as `[MagicId][Version][payload]`. A process-wide (or
//! per-test) [`TypeRegistry`] maps magic ids back to type names and expected
//! versions; reads fail fast on unknown magics and version mismatches,
//! before any payload byte is consumed.
//!
//! This crate is a facade re-exporting the public API of the workspace
//! members:
//! - `stele-core`: [`MagicId`], [`StreamError`], [`Result`]
//! - `stele-stream`: registry, header codec, `Streamable`, wire helpers,
//!   and the serialize/deserialize entry points

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use stele_core::{MagicId, Result, StreamError};

pub use stele_stream::{
    deserialize, deserialize_any, deserialize_from_slice, deserialize_marker, identify, magic_of,
    peek_header, serialize, serialize_marker, serialize_to_vec, DynObject, IdentifiedObject,
    RegisteredType, StreamHeader, Streamable, TypeRegistry, HEADER_SIZE,
};

/// Wire-level payload primitives (fixed-width integers, length-prefixed
/// bytes and strings, the bincode bridge)
pub mod wire {
    pub use stele_stream::wire::*;
}
