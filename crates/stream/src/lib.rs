//! Versioned binary object streams
//!
//! This crate implements the persistence mechanism itself:
//! - digest: type name -> MagicId hashing
//! - header: the fixed 8-byte `(magic, version)` header preceding every object
//! - registry: process-wide (or per-test) table of registered types
//! - streamable: the per-type serialize/deserialize capability trait
//! - wire: fixed-width payload primitives and the bincode bridge
//! - encoding: the version-checked serialize/deserialize entry points
//!
//! # Stream Layout
//!
//! ```text
//! +--------------------+--------------------+---------------------+
//! | MagicId (4, LE)    | Version (4, LE)    | Payload (variable)  |
//! +--------------------+--------------------+---------------------+
//! ```
//!
//! One header per object, no compression, no optionality. Readers compare
//! the header version against the registry's expected version and fail
//! before touching a single payload byte on mismatch.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod digest;
pub mod encoding;
pub mod header;
pub mod registry;
pub mod streamable;
pub mod wire;

pub use digest::magic_of;
pub use encoding::{
    deserialize, deserialize_any, deserialize_from_slice, deserialize_marker, identify, serialize,
    serialize_marker, serialize_to_vec, DynObject, IdentifiedObject,
};
pub use header::{peek_header, StreamHeader, HEADER_SIZE};
pub use registry::{RegisteredType, TypeRegistry};
pub use streamable::Streamable;
