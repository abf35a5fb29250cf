//! Error types for the stele persistence layer
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.
//!
//! None of these errors are retried internally: a version mismatch cannot
//! succeed without new code, and a malformed header cannot be repaired by
//! reading again. Callers catch and report, or abort the enclosing load.

use crate::types::MagicId;
use std::io;
use std::panic::Location;
use thiserror::Error;

/// Result type alias for stele operations
pub type Result<T> = std::result::Result<T, StreamError>;

/// Error types for registration and versioned (de)serialization
#[derive(Debug, Error)]
pub enum StreamError {
    /// I/O error from the underlying byte sink/source
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Stream ended before a complete header could be read
    #[error("Malformed header: needed {needed} bytes, got {got}")]
    MalformedHeader {
        /// Bytes required for a complete header
        needed: usize,
        /// Bytes actually available
        got: usize,
    },

    /// Header magic id has no registry entry
    ///
    /// The stream was written by an unrelated or newer library, or the
    /// data is corrupted.
    #[error("Unknown magic id {magic}: no such type is registered")]
    UnknownType {
        /// The unrecognized magic id from the header
        magic: MagicId,
    },

    /// A type was used for (de)serialization without being registered first
    #[error("Type \"{type_name}\" is not registered")]
    UnregisteredType {
        /// Fully qualified name of the unregistered type
        type_name: String,
    },

    /// Same type name registered twice with different versions
    #[error(
        "Conflicting registration for \"{type_name}\": \
         version {registered} already registered, version {requested} requested"
    )]
    ConflictingRegistration {
        /// The type name registered twice
        type_name: String,
        /// Version recorded by the first registration
        registered: u32,
        /// Version the second registration asked for
        requested: u32,
    },

    /// Header decoded cleanly but declares a version this code cannot read
    #[error(
        "Version mismatch for \"{type_name}\": \
         found version {found} on the stream, expected version {expected} (at {location})"
    )]
    VersionMismatch {
        /// Fully qualified name of the type being read
        type_name: String,
        /// Version embedded in the stream header
        found: u32,
        /// Version the registry expects for this type
        expected: u32,
        /// Call site of the failing read, for diagnostics
        location: &'static Location<'static>,
    },

    /// Two distinct type names digested to the same magic id
    ///
    /// Practically never happens; when it does, one of the names must
    /// change before either type can be registered.
    #[error(
        "Magic collision on {magic}: \"{existing}\" already registered, \
         \"{requested}\" digests to the same id"
    )]
    MagicCollision {
        /// The colliding magic id
        magic: MagicId,
        /// Name already holding this magic id
        existing: String,
        /// Name whose registration collided
        requested: String,
    },

    /// Typed read found a valid header for a different registered type
    #[error("Type mismatch: expected \"{expected}\", stream holds \"{found}\"")]
    TypeMismatch {
        /// Type the caller asked to decode
        expected: String,
        /// Type the header actually names
        found: String,
    },

    /// A magic-only marker type used a non-zero version
    #[error("Marker type \"{type_name}\" must use version 0, got {version}")]
    MarkerVersion {
        /// The offending marker type name
        type_name: String,
        /// The non-zero version supplied
        version: u32,
    },

    /// Dynamic decode requested for a type registered without a decoder
    #[error("No decoder registered for \"{type_name}\"")]
    NoDecoder {
        /// Type name that lacks a decode capability
        type_name: String,
    },

    /// Payload-level serialization/deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StreamError {
    /// Build a [`StreamError::VersionMismatch`] capturing the caller's
    /// source location.
    #[track_caller]
    pub fn version_mismatch(type_name: impl Into<String>, found: u32, expected: u32) -> Self {
        StreamError::VersionMismatch {
            type_name: type_name.into(),
            found,
            expected,
            location: Location::caller(),
        }
    }
}

impl From<bincode::Error> for StreamError {
    fn from(e: bincode::Error) -> Self {
        StreamError::Serialization(e.to_string())
    }
}
