//! Version-checked object (de)serialization
//!
//! Entry points that tie the registry, header codec, and per-type payload
//! code together. A write emits `[header][payload]`; a read validates the
//! header against the registry before a single payload byte is consumed,
//! so a mismatch leaves the stream positioned at the start of the payload
//! and never returns a partially populated or type-confused value.

use crate::header::{peek_header, StreamHeader};
use crate::registry::{RegisteredType, TypeRegistry};
use crate::streamable::Streamable;
use std::any::Any;
use std::io::{Cursor, Read, Write};
use stele_core::{MagicId, Result, StreamError};
use tracing::{trace, warn};

/// Serialize `value` to `sink` as `[header][payload]`.
///
/// The header's magic and version come from the registry entry for
/// `T::TYPE_NAME`; fails with [`StreamError::UnregisteredType`] if `T` was
/// never registered. Magic-only entries write the header and nothing else.
pub fn serialize<T: Streamable>(
    registry: &TypeRegistry,
    sink: &mut dyn Write,
    value: &T,
) -> Result<()> {
    let entry = registry.lookup_name(T::TYPE_NAME)?;
    StreamHeader::new(entry.magic(), entry.version()).write_to(sink)?;
    if !entry.is_magic_only() {
        value.write_payload(sink)?;
    }
    trace!(type_name = T::TYPE_NAME, version = entry.version(), "serialized object");
    Ok(())
}

/// Deserialize a `T` from `source`.
///
/// Reads and validates the header, then decodes the payload:
/// - [`StreamError::MalformedHeader`] if the source ends mid-header
/// - [`StreamError::UnknownType`] if the magic has no registry entry
/// - [`StreamError::TypeMismatch`] if the entry names a type other than `T`
/// - [`StreamError::VersionMismatch`] if the stream's version differs from
///   the registry's expected version; no payload bytes are consumed
#[track_caller]
pub fn deserialize<T: Streamable>(registry: &TypeRegistry, source: &mut dyn Read) -> Result<T> {
    let entry = check_header(registry, StreamHeader::read_from(source)?)?;
    if entry.name() != T::TYPE_NAME {
        return Err(StreamError::TypeMismatch {
            expected: T::TYPE_NAME.to_string(),
            found: entry.name().to_string(),
        });
    }
    if entry.is_magic_only() {
        // Marker payloads are defined to be empty; decode against an empty
        // source so nothing can be consumed even by a buggy implementation.
        return T::read_payload(&mut std::io::empty());
    }
    T::read_payload(source)
}

/// Serialize `value` into a fresh byte buffer.
pub fn serialize_to_vec<T: Streamable>(registry: &TypeRegistry, value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    serialize(registry, &mut buf, value)?;
    Ok(buf)
}

/// Deserialize a `T` from the front of a byte slice.
#[track_caller]
pub fn deserialize_from_slice<T: Streamable>(registry: &TypeRegistry, bytes: &[u8]) -> Result<T> {
    let mut cursor = Cursor::new(bytes);
    deserialize(registry, &mut cursor)
}

/// Write the header-only stream of a magic-only marker type.
///
/// Fails with [`StreamError::MarkerVersion`] if `T`'s registry entry is not
/// magic-only.
pub fn serialize_marker<T: Streamable>(registry: &TypeRegistry, sink: &mut dyn Write) -> Result<()> {
    let entry = marker_entry::<T>(registry)?;
    StreamHeader::new(entry.magic(), 0).write_to(sink)?;
    Ok(())
}

/// Validate the header-only stream of a magic-only marker type.
///
/// Consumes exactly one header; succeeds iff it names `T` at version 0.
#[track_caller]
pub fn deserialize_marker<T: Streamable>(
    registry: &TypeRegistry,
    source: &mut dyn Read,
) -> Result<()> {
    marker_entry::<T>(registry)?;
    let entry = check_header(registry, StreamHeader::read_from(source)?)?;
    if entry.name() != T::TYPE_NAME {
        return Err(StreamError::TypeMismatch {
            expected: T::TYPE_NAME.to_string(),
            found: entry.name().to_string(),
        });
    }
    Ok(())
}

/// A dynamically decoded object: the registry entry it was decoded through
/// plus the boxed value itself.
pub struct DynObject {
    type_name: String,
    magic: MagicId,
    version: u32,
    value: Box<dyn Any + Send>,
}

impl DynObject {
    /// Wire name of the decoded type
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Magic id from the stream header
    pub fn magic(&self) -> MagicId {
        self.magic
    }

    /// Schema version the object was decoded at
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Whether the decoded value is a `T`
    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Recover the concrete value, or give `self` back on the wrong type.
    pub fn downcast<T: Any>(self) -> std::result::Result<Box<T>, DynObject> {
        let DynObject {
            type_name,
            magic,
            version,
            value,
        } = self;
        match value.downcast::<T>() {
            Ok(value) => Ok(value),
            Err(value) => Err(DynObject {
                type_name,
                magic,
                version,
                value,
            }),
        }
    }
}

impl std::fmt::Debug for DynObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynObject")
            .field("type_name", &self.type_name)
            .field("magic", &self.magic)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// Deserialize whatever object the stream holds next, dispatching on the
/// header's magic id through the registry's decode table.
///
/// Fails with [`StreamError::NoDecoder`] if the type was registered by name
/// only (see [`TypeRegistry::register`]).
#[track_caller]
pub fn deserialize_any(registry: &TypeRegistry, source: &mut dyn Read) -> Result<DynObject> {
    let entry = check_header(registry, StreamHeader::read_from(source)?)?;
    let decode = registry
        .decoder(entry.magic())
        .ok_or_else(|| StreamError::NoDecoder {
            type_name: entry.name().to_string(),
        })?;
    let value = if entry.is_magic_only() {
        decode(&mut std::io::empty())?
    } else {
        decode(source)?
    };
    Ok(DynObject {
        type_name: entry.name().to_string(),
        magic: entry.magic(),
        version: entry.version(),
        value,
    })
}

/// What a header peek learned about a byte buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifiedObject {
    entry: RegisteredType,
    stream_version: u32,
}

impl IdentifiedObject {
    /// The registry entry the buffer's magic id resolved to
    pub fn entry(&self) -> &RegisteredType {
        &self.entry
    }

    /// The version embedded in the buffer's header
    pub fn stream_version(&self) -> u32 {
        self.stream_version
    }

    /// Whether the buffer can be decoded by the current code
    pub fn is_current(&self) -> bool {
        self.stream_version == self.entry.version()
    }
}

/// Identify which registered type (and version) a byte buffer holds,
/// without decoding any payload.
///
/// Unlike [`deserialize`], a stale version is not an error here; the caller
/// asked what the data is, not for its contents.
pub fn identify(registry: &TypeRegistry, bytes: &[u8]) -> Result<IdentifiedObject> {
    let header = peek_header(bytes)?;
    let entry = registry.lookup(header.magic)?;
    Ok(IdentifiedObject {
        entry,
        stream_version: header.version,
    })
}

/// Look up `T` and require a magic-only registry entry.
fn marker_entry<T: Streamable>(registry: &TypeRegistry) -> Result<RegisteredType> {
    let entry = registry.lookup_name(T::TYPE_NAME)?;
    if !entry.is_magic_only() {
        return Err(StreamError::MarkerVersion {
            type_name: T::TYPE_NAME.to_string(),
            version: entry.version(),
        });
    }
    Ok(entry)
}

/// Resolve a header against the registry and enforce the version invariant.
#[track_caller]
fn check_header(registry: &TypeRegistry, header: StreamHeader) -> Result<RegisteredType> {
    let entry = registry.lookup(header.magic)?;
    if header.version != entry.version() {
        warn!(
            type_name = entry.name(),
            found = header.version,
            expected = entry.version(),
            "version mismatch on object stream"
        );
        return Err(StreamError::version_mismatch(
            entry.name(),
            header.version,
            entry.version(),
        ));
    }
    Ok(entry)
}
