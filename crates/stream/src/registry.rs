//! Process-wide registry of serializable types
//!
//! The registry binds a type name to its [`MagicId`] and current schema
//! version, and holds the decode capability used for dynamic dispatch. It is
//! append-only and read-mostly: types register once at load time, lookups
//! dominate afterwards.
//!
//! The registry is an explicit object, so tests construct their own isolated
//! instances. Embedders that want the classic load-time bootstrap use
//! [`TypeRegistry::global`], initialized lazily and safely under concurrent
//! first use.
//!
//! Uses `parking_lot::RwLock` instead of `std::sync::RwLock` to avoid
//! cascading panics from lock poisoning.

use crate::digest::magic_of;
use crate::streamable::Streamable;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::any::Any;
use std::io::Read;
use stele_core::{MagicId, Result, StreamError};
use tracing::debug;

/// Erased payload decoder: reads a payload and returns the boxed value.
pub type DecodeFn = fn(&mut dyn Read) -> Result<Box<dyn Any + Send>>;

/// Process-wide registry, created on first access
static GLOBAL: Lazy<TypeRegistry> = Lazy::new(TypeRegistry::new);

/// A registry entry, as returned by lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredType {
    name: String,
    magic: MagicId,
    version: u32,
    magic_only: bool,
}

impl RegisteredType {
    /// The type's stable wire name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The magic id derived from the name
    pub fn magic(&self) -> MagicId {
        self.magic
    }

    /// The schema version the current code expects on the stream
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Whether this is a magic-only marker type (header, no payload)
    pub fn is_magic_only(&self) -> bool {
        self.magic_only
    }
}

struct Entry {
    info: RegisteredType,
    decode: Option<DecodeFn>,
}

#[derive(Default)]
struct Inner {
    by_magic: FxHashMap<MagicId, Entry>,
    by_name: FxHashMap<String, MagicId>,
}

/// Table mapping type names to magic ids, expected versions, and decoders
///
/// Registration is idempotent for an identical `(name, version, kind)`
/// tuple and fails otherwise; entries are never removed or mutated, so
/// steady-state lookups only take the read lock.
pub struct TypeRegistry {
    inner: RwLock<Inner>,
}

impl TypeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        TypeRegistry {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// The process-wide registry, created lazily on first access.
    pub fn global() -> &'static TypeRegistry {
        &GLOBAL
    }

    /// Register a type by name, with no decode capability.
    ///
    /// Returns the type's [`MagicId`]. Registering the same `(name, version)`
    /// again is a no-op; registering `name` with a different version fails
    /// with [`StreamError::ConflictingRegistration`].
    pub fn register(&self, name: &str, version: u32) -> Result<MagicId> {
        self.insert(name, version, false, None)
    }

    /// Register `T` and install its decoder for dynamic dispatch.
    pub fn register_type<T>(&self) -> Result<MagicId>
    where
        T: Streamable + Any + Send,
    {
        self.insert(T::TYPE_NAME, T::VERSION, false, Some(decode_erased::<T>))
    }

    /// Register a magic-only marker type.
    ///
    /// Marker types carry no payload and must declare version 0; any other
    /// version fails with [`StreamError::MarkerVersion`].
    pub fn register_marker<T>(&self) -> Result<MagicId>
    where
        T: Streamable + Any + Send,
    {
        if T::VERSION != 0 {
            return Err(StreamError::MarkerVersion {
                type_name: T::TYPE_NAME.to_string(),
                version: T::VERSION,
            });
        }
        self.insert(T::TYPE_NAME, 0, true, Some(decode_erased::<T>))
    }

    /// Look up the entry for a magic id.
    ///
    /// Fails with [`StreamError::UnknownType`] if no type with this magic
    /// was ever registered.
    pub fn lookup(&self, magic: MagicId) -> Result<RegisteredType> {
        self.inner
            .read()
            .by_magic
            .get(&magic)
            .map(|entry| entry.info.clone())
            .ok_or(StreamError::UnknownType { magic })
    }

    /// Look up the entry for a type name.
    ///
    /// Fails with [`StreamError::UnregisteredType`] if the name was never
    /// registered.
    pub fn lookup_name(&self, name: &str) -> Result<RegisteredType> {
        let inner = self.inner.read();
        inner
            .by_name
            .get(name)
            .and_then(|magic| inner.by_magic.get(magic))
            .map(|entry| entry.info.clone())
            .ok_or_else(|| StreamError::UnregisteredType {
                type_name: name.to_string(),
            })
    }

    /// Check whether a magic id is registered
    pub fn is_registered(&self, magic: MagicId) -> bool {
        self.inner.read().by_magic.contains_key(&magic)
    }

    /// All registered magic ids, sorted
    pub fn magic_ids(&self) -> Vec<MagicId> {
        let mut ids: Vec<MagicId> = self.inner.read().by_magic.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.inner.read().by_magic.len()
    }

    /// Whether no types are registered yet
    pub fn is_empty(&self) -> bool {
        self.inner.read().by_magic.is_empty()
    }

    pub(crate) fn decoder(&self, magic: MagicId) -> Option<DecodeFn> {
        self.inner
            .read()
            .by_magic
            .get(&magic)
            .and_then(|entry| entry.decode)
    }

    fn insert(
        &self,
        name: &str,
        version: u32,
        magic_only: bool,
        decode: Option<DecodeFn>,
    ) -> Result<MagicId> {
        let magic = magic_of(name);
        let mut inner = self.inner.write();

        if let Some(existing) = inner.by_magic.get_mut(&magic) {
            if existing.info.name != name {
                return Err(StreamError::MagicCollision {
                    magic,
                    existing: existing.info.name.clone(),
                    requested: name.to_string(),
                });
            }
            if existing.info.version != version || existing.info.magic_only != magic_only {
                return Err(StreamError::ConflictingRegistration {
                    type_name: name.to_string(),
                    registered: existing.info.version,
                    requested: version,
                });
            }
            // Idempotent re-registration; keep the first decoder seen
            // unless this call supplies one and the original did not.
            if existing.decode.is_none() {
                existing.decode = decode;
            }
            return Ok(magic);
        }

        inner.by_magic.insert(
            magic,
            Entry {
                info: RegisteredType {
                    name: name.to_string(),
                    magic,
                    version,
                    magic_only,
                },
                decode,
            },
        );
        inner.by_name.insert(name.to_string(), magic);

        debug!(type_name = name, %magic, version, magic_only, "registered stream type");
        Ok(magic)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        TypeRegistry::new()
    }
}

fn decode_erased<T>(source: &mut dyn Read) -> Result<Box<dyn Any + Send>>
where
    T: Streamable + Any + Send,
{
    Ok(Box::new(T::read_payload(source)?))
}
