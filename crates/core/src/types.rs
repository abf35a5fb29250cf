//! Identifier types for serialized objects
//!
//! A `MagicId` names a registered type on the wire. It is computed once from
//! the type's name string (see the digest module in `stele-stream`) and never
//! changes afterwards, so two builds of the same library recognize each
//! other's streams by value alone.

use serde::{Deserialize, Serialize};

/// Stable 32-bit identifier for a registered type
///
/// Derived deterministically from the type's name bytes. Two distinct names
/// colliding is tolerated with acceptably low probability; this is an
/// engineering identifier, not a security boundary.
///
/// ## Invariants
///
/// - Computed once per type name; immutable thereafter
/// - Equal names always produce equal ids, across processes and platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MagicId(pub u32);

impl MagicId {
    /// Wrap a raw 32-bit magic value
    pub const fn new(raw: u32) -> Self {
        MagicId(raw)
    }

    /// The raw 32-bit value, as written to the wire
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for MagicId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl From<u32> for MagicId {
    fn from(raw: u32) -> Self {
        MagicId(raw)
    }
}

impl From<MagicId> for u32 {
    fn from(id: MagicId) -> Self {
        id.0
    }
}
