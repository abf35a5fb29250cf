//! Type name digest
//!
//! Maps a type's name string to its [`MagicId`]. The digest is xxh3-64 over
//! the name's UTF-8 bytes, folded to 32 bits by XOR-ing the two halves.
//! xxh3 is byte-oriented and specified independently of platform byte order,
//! so the same name yields the same magic on every platform and across
//! process restarts. Collision resistance is a nice-to-have here, not a
//! security property.

use stele_core::MagicId;
use xxhash_rust::xxh3::xxh3_64;

/// Compute the [`MagicId`] for a type name.
///
/// Pure and deterministic: equal input bytes always produce equal ids.
pub fn magic_of(name: &str) -> MagicId {
    let h = xxh3_64(name.as_bytes());
    MagicId::new((h ^ (h >> 32)) as u32)
}
