//! Per-type serialization capability
//!
//! Each serializable type implements [`Streamable`]: a name, a schema
//! version, and payload read/write in a fixed field order. The registry
//! dispatches on magic id into these implementations; there is no
//! inheritance chain anywhere in the format.

use std::io::{Read, Write};
use stele_core::Result;

/// Capability implemented by every type that can travel on an object stream
///
/// `write_payload` and `read_payload` must encode the same fields in the
/// same fixed order; the header is not theirs to write, the encoding layer
/// owns it. Payload cost is linear in value size, with no internal retries
/// or partial-decode states.
///
/// Magic-only marker types (abstract/placeholder types with no state) use
/// `VERSION = 0` and leave both payload methods empty.
pub trait Streamable: Sized {
    /// Fully qualified, stable name of this type on the wire
    const TYPE_NAME: &'static str;

    /// Current schema version of this type's payload layout
    const VERSION: u32;

    /// Write this value's payload fields, in fixed order, to `sink`.
    fn write_payload(&self, sink: &mut dyn Write) -> Result<()>;

    /// Read a value's payload fields, in the same fixed order, from `source`.
    fn read_payload(source: &mut dyn Read) -> Result<Self>;
}
