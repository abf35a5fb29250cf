//! Core types for the stele persistence layer
//!
//! This crate defines the foundational vocabulary shared by every other
//! crate in the workspace:
//! - MagicId: stable integer identifier derived from a type name
//! - StreamError: error type hierarchy for registration and (de)serialization
//! - Result: result alias used throughout

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod types;

pub use error::{Result, StreamError};
pub use types::MagicId;
