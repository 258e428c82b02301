//! Common utilities for Rubicon.
//!
//! This crate provides the foundational pieces shared by the Rubicon crates:
//!
//! - [`BinaryReader`] - Zero-copy binary reading from byte slices
//! - [`Error`] / [`Result`] - low-level parsing errors

mod error;
mod reader;

pub use error::{Error, Result};
pub use reader::BinaryReader;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
