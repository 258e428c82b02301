//! Error types for save-slot user data.

use thiserror::Error;

/// Errors that can occur when working with save containers.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] rubicon_common::Error),

    /// Design record error.
    #[error("{0}")]
    Design(#[from] rubicon_design::Error),

    /// Container MD5 digest mismatch.
    #[error("container MD5 mismatch: stored {stored:02x?}, computed {computed:02x?}")]
    IntegrityCheckFailed {
        stored: [u8; 16],
        computed: [u8; 16],
    },

    /// Container buffer shorter than its declared inner size.
    #[error("truncated container: declared inner size {declared} but only {available} bytes")]
    TruncatedContainer { declared: usize, available: usize },

    /// Serialized presets would overflow the fixed container size.
    #[error("container capacity exceeded: {required} bytes of presets, capacity {capacity}")]
    CapacityExceeded { required: usize, capacity: usize },

    /// Preset index out of range.
    #[error("preset index {index} out of range (container holds {count})")]
    IndexOutOfRange { index: usize, count: usize },

    /// Category tab outside the valid 1..=4 range.
    #[error("invalid category tab {0}, expected 1..=4")]
    InvalidCategoryTab(u8),

    /// Decryption error.
    #[error("decryption error: {0}")]
    Decryption(String),

    /// Encryption error.
    #[error("encryption error: {0}")]
    Encryption(String),
}

/// Result type for save operations.
pub type Result<T> = std::result::Result<T, Error>;
