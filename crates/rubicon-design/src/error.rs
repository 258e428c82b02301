//! Error types for design record parsing.

use thiserror::Error;

/// Errors that can occur when working with design records.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] rubicon_common::Error),

    /// Structurally invalid chunk data.
    #[error("malformed chunk at offset {offset:#x}: {reason}")]
    MalformedChunk { offset: usize, reason: String },

    /// A required chunk signature was not found.
    #[error("chunk {signature:?} (occurrence {occurrence}) not found")]
    SignatureNotFound {
        signature: String,
        occurrence: usize,
    },

    /// Unexpected ASMC format tag.
    #[error("unexpected ASMC format tag {0:#010x}")]
    InvalidFormatTag(u32),

    /// Compression error.
    #[error("compression error: {0}")]
    Compression(String),

    /// Decompression error.
    #[error("decompression error: {0}")]
    Decompression(String),

    /// Decompressed size mismatch.
    #[error("decompressed size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Unknown equipment category offset in a save identifier.
    #[error("unknown equipment category offset {0:#010x}")]
    UnknownCategory(u32),

    /// Invalid UTF-16 string payload.
    #[error("invalid UTF-16 string payload: {0}")]
    InvalidString(String),

    /// Structurally invalid sub-record data.
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

/// Result type for design record operations.
pub type Result<T> = std::result::Result<T, Error>;
