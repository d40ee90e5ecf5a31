//! Error types for container decoding.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// An error originating from I/O operations (open failure, truncated file).
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// A checksum validation failed, indicating data corruption.
    #[error("Checksum mismatch in {region}: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch {
        region: &'static str,
        expected: u32,
        actual: u32,
    },

    /// A compressed payload could not be inflated.
    #[error("Decompression failed for {context}: {detail}")]
    Decompression {
        context: &'static str,
        detail: String,
    },

    /// A declared count of items does not match the actual number found.
    #[error("Count mismatch for {item_type}: expected {expected}, but found {found}")]
    CountMismatch {
        item_type: &'static str,
        expected: u64,
        found: u64,
    },

    /// A buffer or region has an unexpected size after an operation.
    #[error("Size mismatch for {context}: expected {expected} bytes, but found {found} bytes")]
    SizeMismatch {
        context: &'static str,
        expected: u64,
        found: u64,
    },

    /// The container declares the legacy narrow (4-byte) numeric width layout.
    #[error(
        "Narrow (4-byte) numeric width layout is not supported \
         (generator engine version {0} < 2.0)"
    )]
    NarrowWidthUnsupported(String),

    /// The file is structurally invalid or does not conform to the container format.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Coarse error taxonomy over [`ContainerError`] variants.
///
/// Useful for callers that only care whether a failure came from the
/// filesystem, from a failed integrity stamp, or from malformed content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The file could not be opened or read for the requested byte count.
    Io,
    /// A stored checksum did not match the computed one.
    Integrity,
    /// A payload failed to decompress or a field overran its buffer.
    Format,
}

impl ContainerError {
    /// Classify this error into the three-way [`ErrorKind`] taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContainerError::Io(_) => ErrorKind::Io,
            ContainerError::ChecksumMismatch { .. } => ErrorKind::Integrity,
            ContainerError::Decompression { .. }
            | ContainerError::CountMismatch { .. }
            | ContainerError::SizeMismatch { .. }
            | ContainerError::NarrowWidthUnsupported(_)
            | ContainerError::InvalidFormat(_) => ErrorKind::Format,
        }
    }
}

/// A convenience `Result` type alias using the crate's [`ContainerError`] type.
pub type Result<T> = std::result::Result<T, ContainerError>;
