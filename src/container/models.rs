//! Data structures representing container format components

use encoding_rs::Encoding;

use super::error::{ContainerError, Result};

/// Parsed container header.
///
/// Carries the decoded metadata text plus the attributes the pipeline needs:
/// the generator engine version (which fixes the numeric field width) and the
/// text encoding used for key entries.
#[derive(Debug)]
pub struct ContainerHeader {
    /// Raw engine version string, e.g. "2.0".
    pub engine_version: String,
    /// Parsed engine version.
    pub version: f32,
    /// Field width for directory integers, resolved from `version`.
    pub width: NumericWidth,
    /// Text encoding for key entries (default UTF-8).
    pub encoding: &'static Encoding,
    pub title: String,
    pub description: Option<String>,
    /// The full decoded header text (XML attribute blob), kept for diagnostics.
    pub text: String,
}

/// Width of the integer fields in the directory meta record and the
/// descriptor table, chosen container-wide by the generator engine version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericWidth {
    /// Legacy 4-byte fields (engine version < 2.0). Recognized but unsupported.
    Narrow,
    /// 8-byte fields (engine version >= 2.0).
    Wide,
}

impl NumericWidth {
    /// Width (in bytes) of one directory integer field.
    pub fn field_width(&self) -> usize {
        match self {
            NumericWidth::Narrow => 4,
            NumericWidth::Wide => 8,
        }
    }

    /// Resolve the width from a generator engine version.
    pub fn from_version(version: f32) -> Self {
        if version >= 2.0 {
            NumericWidth::Wide
        } else {
            NumericWidth::Narrow
        }
    }
}

/// Pipeline configuration resolved once from the parsed header and threaded
/// through the directory and segment decoders.
#[derive(Debug, Clone, Copy)]
pub struct DecodeConfig {
    pub width: NumericWidth,
    /// Text unit width for key text fields: 1 byte for single-byte encodings,
    /// 2 bytes for UTF-16.
    pub text_unit: usize,
}

impl DecodeConfig {
    /// Build the configuration for a parsed header.
    ///
    /// Fails fast on the narrow layout so no decoder ever reads with the
    /// wrong field width.
    pub fn from_header(header: &ContainerHeader) -> Result<Self> {
        match header.width {
            NumericWidth::Wide => Ok(Self {
                width: NumericWidth::Wide,
                text_unit: super::codec::unit_width(header.encoding),
            }),
            NumericWidth::Narrow => Err(ContainerError::NarrowWidthUnsupported(
                header.engine_version.clone(),
            )),
        }
    }
}

/// The fixed-width summary record preceding the key-block directory.
///
/// `directory_checksum` is format-defined but never verified against the
/// directory payload; it is surfaced as-is for callers that want it.
#[derive(Debug, Clone, Copy)]
pub struct DirectoryMeta {
    pub block_count: u64,
    pub entry_count: u64,
    pub directory_checksum: u64,
    pub directory_bytes_len: u64,
    pub key_blocks_bytes_len: u64,
}

/// Size descriptor for a single key-block segment.
///
/// Descriptors are produced in file order and consumed in the same order to
/// slice the key-block byte region; there is no explicit segment id.
#[derive(Debug, Clone, Copy)]
pub struct SegmentSize {
    pub compressed_size: u64,
    pub decompressed_size: u64,
}

/// A dictionary key entry with its record id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEntry {
    pub id: u64,
    pub text: String,
}
