//! # dict-container
//!
//! A decoder for compressed dictionary container files. A container holds a
//! UTF-16LE XML metadata header, a compressed directory describing how the
//! dictionary's keys are split into zlib-compressed segments, and the
//! segments themselves, each packed with `(id, text)` key entries.
//!
//! The decoder walks the file strictly front to back, verifying the Adler-32
//! stamps the format embeds along the way, and returns every key entry in
//! file order. The record/definition section that follows the key blocks is
//! addressed by entry id and is not decoded by this crate.

pub mod container;

// Re-export the main types for convenience
pub use container::{
    decode_container, decode_from, DecodedContainer,
    error::{ContainerError, ErrorKind, Result},
    models::{ContainerHeader, DecodeConfig, DirectoryMeta, KeyEntry, NumericWidth, SegmentSize},
};
