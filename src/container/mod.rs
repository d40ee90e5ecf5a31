//! Core container decoding module

pub mod error;
pub mod models;

pub(crate) mod codec;
mod directory;
mod header;
mod segments;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::info;

pub use error::Result;
use models::{ContainerHeader, DecodeConfig, DirectoryMeta, KeyEntry, SegmentSize};

/// The fully decoded view of a container's key section.
///
/// Every part is produced exactly once by its pipeline stage and is not
/// mutated afterwards. `entries` is in file order across all segments.
#[derive(Debug)]
pub struct DecodedContainer {
    pub header: ContainerHeader,
    pub meta: DirectoryMeta,
    pub segments: Vec<SegmentSize>,
    pub entries: Vec<KeyEntry>,
}

/// Decode a container file from the given path.
///
/// # Errors
/// Returns an error if the file cannot be opened or read, a checksum fails
/// to verify, or any section is malformed. Every error aborts the whole
/// decode; there is no partial result.
pub fn decode_container(path: impl AsRef<Path>) -> Result<DecodedContainer> {
    let path = path.as_ref();
    info!("Opening container file: {}", path.display());
    let mut file = File::open(path)?;
    decode_from(&mut file)
}

/// Decode a container from an open byte stream positioned at offset 0.
///
/// The pipeline runs strictly in file order: header, directory meta,
/// directory payload, key-block region. Each stage consumes exactly the
/// byte count its preceding length field declares, so on success the cursor
/// rests at the first byte of the record section.
pub fn decode_from<R: Read>(file: &mut R) -> Result<DecodedContainer> {
    let header = header::parse(file)?;
    let config = DecodeConfig::from_header(&header)?;

    let meta = directory::parse_meta(file, &config)?;

    let mut directory_payload = vec![0u8; meta.directory_bytes_len as usize];
    file.read_exact(&mut directory_payload)?;
    let segments = directory::parse_segments(&directory_payload, &meta, &config)?;

    let mut key_blocks_raw = vec![0u8; meta.key_blocks_bytes_len as usize];
    file.read_exact(&mut key_blocks_raw)?;
    let entries = segments::parse_entries(&key_blocks_raw, &segments, &header, &config)?;

    info!(
        "Container decoded: {} entries across {} segments",
        entries.len(),
        segments.len()
    );

    Ok(DecodedContainer {
        header,
        meta,
        segments,
        entries,
    })
}
