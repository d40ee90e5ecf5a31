//! Key-block directory decoding: the fixed-width meta record and the
//! compressed table of per-segment size descriptors.

use std::io::Read;

use byteorder::{BigEndian, ByteOrder, ReadBytesExt};
use log::{debug, info, trace};

use super::codec::{self, SUB_HEADER_LEN};
use super::error::{ContainerError, Result};
use super::models::{DecodeConfig, DirectoryMeta, SegmentSize};

/// Number of integer fields in the directory meta record.
const META_FIELDS: usize = 5;

/// Parse the directory meta record.
///
/// Structure:
/// - 5 fields, each `field_width` bytes, big-endian: block count, entry
///   count, directory checksum field, directory byte length, key-block
///   region byte length
/// - 4 bytes: Adler-32 checksum of the raw record (big-endian)
///
/// The third field is read and surfaced but never verified against the
/// directory payload; the format leaves it advisory.
pub fn parse_meta<R: Read>(file: &mut R, config: &DecodeConfig) -> Result<DirectoryMeta> {
    info!("Parsing directory meta record");

    let width = config.width.field_width();
    let mut record = vec![0u8; META_FIELDS * width];
    file.read_exact(&mut record)?;

    // Verify checksum over the raw record bytes
    let checksum_expected = file.read_u32::<BigEndian>()?;
    let checksum_actual = codec::checksum32(&record);
    trace!(
        "Directory meta checksum: expected={:#010x}, actual={:#010x}",
        checksum_expected,
        checksum_actual
    );
    if checksum_actual != checksum_expected {
        return Err(ContainerError::ChecksumMismatch {
            region: "directory meta record",
            expected: checksum_expected,
            actual: checksum_actual,
        });
    }

    let field = |i: usize| BigEndian::read_uint(&record[i * width..(i + 1) * width], width);
    let meta = DirectoryMeta {
        block_count: field(0),
        entry_count: field(1),
        directory_checksum: field(2),
        directory_bytes_len: field(3),
        key_blocks_bytes_len: field(4),
    };

    info!(
        "Directory meta: blocks={}, entries={}, directory={} bytes, key blocks={} bytes",
        meta.block_count, meta.entry_count, meta.directory_bytes_len, meta.key_blocks_bytes_len
    );

    Ok(meta)
}

/// Parse the directory payload into per-segment size descriptors.
///
/// The payload is an 8-byte opaque sub-header followed by a zlib stream.
/// The inflated bytes hold one record per segment:
/// - entry count for this segment (`field_width` bytes, big-endian)
/// - first key text: 2-byte big-endian length, then that many text units
///   plus one terminator unit (skipped)
/// - last key text, skipped identically
/// - compressed size, decompressed size (`field_width` bytes each)
pub fn parse_segments(
    payload: &[u8],
    meta: &DirectoryMeta,
    config: &DecodeConfig,
) -> Result<Vec<SegmentSize>> {
    info!("Parsing key-block directory ({} bytes)", payload.len());

    if payload.len() < SUB_HEADER_LEN {
        return Err(ContainerError::InvalidFormat(format!(
            "Directory payload too short for sub-header: {} bytes",
            payload.len()
        )));
    }
    let table = codec::inflate(&payload[SUB_HEADER_LEN..], "directory payload")?;
    debug!("Directory inflated to {} bytes", table.len());

    let width = config.width.field_width();
    let mut segments = Vec::with_capacity(meta.block_count as usize);
    let mut cursor = table.as_slice();
    let mut total_entries = 0u64;
    let mut total_compressed = 0u64;

    while !cursor.is_empty() {
        total_entries += read_field(&mut cursor, width)?;

        // First and last key text of the segment; sizes only, content unused
        skip_key_text(&mut cursor, config.text_unit)?;
        skip_key_text(&mut cursor, config.text_unit)?;

        let compressed_size = read_field(&mut cursor, width)?;
        let decompressed_size = read_field(&mut cursor, width)?;
        total_compressed += compressed_size;

        segments.push(SegmentSize {
            compressed_size,
            decompressed_size,
        });
    }

    if segments.len() as u64 != meta.block_count {
        return Err(ContainerError::CountMismatch {
            item_type: "key-block segments in directory",
            expected: meta.block_count,
            found: segments.len() as u64,
        });
    }

    if total_entries != meta.entry_count {
        return Err(ContainerError::CountMismatch {
            item_type: "key entries declared in directory",
            expected: meta.entry_count,
            found: total_entries,
        });
    }

    // The descriptors must tile the key-block region exactly
    if total_compressed != meta.key_blocks_bytes_len {
        return Err(ContainerError::SizeMismatch {
            context: "key-block region described by directory",
            expected: meta.key_blocks_bytes_len,
            found: total_compressed,
        });
    }

    info!("Directory parsed: {} segments defined", segments.len());
    Ok(segments)
}

/// Read one big-endian integer field from an in-memory cursor.
fn read_field(cursor: &mut &[u8], width: usize) -> Result<u64> {
    if cursor.len() < width {
        return Err(ContainerError::InvalidFormat(
            "Truncated integer field in directory".to_string(),
        ));
    }
    let value = BigEndian::read_uint(&cursor[..width], width);
    *cursor = &cursor[width..];
    Ok(value)
}

/// Skip over a length-prefixed key text without decoding it.
///
/// The prefix counts text units; one terminator unit follows the text.
fn skip_key_text(cursor: &mut &[u8], text_unit: usize) -> Result<()> {
    if cursor.len() < 2 {
        return Err(ContainerError::InvalidFormat(
            "Truncated key text length prefix in directory".to_string(),
        ));
    }
    let text_len_units = BigEndian::read_u16(&cursor[..2]) as usize;
    *cursor = &cursor[2..];

    let total_bytes = (text_len_units + 1) * text_unit;
    if cursor.len() < total_bytes {
        return Err(ContainerError::InvalidFormat(
            "Incomplete key text in directory".to_string(),
        ));
    }
    *cursor = &cursor[total_bytes..];
    Ok(())
}
