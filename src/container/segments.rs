//! Key-block content decoding: slicing the raw region into compressed
//! segments and extracting the (id, text) entries within.

use byteorder::{BigEndian, ByteOrder};
use log::{debug, info};

use super::codec::{self, SUB_HEADER_LEN};
use super::error::{ContainerError, Result};
use super::models::{ContainerHeader, DecodeConfig, KeyEntry, SegmentSize};

/// Decode all key entries from the raw key-block region.
///
/// The region is the concatenation of the segments described by the
/// directory, in order; each segment is an 8-byte opaque sub-header followed
/// by a zlib stream. A failure in any segment fails the whole decode; no
/// partial result is returned.
pub fn parse_entries(
    raw: &[u8],
    segments: &[SegmentSize],
    header: &ContainerHeader,
    config: &DecodeConfig,
) -> Result<Vec<KeyEntry>> {
    info!(
        "Decoding {} key-block segments ({} bytes)",
        segments.len(),
        raw.len()
    );

    let mut entries = Vec::new();
    let mut offset = 0usize;

    for (index, segment) in segments.iter().enumerate() {
        let compressed = segment.compressed_size as usize;
        let end = offset.checked_add(compressed).filter(|&e| e <= raw.len());
        let slice = match end {
            Some(end) => &raw[offset..end],
            None => {
                return Err(ContainerError::InvalidFormat(format!(
                    "Segment {} overruns the key-block region ({} bytes at offset {})",
                    index, compressed, offset
                )))
            }
        };
        offset += compressed;

        let decompressed = decode_segment(slice, segment)?;
        debug!(
            "Segment {}: {} -> {} bytes",
            index,
            compressed,
            decompressed.len()
        );

        parse_segment_entries(&decompressed, header, config, &mut entries)?;
    }

    info!("Decoded {} key entries", entries.len());
    Ok(entries)
}

/// Decompress one segment and validate its declared size.
fn decode_segment(slice: &[u8], segment: &SegmentSize) -> Result<Vec<u8>> {
    if slice.len() < SUB_HEADER_LEN {
        return Err(ContainerError::InvalidFormat(format!(
            "Key-block segment too short for sub-header: {} bytes",
            slice.len()
        )));
    }
    let decompressed = codec::inflate(&slice[SUB_HEADER_LEN..], "key-block segment")?;
    if decompressed.len() as u64 != segment.decompressed_size {
        return Err(ContainerError::SizeMismatch {
            context: "decompressed key-block segment",
            expected: segment.decompressed_size,
            found: decompressed.len() as u64,
        });
    }
    Ok(decompressed)
}

/// Parse the (id, text) entries of one decompressed segment.
///
/// Layout per entry: a big-endian record id (`field_width` bytes), then the
/// key text up to a zero terminator (one text unit wide). Every byte is
/// visited once; an empty segment yields no entries.
fn parse_segment_entries(
    data: &[u8],
    header: &ContainerHeader,
    config: &DecodeConfig,
    entries: &mut Vec<KeyEntry>,
) -> Result<()> {
    let width = config.width.field_width();
    let mut reader = data;

    while !reader.is_empty() {
        if reader.len() < width {
            return Err(ContainerError::InvalidFormat(
                "Truncated record id in key-block segment".to_string(),
            ));
        }
        let id = BigEndian::read_uint(&reader[..width], width);
        reader = &reader[width..];

        let text = read_terminated_text(&mut reader, header, config.text_unit)?;
        entries.push(KeyEntry { id, text });
    }

    Ok(())
}

/// Read a zero-terminated key text from a byte slice and advance the slice.
///
/// UTF-16 uses a 2-byte zero terminator, byte-oriented encodings a single
/// zero byte.
fn read_terminated_text(
    reader: &mut &[u8],
    header: &ContainerHeader,
    text_unit: usize,
) -> Result<String> {
    let end_pos = if text_unit == 2 {
        reader
            .chunks_exact(2)
            .position(|chunk| chunk == [0, 0])
            .map(|chunk_index| chunk_index * 2)
    } else {
        reader.iter().position(|&byte| byte == 0)
    }
    .ok_or_else(|| {
        ContainerError::InvalidFormat("Missing terminator in key text".to_string())
    })?;

    let (decoded, _, _) = header.encoding.decode(&reader[..end_pos]);
    *reader = &reader[end_pos + text_unit..];

    Ok(decoded.into_owned())
}
