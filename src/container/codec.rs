//! Shared primitives: checksum, UTF-16LE text decoding, zlib inflation.

use std::io::Read;

use adler32::RollingAdler32;
use encoding_rs::{Encoding, UTF_16LE};
use flate2::read::ZlibDecoder;
use log::trace;

use super::error::{ContainerError, Result};

/// Byte length of the opaque sub-header preceding each compressed payload
/// (directory and key-block segments alike). It typically carries the
/// payload's own declared lengths and is not independently verified.
pub const SUB_HEADER_LEN: usize = 8;

/// Compute the 32-bit Adler rolling checksum over a byte buffer.
///
/// The container format stamps the header and the directory meta record with
/// this checksum; every call site goes through here.
pub fn checksum32(bytes: &[u8]) -> u32 {
    let mut adler = RollingAdler32::new();
    adler.update_buffer(bytes);
    adler.hash()
}

/// Decode a UTF-16LE byte region into text.
///
/// The first 2 bytes are a byte-order marker and are skipped; the remainder
/// is decoded as little-endian 16-bit code units. Inputs shorter than the
/// marker or of odd length are malformed.
pub fn decode_utf16le(bytes: &[u8]) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(ContainerError::InvalidFormat(format!(
            "UTF-16LE region has odd length {}",
            bytes.len()
        )));
    }
    if bytes.len() < 2 {
        return Err(ContainerError::InvalidFormat(
            "UTF-16LE region too short for byte-order marker".to_string(),
        ));
    }
    let (decoded, _, _) = UTF_16LE.decode(&bytes[2..]);
    Ok(decoded.into_owned())
}

/// Inflate a zlib/deflate stream.
///
/// Any stream error, including one surfaced during decoder setup, aborts the
/// decode; nothing reads past a failed decompressor.
pub fn inflate(payload: &[u8], context: &'static str) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    let mut decoder = ZlibDecoder::new(payload);
    decoder
        .read_to_end(&mut output)
        .map_err(|e| ContainerError::Decompression {
            context,
            detail: e.to_string(),
        })?;
    trace!(
        "Inflated {}: {} bytes -> {} bytes",
        context,
        payload.len(),
        output.len()
    );
    Ok(output)
}

/// Width (in bytes) of one text unit for the given encoding.
///
/// UTF-16 stores text in 2-byte units with a 2-byte terminator; every other
/// encoding the format allows is byte-oriented.
pub fn unit_width(encoding: &'static Encoding) -> usize {
    if encoding == UTF_16LE {
        2
    } else {
        1
    }
}
