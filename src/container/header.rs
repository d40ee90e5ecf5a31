//! Container header parsing

use std::collections::HashMap;
use std::io::Read;

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use encoding_rs::Encoding;
use log::{info, trace};
use quick_xml::{events::Event, Reader};

use super::codec;
use super::error::{ContainerError, Result};
use super::models::{ContainerHeader, NumericWidth};

/// Parse the container header.
///
/// Header structure:
/// - 4 bytes: Header length (big-endian)
/// - N bytes: UTF-16LE content (2-byte byte-order marker, then XML text)
/// - 4 bytes: Adler-32 checksum (little-endian)
///
/// On success the stream cursor sits at the first byte of the directory meta
/// record.
pub fn parse<R: Read>(file: &mut R) -> Result<ContainerHeader> {
    info!("Parsing container header");

    // Read header length
    let header_len = file.read_u32::<BigEndian>()?;
    trace!("Header length: {} bytes", header_len);
    if header_len == 0 {
        return Err(ContainerError::InvalidFormat(
            "Header length is 0; the UTF-16LE content needs at least its 2-byte marker"
                .to_string(),
        ));
    }

    // Read header content
    let mut header_bytes = vec![0u8; header_len as usize];
    file.read_exact(&mut header_bytes)?;

    // Verify checksum
    let checksum_expected = file.read_u32::<LittleEndian>()?;
    let checksum_actual = codec::checksum32(&header_bytes);
    trace!(
        "Header checksum: expected={:#010x}, actual={:#010x}",
        checksum_expected,
        checksum_actual
    );
    if checksum_actual != checksum_expected {
        return Err(ContainerError::ChecksumMismatch {
            region: "header",
            expected: checksum_expected,
            actual: checksum_actual,
        });
    }

    // Decode UTF-16LE to string
    let decoded_header = codec::decode_utf16le(&header_bytes)?;

    // Sanitize XML (remove control characters except whitespace)
    let sanitized_header: String = decoded_header
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect();

    // Parse XML attributes
    let attrs = parse_xml_attributes(&sanitized_header)?;

    let header = build_header_from_attributes(&attrs, decoded_header)?;

    info!(
        "Header parsed: version={}, title={}, encoding={}",
        header.engine_version,
        header.title,
        header.encoding.name()
    );

    Ok(header)
}

/// Parse XML string to extract the root element's attributes as a map.
fn parse_xml_attributes(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return e
                    .attributes()
                    .map(|attr_result| {
                        let attr = attr_result.map_err(|e| {
                            ContainerError::InvalidFormat(format!(
                                "Failed to parse header attribute: {}",
                                e
                            ))
                        })?;
                        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                        let value = attr
                            .unescape_value()
                            .map_err(|e| {
                                ContainerError::InvalidFormat(format!(
                                    "Failed to decode header attribute value: {}",
                                    e
                                ))
                            })?
                            .into_owned();
                        Ok((key, value))
                    })
                    .collect();
            }
            Ok(Event::Eof) => {
                return Err(ContainerError::InvalidFormat(
                    "No root element found in header text".to_string(),
                ))
            }
            Err(e) => {
                return Err(ContainerError::InvalidFormat(format!(
                    "Failed to read header text: {}",
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }
}

/// Build a [`ContainerHeader`] from the parsed attributes.
fn build_header_from_attributes(
    attrs: &HashMap<String, String>,
    text: String,
) -> Result<ContainerHeader> {
    // Parse generator engine version; it decides the numeric field width
    let engine_version = attrs
        .get("GeneratedByEngineVersion")
        .cloned()
        .unwrap_or_else(|| "1.0".to_string());
    let version: f32 = engine_version.parse().map_err(|_| {
        ContainerError::InvalidFormat(format!(
            "Invalid engine version string in header: {:?}",
            engine_version
        ))
    })?;
    let width = NumericWidth::from_version(version);

    // Parse encoding (normalize GBK/GB2312 to GB18030)
    let encoding = attrs
        .get("Encoding")
        .map(|s| {
            if s == "GBK" || s == "GB2312" {
                "GB18030"
            } else {
                s.as_str()
            }
        })
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(encoding_rs::UTF_8);

    let title = attrs
        .get("Title")
        .cloned()
        .unwrap_or_else(|| "Untitled Dictionary".to_string());
    let description = attrs.get("Description").cloned();

    Ok(ContainerHeader {
        engine_version,
        version,
        width,
        encoding,
        title,
        description,
        text,
    })
}
