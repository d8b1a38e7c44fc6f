//! On-disk event files: encoding detection, decoding and encoding.
//!
//! An event file is a single object:
//!
//! ```json
//! { "format_version": "1.0", "events": [ { "muons": { "type": "collection", "records": [] } } ] }
//! ```
//!
//! Three encodings are accepted, detected from the leading bytes:
//! 1. zstd magic (`0x28 0xB5 0x2F 0xFD`): decompress, then detect again.
//! 2. CBOR self-describing tag 55799 (`0xD9 0xD9 0xF7`): CBOR via `cbor4ii`.
//! 3. First non-whitespace byte `{`: JSON via `serde_json`.
use serde::{Deserialize, Serialize};

use crate::store::Event;

/// Format version written by [`EventFile::new`].
pub const FORMAT_VERSION: &str = "1.0";

const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];
const CBOR_TAG: [u8; 3] = [0xD9, 0xD9, 0xF7];
const JSON_OPEN_BRACE: u8 = 0x7B;
const JSON_WHITESPACE: [u8; 4] = [0x09, 0x0A, 0x0D, 0x20];

// ---------------------------------------------------------------------------
// EventFile
// ---------------------------------------------------------------------------

/// The decoded contents of one event file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventFile {
    pub format_version: String,
    pub events: Vec<Event>,
}

impl EventFile {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            format_version: FORMAT_VERSION.to_owned(),
            events,
        }
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Serialization encoding of an event file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Json,
    Cbor,
    Zstd,
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Cbor => f.write_str("cbor"),
            Self::Zstd => f.write_str("zstd"),
        }
    }
}

/// Detects the encoding of an event file from its initial bytes.
pub fn detect_encoding(bytes: &[u8]) -> Result<Encoding, EventFileError> {
    if bytes.starts_with(&ZSTD_MAGIC) {
        return Ok(Encoding::Zstd);
    }
    if bytes.starts_with(&CBOR_TAG) {
        return Ok(Encoding::Cbor);
    }
    match bytes.iter().find(|&&b| !JSON_WHITESPACE.contains(&b)) {
        Some(&JSON_OPEN_BRACE) => Ok(Encoding::Json),
        Some(_) | None => Err(EventFileError::UnrecognizedEncoding {
            first_bytes: bytes.iter().copied().take(4).collect(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced while decoding or encoding an event file.
#[derive(Debug)]
pub enum EventFileError {
    /// The leading bytes match no known encoding.
    UnrecognizedEncoding {
        /// Up to four leading bytes.
        first_bytes: Vec<u8>,
    },
    /// The JSON payload is malformed or does not match the event schema.
    Json(serde_json::Error),
    /// The CBOR payload is malformed or does not match the event schema.
    Cbor(String),
    /// zstd decompression failed, or the payload was compressed twice.
    Compression(String),
    /// The payload was compressed but this build has no zstd support.
    CompressionUnsupported,
    /// The file declares a format major version this crate cannot read.
    UnsupportedVersion(String),
    /// Encoding a file failed.
    Encode(String),
}

impl std::fmt::Display for EventFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnrecognizedEncoding { first_bytes } => write!(
                f,
                "unrecognized encoding: first bytes are {first_bytes:02X?}"
            ),
            Self::Json(e) => write!(f, "invalid JSON event file: {e}"),
            Self::Cbor(msg) => write!(f, "invalid CBOR event file: {msg}"),
            Self::Compression(msg) => write!(f, "zstd error: {msg}"),
            Self::CompressionUnsupported => {
                f.write_str("zstd-compressed input but compression support is disabled")
            }
            Self::UnsupportedVersion(v) => write!(f, "unsupported format_version {v:?}"),
            Self::Encode(msg) => write!(f, "encode error: {msg}"),
        }
    }
}

impl std::error::Error for EventFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::UnrecognizedEncoding { .. }
            | Self::Cbor(_)
            | Self::Compression(_)
            | Self::CompressionUnsupported
            | Self::UnsupportedVersion(_)
            | Self::Encode(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decodes an event file in any supported encoding.
pub fn parse_event_file(bytes: &[u8]) -> Result<EventFile, EventFileError> {
    let file = match detect_encoding(bytes)? {
        Encoding::Json => decode_json(bytes)?,
        Encoding::Cbor => decode_cbor(bytes)?,
        Encoding::Zstd => {
            let inner = decompress(bytes)?;
            match detect_encoding(&inner)? {
                Encoding::Json => decode_json(&inner)?,
                Encoding::Cbor => decode_cbor(&inner)?,
                Encoding::Zstd => {
                    return Err(EventFileError::Compression(
                        "nested zstd frames are not supported".to_owned(),
                    ));
                }
            }
        }
    };
    check_version(&file.format_version)?;
    Ok(file)
}

fn check_version(version: &str) -> Result<(), EventFileError> {
    let major = version.split('.').next().unwrap_or_default();
    if major == "1" {
        Ok(())
    } else {
        Err(EventFileError::UnsupportedVersion(version.to_owned()))
    }
}

fn decode_json(bytes: &[u8]) -> Result<EventFile, EventFileError> {
    serde_json::from_slice(bytes).map_err(EventFileError::Json)
}

fn decode_cbor(bytes: &[u8]) -> Result<EventFile, EventFileError> {
    let payload = bytes.strip_prefix(&CBOR_TAG).unwrap_or(bytes);
    cbor4ii::serde::from_slice(payload).map_err(|e| EventFileError::Cbor(e.to_string()))
}

#[cfg(feature = "compression")]
fn decompress(bytes: &[u8]) -> Result<Vec<u8>, EventFileError> {
    zstd::decode_all(bytes).map_err(|e| EventFileError::Compression(e.to_string()))
}

#[cfg(not(feature = "compression"))]
fn decompress(_bytes: &[u8]) -> Result<Vec<u8>, EventFileError> {
    Err(EventFileError::CompressionUnsupported)
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encodes `file` as compact JSON.
pub fn encode_json(file: &EventFile) -> Result<Vec<u8>, EventFileError> {
    serde_json::to_vec(file).map_err(|e| EventFileError::Encode(e.to_string()))
}

/// Encodes `file` as CBOR with the self-describing tag prepended.
pub fn encode_cbor(file: &EventFile) -> Result<Vec<u8>, EventFileError> {
    let buf = CBOR_TAG.to_vec();
    cbor4ii::serde::to_vec(buf, file).map_err(|e| EventFileError::Encode(e.to_string()))
}

/// Compresses an already-encoded payload with zstd.
#[cfg(feature = "compression")]
pub fn compress(bytes: &[u8]) -> Result<Vec<u8>, EventFileError> {
    zstd::encode_all(bytes, 3).map_err(|e| EventFileError::Compression(e.to_string()))
}
