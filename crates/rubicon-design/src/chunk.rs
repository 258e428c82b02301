//! Tag-length-value chunk stream codec.
//!
//! Design records are stored as a flat sequence of chunks running from a
//! `---- begin ----` sentinel to a `----  end  ----` sentinel. Each chunk
//! carries a 16-byte NUL-padded ASCII signature, a payload length, a version,
//! and 8 reserved zero bytes, followed by the payload itself.
//!
//! The stream is parsed once, front to back, into a [`ChunkList`]; repeated
//! and occurrence-indexed signature lookups are answered from the parsed list
//! instead of re-scanning the raw bytes.

use rubicon_common::BinaryReader;

use crate::{Error, Result};

/// Width of the chunk signature field in bytes.
pub const SIGNATURE_SIZE: usize = 16;

/// Size of an encoded chunk header in bytes.
pub const CHUNK_HEADER_SIZE: usize = 32;

/// Signature of the chunk-tree opening sentinel.
pub const BEGIN_SIGNATURE: &str = "---- begin ----";

/// Signature of the chunk-tree closing sentinel.
pub const END_SIGNATURE: &str = "----  end  ----";

/// A decoded chunk header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkHeader {
    /// ASCII signature with trailing NUL padding removed.
    pub signature: String,
    /// Payload length in bytes.
    pub length: u32,
    /// Chunk format version.
    pub version: u32,
}

impl ChunkHeader {
    /// Read a chunk header from the reader's current position.
    ///
    /// Fails with [`Error::MalformedChunk`] if the signature is not ASCII,
    /// contains an embedded NUL, or the reserved header words are non-zero.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let offset = reader.position();

        let sig_bytes = reader.read_bytes(SIGNATURE_SIZE)?;
        let text_len = sig_bytes
            .iter()
            .rposition(|&b| b != 0)
            .map(|i| i + 1)
            .unwrap_or(0);
        let text = &sig_bytes[..text_len];
        if !text.is_ascii() || text.contains(&0) {
            return Err(Error::MalformedChunk {
                offset,
                reason: "signature is not NUL-padded ASCII".to_string(),
            });
        }
        // Safe: verified ASCII above.
        let signature = String::from_utf8(text.to_vec()).unwrap();

        let length = reader.read_u32()?;
        let version = reader.read_u32()?;
        let reserved = reader.read_u64()?;
        if reserved != 0 {
            return Err(Error::MalformedChunk {
                offset,
                reason: "reserved header words must be zero".to_string(),
            });
        }

        Ok(Self {
            signature,
            length,
            version,
        })
    }

    /// Encode this header to its 32-byte on-disk form.
    ///
    /// The signature is NUL-padded (or truncated) to 16 bytes.
    pub fn to_bytes(&self) -> [u8; CHUNK_HEADER_SIZE] {
        let mut out = [0u8; CHUNK_HEADER_SIZE];
        let sig = self.signature.as_bytes();
        let n = sig.len().min(SIGNATURE_SIZE);
        out[..n].copy_from_slice(&sig[..n]);
        out[16..20].copy_from_slice(&self.length.to_le_bytes());
        out[20..24].copy_from_slice(&self.version.to_le_bytes());
        // Bytes 24..32 are reserved and stay zero.
        out
    }
}

impl std::fmt::Display for ChunkHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:<16} v{} [{:5X}h]",
            self.signature, self.version, self.length
        )
    }
}

/// One parsed chunk: signature, version, and owned payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRecord {
    /// ASCII chunk signature.
    pub signature: String,
    /// Chunk format version.
    pub version: u32,
    /// Raw payload bytes.
    pub payload: Vec<u8>,
}

impl ChunkRecord {
    /// Create a new record.
    pub fn new(signature: impl Into<String>, version: u32, payload: Vec<u8>) -> Self {
        Self {
            signature: signature.into(),
            version,
            payload,
        }
    }

    /// Encode this record as header + payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        write_chunk(&self.signature, self.version, &self.payload)
    }
}

/// Encode a single chunk: 32-byte header followed by the payload.
pub fn write_chunk(signature: &str, version: u32, payload: &[u8]) -> Vec<u8> {
    let header = ChunkHeader {
        signature: signature.to_string(),
        length: payload.len() as u32,
        version,
    };
    let mut out = Vec::with_capacity(CHUNK_HEADER_SIZE + payload.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(payload);
    out
}

/// An ordered chunk tree parsed from a `begin`..`end` sentinel span.
///
/// The sentinels themselves are consumed during parsing and re-emitted by
/// [`ChunkList::to_bytes`]; [`ChunkList::records`] holds only the chunks in
/// between. Duplicate signatures are tolerated and looked up by occurrence
/// index.
#[derive(Debug, Clone, Default)]
pub struct ChunkList {
    records: Vec<ChunkRecord>,
    consumed: usize,
}

impl ChunkList {
    /// Create an empty chunk list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a chunk tree starting at the head of `data`.
    ///
    /// The first chunk must be the `begin` sentinel; parsing walks forward
    /// until the `end` sentinel and records the total byte span consumed,
    /// which is the sum of `32 + length` over every chunk including both
    /// sentinels. Bytes past the `end` sentinel are left untouched.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        let mut records = Vec::new();
        let mut seen_begin = false;

        loop {
            let offset = reader.position();
            if reader.is_empty() {
                return Err(Error::MalformedChunk {
                    offset,
                    reason: "chunk stream ended without an end sentinel".to_string(),
                });
            }

            let header = ChunkHeader::read(&mut reader)?;
            let payload = reader.read_bytes(header.length as usize)?;

            match header.signature.as_str() {
                BEGIN_SIGNATURE if !seen_begin => {
                    seen_begin = true;
                }
                _ if !seen_begin => {
                    return Err(Error::MalformedChunk {
                        offset,
                        reason: "chunk stream does not start with a begin sentinel".to_string(),
                    });
                }
                END_SIGNATURE => {
                    return Ok(Self {
                        records,
                        consumed: reader.position(),
                    });
                }
                _ => {
                    records.push(ChunkRecord {
                        signature: header.signature,
                        version: header.version,
                        payload: payload.to_vec(),
                    });
                }
            }
        }
    }

    /// The chunks between the sentinels, in stream order.
    pub fn records(&self) -> &[ChunkRecord] {
        &self.records
    }

    /// Total bytes consumed from the input, sentinels included.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Append a record.
    pub fn push(&mut self, record: ChunkRecord) {
        self.records.push(record);
    }

    /// Get the first record with the given signature.
    pub fn get(&self, signature: &str) -> Option<&ChunkRecord> {
        self.get_nth(signature, 0)
    }

    /// Get the nth (0-based) record with the given signature.
    ///
    /// Repeated signatures occur in stacked sub-sections, so lookups are
    /// occurrence-indexed.
    pub fn get_nth(&self, signature: &str, occurrence: usize) -> Option<&ChunkRecord> {
        self.records
            .iter()
            .filter(|r| r.signature == signature)
            .nth(occurrence)
    }

    /// Find the first payload with the given signature.
    ///
    /// See [`ChunkList::find_nth`] for the trailing-zero behavior.
    pub fn find(&self, signature: &str) -> Result<&[u8]> {
        self.find_nth(signature, 0)
    }

    /// Find the nth (0-based) payload with the given signature.
    ///
    /// Trailing zero bytes are stripped from the returned slice; NUL-padded
    /// payloads come back trimmed. For UTF-16 string payloads prefer
    /// [`decode_utf16`] on the raw record payload, which trims whole zero
    /// code units instead of raw bytes.
    pub fn find_nth(&self, signature: &str, occurrence: usize) -> Result<&[u8]> {
        let record =
            self.get_nth(signature, occurrence)
                .ok_or_else(|| Error::SignatureNotFound {
                    signature: signature.to_string(),
                    occurrence,
                })?;
        let end = record
            .payload
            .iter()
            .rposition(|&b| b != 0)
            .map(|i| i + 1)
            .unwrap_or(0);
        Ok(&record.payload[..end])
    }

    /// Encode the tree back to bytes, wrapped in fresh sentinels.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&write_chunk(BEGIN_SIGNATURE, 0, &[]));
        for record in &self.records {
            out.extend_from_slice(&record.to_bytes());
        }
        out.extend_from_slice(&write_chunk(END_SIGNATURE, 0, &[]));
        out
    }
}

/// Decode a UTF-16LE string payload.
///
/// The terminator (and any further zero padding) is trimmed by whole zero
/// code units, not raw bytes, so characters whose low byte happens to be
/// zero survive intact.
pub fn decode_utf16(payload: &[u8]) -> Result<String> {
    if payload.len() % 2 != 0 {
        return Err(Error::InvalidString(format!(
            "odd payload length {}",
            payload.len()
        )));
    }

    let mut units: Vec<u16> = payload
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    while units.last() == Some(&0) {
        units.pop();
    }

    String::from_utf16(&units).map_err(|e| Error::InvalidString(e.to_string()))
}

/// Encode a string as UTF-16LE code units with a NUL terminator.
pub fn encode_utf16(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len() * 2 + 2);
    for unit in s.encode_utf16() {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    out.extend_from_slice(&[0, 0]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(records: &[(&str, u32, &[u8])]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&write_chunk(BEGIN_SIGNATURE, 0, &[]));
        for (sig, version, payload) in records {
            out.extend_from_slice(&write_chunk(sig, *version, payload));
        }
        out.extend_from_slice(&write_chunk(END_SIGNATURE, 0, &[]));
        out
    }

    #[test]
    fn test_write_read_roundtrip() {
        let bytes = write_chunk("Assemble", 3, &[1, 2, 3, 4]);
        assert_eq!(bytes.len(), CHUNK_HEADER_SIZE + 4);

        let mut reader = BinaryReader::new(&bytes);
        let header = ChunkHeader::read(&mut reader).unwrap();
        assert_eq!(header.signature, "Assemble");
        assert_eq!(header.version, 3);
        assert_eq!(header.length, 4);
        assert_eq!(reader.read_bytes(4).unwrap(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_reserved_words_must_be_zero() {
        let mut bytes = write_chunk("Category", 0, &[1]);
        bytes[25] = 0xAA;
        let mut reader = BinaryReader::new(&bytes);
        assert!(matches!(
            ChunkHeader::read(&mut reader),
            Err(Error::MalformedChunk { .. })
        ));
    }

    #[test]
    fn test_parse_consumed_span() {
        let data = tree(&[("Category", 0, &[2]), ("DateTime", 0, &[0; 16])]);
        let list = ChunkList::parse(&data).unwrap();

        assert_eq!(list.records().len(), 2);
        assert_eq!(list.consumed(), data.len());
        // Sum of 32 + length over all chunks, sentinels included.
        assert_eq!(list.consumed(), 32 + (32 + 1) + (32 + 16) + 32);
    }

    #[test]
    fn test_parse_stops_at_end_sentinel() {
        let mut data = tree(&[("Category", 0, &[1])]);
        data.extend_from_slice(b"garbage after the tree");
        let list = ChunkList::parse(&data).unwrap();
        assert_eq!(list.consumed(), data.len() - 22);
    }

    #[test]
    fn test_parse_requires_sentinels() {
        let data = write_chunk("Category", 0, &[1]);
        assert!(matches!(
            ChunkList::parse(&data),
            Err(Error::MalformedChunk { .. })
        ));

        let mut unterminated = write_chunk(BEGIN_SIGNATURE, 0, &[]);
        unterminated.extend_from_slice(&write_chunk("Category", 0, &[1]));
        assert!(matches!(
            ChunkList::parse(&unterminated),
            Err(Error::MalformedChunk { .. })
        ));
    }

    #[test]
    fn test_find_nth_occurrences() {
        let data = tree(&[
            ("Coloring", 3, &[1, 0, 0, 0]),
            ("Coloring", 3, &[2, 2, 0, 0]),
        ]);
        let list = ChunkList::parse(&data).unwrap();

        // Trailing zero bytes are stripped from found payloads.
        assert_eq!(list.find_nth("Coloring", 0).unwrap(), &[1]);
        assert_eq!(list.find_nth("Coloring", 1).unwrap(), &[2, 2]);
        assert!(matches!(
            list.find_nth("Coloring", 2),
            Err(Error::SignatureNotFound { occurrence: 2, .. })
        ));
        assert!(matches!(
            list.find("Assemble"),
            Err(Error::SignatureNotFound { .. })
        ));
    }

    #[test]
    fn test_utf16_roundtrip() {
        let payload = encode_utf16("STEEL HAZE");
        assert_eq!(payload.len(), "STEEL HAZE".len() * 2 + 2);
        assert_eq!(decode_utf16(&payload).unwrap(), "STEEL HAZE");
    }

    #[test]
    fn test_utf16_trims_code_units_not_bytes() {
        // 'Ā' is U+0100: low byte zero, high byte one. A byte-level trim
        // would eat half of the final character.
        let payload = encode_utf16("AĀ");
        assert_eq!(decode_utf16(&payload).unwrap(), "AĀ");
    }

    #[test]
    fn test_signature_padding() {
        let bytes = write_chunk("UgcID", 0, &[]);
        assert_eq!(&bytes[..5], b"UgcID");
        assert!(bytes[5..16].iter().all(|&b| b == 0));
    }
}
