//! ASMC compressed design blobs.
//!
//! A design chunk tree is stored compactly as a 16-byte header (magic,
//! format tag, compressed and uncompressed sizes) followed by a zlib
//! stream. Standalone `.design` files and the `Design` chunk inside a
//! preset both use this wrapper.
//!
//! Region-transfer corruption shows up in the wild as a byte-swapped or
//! missing zlib checksum footer, so [`best_effort_unwrap`] degrades through
//! an ordered chain of recovery strategies instead of failing outright.

use std::io::{Read, Write};

use flate2::read::{DeflateDecoder, ZlibDecoder};
use flate2::write::ZlibEncoder;
use flate2::Compression;

use rubicon_common::BinaryReader;

use crate::{Error, Result};

/// Magic bytes at the start of a compressed design blob.
pub const ASMC_MAGIC: &[u8; 4] = b"ASMC";

/// Fixed format tag following the magic.
pub const ASMC_FORMAT_TAG: u32 = 0x0029_1222;

/// Size of the blob header in bytes.
pub const ASMC_HEADER_SIZE: usize = 16;

/// The zlib stream header emitted at best compression.
const ZLIB_HEADER: [u8; 2] = [0x78, 0xDA];

/// A compressed design blob.
///
/// The chunk tree is kept in its compressed form; [`Asmc::unwrap`]
/// inflates it on demand. Keeping the original stream means re-emitting a
/// blob that was only read back is byte-exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asmc {
    compressed: Vec<u8>,
    uncompressed_size: u32,
}

impl Asmc {
    /// Compress a chunk tree into a blob.
    pub fn wrap(data: &[u8]) -> Result<Self> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
        encoder
            .write_all(data)
            .map_err(|e| Error::Compression(e.to_string()))?;
        let compressed = encoder
            .finish()
            .map_err(|e| Error::Compression(e.to_string()))?;

        Ok(Self {
            compressed,
            uncompressed_size: data.len() as u32,
        })
    }

    /// Parse a blob from its on-disk form.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        reader.expect_magic(ASMC_MAGIC)?;

        let format_tag = reader.read_u32()?;
        if format_tag != ASMC_FORMAT_TAG {
            return Err(Error::InvalidFormatTag(format_tag));
        }

        let compressed_size = reader.read_u32()? as usize;
        let uncompressed_size = reader.read_u32()?;
        let compressed = reader.read_bytes(compressed_size)?.to_vec();

        Ok(Self {
            compressed,
            uncompressed_size,
        })
    }

    /// Inflate the wrapped chunk tree.
    ///
    /// Fails with [`Error::SizeMismatch`] if the inflated length does not
    /// match the recorded uncompressed size.
    pub fn unwrap(&self) -> Result<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(&self.compressed[..]);
        let mut out = Vec::with_capacity(self.uncompressed_size as usize);
        decoder
            .read_to_end(&mut out)
            .map_err(|e| Error::Decompression(e.to_string()))?;

        if out.len() != self.uncompressed_size as usize {
            return Err(Error::SizeMismatch {
                expected: self.uncompressed_size as usize,
                actual: out.len(),
            });
        }

        Ok(out)
    }

    /// Encode the blob to its on-disk form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(ASMC_HEADER_SIZE + self.compressed.len());
        out.extend_from_slice(ASMC_MAGIC);
        out.extend_from_slice(&ASMC_FORMAT_TAG.to_le_bytes());
        out.extend_from_slice(&(self.compressed.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.uncompressed_size.to_le_bytes());
        out.extend_from_slice(&self.compressed);
        out
    }

    /// Size of the compressed stream in bytes.
    pub fn compressed_size(&self) -> usize {
        self.compressed.len()
    }

    /// Recorded size of the inflated chunk tree in bytes.
    pub fn uncompressed_size(&self) -> usize {
        self.uncompressed_size as usize
    }
}

/// Which recovery strategy produced a best-effort decompression result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStrategy {
    /// The stream inflated as-is.
    Standard,
    /// The stream inflated after reversing the 4-byte checksum footer.
    ReversedChecksum,
    /// The raw deflate body inflated with the checksum ignored.
    RawIgnoreChecksum,
}

impl RecoveryStrategy {
    /// Short human-readable name.
    pub const fn name(&self) -> &'static str {
        match self {
            RecoveryStrategy::Standard => "standard",
            RecoveryStrategy::ReversedChecksum => "reversed-checksum",
            RecoveryStrategy::RawIgnoreChecksum => "raw-ignore-checksum",
        }
    }
}

impl std::fmt::Display for RecoveryStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A best-effort decompression result.
#[derive(Debug, Clone)]
pub struct Recovered {
    /// The inflated chunk tree.
    pub data: Vec<u8>,
    /// The strategy that succeeded.
    pub strategy: RecoveryStrategy,
    /// Bytes left unconsumed after the deflate stream when the checksum was
    /// ignored. Empty for the other strategies; non-empty is a diagnostic,
    /// not an error.
    pub unused_trailing: Vec<u8>,
}

/// Inflate a bare zlib stream that may have a corrupted checksum footer.
///
/// The stream is located by its `78 DA` header pair anywhere in `raw`
/// (standalone design files sometimes carry junk ahead of it). Strategies
/// are tried in order: standard inflate, inflate with the trailing 4
/// checksum bytes reversed, then raw deflate with the checksum ignored.
/// Only when all three fail is the error surfaced.
pub fn best_effort_unwrap(raw: &[u8]) -> Result<Recovered> {
    let start = memchr::memmem::find(raw, &ZLIB_HEADER)
        .ok_or_else(|| Error::Decompression("zlib stream header not found".to_string()))?;
    let stream = &raw[start..];

    if let Ok(data) = inflate_zlib(stream) {
        return Ok(Recovered {
            data,
            strategy: RecoveryStrategy::Standard,
            unused_trailing: Vec::new(),
        });
    }

    if stream.len() >= 4 {
        let mut flipped = stream.to_vec();
        let tail = flipped.len() - 4;
        flipped[tail..].reverse();
        if let Ok(data) = inflate_zlib(&flipped) {
            return Ok(Recovered {
                data,
                strategy: RecoveryStrategy::ReversedChecksum,
                unused_trailing: Vec::new(),
            });
        }
    }

    if stream.len() < ZLIB_HEADER.len() + 4 {
        return Err(Error::Decompression(
            "stream too short for raw deflate recovery".to_string(),
        ));
    }
    let body = &stream[ZLIB_HEADER.len()..stream.len() - 4];
    let mut decoder = DeflateDecoder::new(body);
    let mut data = Vec::new();
    decoder
        .read_to_end(&mut data)
        .map_err(|e| Error::Decompression(e.to_string()))?;
    let consumed = (decoder.total_in() as usize).min(body.len());

    Ok(Recovered {
        data,
        strategy: RecoveryStrategy::RawIgnoreChecksum,
        unused_trailing: body[consumed..].to_vec(),
    })
}

fn inflate_zlib(stream: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(stream);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Vec<u8> {
        // Compressible, patterned payload.
        let mut data = Vec::new();
        for i in 0..512u32 {
            data.extend_from_slice(&(i % 7).to_le_bytes());
        }
        data
    }

    #[test]
    fn test_wrap_unwrap_roundtrip() {
        let tree = sample_tree();
        let blob = Asmc::wrap(&tree).unwrap();

        assert_eq!(blob.uncompressed_size(), tree.len());
        assert_eq!(blob.unwrap().unwrap(), tree);

        let reparsed = Asmc::from_bytes(&blob.to_bytes()).unwrap();
        assert_eq!(reparsed, blob);
        assert_eq!(reparsed.unwrap().unwrap(), tree);
    }

    #[test]
    fn test_header_layout() {
        let blob = Asmc::wrap(b"payload").unwrap();
        let bytes = blob.to_bytes();

        assert_eq!(&bytes[..4], b"ASMC");
        assert_eq!(
            u32::from_le_bytes(bytes[4..8].try_into().unwrap()),
            ASMC_FORMAT_TAG
        );
        assert_eq!(
            u32::from_le_bytes(bytes[8..12].try_into().unwrap()) as usize,
            blob.compressed_size()
        );
        assert_eq!(u32::from_le_bytes(bytes[12..16].try_into().unwrap()), 7);
    }

    #[test]
    fn test_bad_format_tag_rejected() {
        let mut bytes = Asmc::wrap(b"payload").unwrap().to_bytes();
        bytes[4] = 0xFF;
        assert!(matches!(
            Asmc::from_bytes(&bytes),
            Err(Error::InvalidFormatTag(_))
        ));
    }

    #[test]
    fn test_size_mismatch_detected() {
        let mut blob = Asmc::wrap(&sample_tree()).unwrap();
        blob.uncompressed_size += 1;
        assert!(matches!(
            blob.unwrap(),
            Err(Error::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_best_effort_standard() {
        let tree = sample_tree();
        let blob = Asmc::wrap(&tree).unwrap();
        // Feed the whole blob: the zlib header sits after the ASMC header.
        let recovered = best_effort_unwrap(&blob.to_bytes()).unwrap();

        assert_eq!(recovered.strategy, RecoveryStrategy::Standard);
        assert_eq!(recovered.data, tree);
        assert!(recovered.unused_trailing.is_empty());
    }

    #[test]
    fn test_best_effort_reversed_checksum() {
        let tree = sample_tree();
        let mut stream = Asmc::wrap(&tree).unwrap().to_bytes()[ASMC_HEADER_SIZE..].to_vec();
        let tail = stream.len() - 4;
        stream[tail..].reverse();

        let recovered = best_effort_unwrap(&stream).unwrap();
        assert_eq!(recovered.strategy, RecoveryStrategy::ReversedChecksum);
        assert_eq!(recovered.data, tree);
    }

    #[test]
    fn test_best_effort_ignores_broken_checksum() {
        let tree = sample_tree();
        let mut stream = Asmc::wrap(&tree).unwrap().to_bytes()[ASMC_HEADER_SIZE..].to_vec();
        let tail = stream.len() - 4;
        // Neither the stored nor the reversed footer matches now.
        stream[tail..].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);

        let recovered = best_effort_unwrap(&stream).unwrap();
        assert_eq!(recovered.strategy, RecoveryStrategy::RawIgnoreChecksum);
        assert_eq!(recovered.data, tree);
    }

    #[test]
    fn test_best_effort_without_header_fails() {
        assert!(matches!(
            best_effort_unwrap(&[0u8; 32]),
            Err(Error::Decompression(_))
        ));
    }
}
