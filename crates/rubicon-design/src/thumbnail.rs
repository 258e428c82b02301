//! Design thumbnail records.
//!
//! A thumbnail is a fixed 24-byte header followed by an opaque pre-encoded
//! BC7 texture block. The game always stores a 356x124 image whose encoded
//! payload is exactly 44144 bytes; arbitrary input payloads are clamped or
//! zero-padded to that length.

use zerocopy::byteorder::little_endian::U32;
use zerocopy::{FromBytes, Immutable, KnownLayout};

use rubicon_common::BinaryReader;

use crate::Result;

/// Thumbnail image width in pixels.
pub const THUMBNAIL_WIDTH: u32 = 356;

/// Thumbnail image height in pixels.
pub const THUMBNAIL_HEIGHT: u32 = 124;

/// Fixed format tag stored in the header.
pub const THUMBNAIL_FORMAT_TAG: u32 = 1424;

/// Fixed encoded payload length in bytes.
pub const THUMBNAIL_DATA_SIZE: usize = 44144;

/// Size of the thumbnail header in bytes.
pub const THUMBNAIL_HEADER_SIZE: usize = 24;

/// On-disk header. Only the declared length matters on read; the format
/// tag and dimensions are fixed constants re-emitted on write.
#[derive(FromBytes, KnownLayout, Immutable)]
#[repr(C)]
#[allow(dead_code)]
struct ThumbnailHeader {
    data_length: U32,
    format_tag: U32,
    width: U32,
    height: U32,
    reserved0: U32,
    reserved1: U32,
}

/// A design preview image.
///
/// The pixel payload is an opaque compressed-texture block; this crate
/// never decodes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pixel_data: Vec<u8>,
}

impl Thumbnail {
    /// Create an all-zero placeholder thumbnail.
    pub fn empty() -> Self {
        Self {
            pixel_data: vec![0; THUMBNAIL_DATA_SIZE],
        }
    }

    /// Create a thumbnail from a pre-encoded texture payload.
    ///
    /// The payload is truncated or zero-padded to the fixed
    /// [`THUMBNAIL_DATA_SIZE`] regardless of its input length.
    pub fn from_payload(payload: &[u8]) -> Self {
        let mut pixel_data = payload[..payload.len().min(THUMBNAIL_DATA_SIZE)].to_vec();
        pixel_data.resize(THUMBNAIL_DATA_SIZE, 0);
        Self { pixel_data }
    }

    /// Parse a thumbnail record.
    ///
    /// The header's declared length governs how many payload bytes are
    /// consumed; a buffer that cannot supply them is an error.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        let header: ThumbnailHeader = reader.read_struct()?;
        let pixel_data = reader.read_bytes(header.data_length.get() as usize)?.to_vec();
        Ok(Self { pixel_data })
    }

    /// Encode the record as header + payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(THUMBNAIL_HEADER_SIZE + self.pixel_data.len());
        out.extend_from_slice(&(self.pixel_data.len() as u32).to_le_bytes());
        out.extend_from_slice(&THUMBNAIL_FORMAT_TAG.to_le_bytes());
        out.extend_from_slice(&THUMBNAIL_WIDTH.to_le_bytes());
        out.extend_from_slice(&THUMBNAIL_HEIGHT.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&self.pixel_data);
        out
    }

    /// The encoded texture payload.
    pub fn pixel_data(&self) -> &[u8] {
        &self.pixel_data
    }
}

impl Default for Thumbnail {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_layout() {
        let bytes = Thumbnail::empty().to_bytes();
        assert_eq!(bytes.len(), THUMBNAIL_HEADER_SIZE + THUMBNAIL_DATA_SIZE);
        assert_eq!(
            u32::from_le_bytes(bytes[0..4].try_into().unwrap()) as usize,
            THUMBNAIL_DATA_SIZE
        );
        assert_eq!(
            u32::from_le_bytes(bytes[4..8].try_into().unwrap()),
            THUMBNAIL_FORMAT_TAG
        );
        assert_eq!(u32::from_le_bytes(bytes[8..12].try_into().unwrap()), 356);
        assert_eq!(u32::from_le_bytes(bytes[12..16].try_into().unwrap()), 124);
    }

    #[test]
    fn test_payload_clamped_to_constant() {
        let short = Thumbnail::from_payload(&[0xAB; 100]);
        assert_eq!(short.pixel_data().len(), THUMBNAIL_DATA_SIZE);
        assert_eq!(&short.pixel_data()[..100], &[0xAB; 100]);
        assert!(short.pixel_data()[100..].iter().all(|&b| b == 0));

        let long = Thumbnail::from_payload(&vec![0xCD; THUMBNAIL_DATA_SIZE + 500]);
        assert_eq!(long.pixel_data().len(), THUMBNAIL_DATA_SIZE);
    }

    #[test]
    fn test_roundtrip() {
        let thumbnail = Thumbnail::from_payload(&[0x5A; 1000]);
        let parsed = Thumbnail::from_bytes(&thumbnail.to_bytes()).unwrap();
        assert_eq!(parsed, thumbnail);
    }

    #[test]
    fn test_truncated_payload_rejected() {
        let mut bytes = Thumbnail::empty().to_bytes();
        bytes.truncate(THUMBNAIL_HEADER_SIZE + 10);
        assert!(Thumbnail::from_bytes(&bytes).is_err());
    }
}
